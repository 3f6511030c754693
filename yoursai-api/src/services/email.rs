//! # Email Service
//!
//! Sends transactional mail over SMTP with STARTTLS. Four kinds of mail
//! leave this service: demo-request notifications, full-demo confirmations
//! (sent to the visitor, copied to the team), contact-form notifications,
//! and job applications with the resume attached.
//!
//! The SMTP connection is established lazily on first send, so constructing
//! the service never touches the network.

use lettre::{
    message::{header::ContentType, Attachment, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use thiserror::Error;

use crate::config::SmtpConfig;

/// Email delivery errors
#[derive(Debug, Error)]
pub enum EmailError {
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    #[error("Invalid email address: {0}")]
    InvalidAddress(#[from] lettre::address::AddressError),

    #[error("Invalid attachment content type")]
    InvalidAttachment,
}

/// A resume file pulled out of the application form
#[derive(Debug, Clone)]
pub struct ResumeFile {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// SMTP-backed mail sender
#[derive(Clone)]
pub struct EmailService {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
    notify_address: String,
}

impl EmailService {
    /// Builds the service from SMTP configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the relay host is not a valid SMTP endpoint.
    pub fn new(config: &SmtpConfig) -> Result<Self, EmailError> {
        let credentials = Credentials::new(config.username.clone(), config.password.clone());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            .port(config.port)
            .credentials(credentials)
            .build();

        Ok(Self {
            transport,
            from_address: config.username.clone(),
            notify_address: config.notify_address.clone(),
        })
    }

    fn from_mailbox(&self) -> Result<Mailbox, EmailError> {
        Ok(format!("YoursAI <{}>", self.from_address).parse()?)
    }

    /// Notifies the team about a new demo request
    pub async fn send_demo_request(
        &self,
        name: &str,
        email: &str,
        phone: &str,
        company: &str,
        message: &str,
        date: &str,
        time: &str,
    ) -> Result<(), EmailError> {
        let body = format!(
            "<h2>New Demo Request</h2>\
             <p><b>Name:</b> {name}</p>\
             <p><b>Email:</b> {email}</p>\
             <p><b>Phone:</b> {phone}</p>\
             <p><b>Company:</b> {company}</p>\
             <p><b>Preferred date:</b> {date}</p>\
             <p><b>Preferred time:</b> {time}</p>\
             <p><b>Message:</b> {message}</p>"
        );

        let mail = Message::builder()
            .from(self.from_mailbox()?)
            .to(self.notify_address.parse()?)
            .subject(format!("New Demo Request from {name}"))
            .header(ContentType::TEXT_HTML)
            .body(body)?;

        self.send(mail).await
    }

    /// Confirms a scheduled full demo to the visitor, copying the team
    pub async fn send_full_demo_confirmation(
        &self,
        to: &str,
        name: &str,
        date: &str,
        time: &str,
        selected_date_time: &str,
        message: &str,
    ) -> Result<(), EmailError> {
        let body = format!(
            "Hi {name},\n\n\
             Your full product demo has been scheduled.\n\n\
             Date: {date}\n\
             Time: {time}\n\
             Scheduled for: {selected_date_time}\n\n\
             {message}\n\n\
             We look forward to speaking with you.\n\n\
             The YoursAI Team"
        );

        let mail = Message::builder()
            .from(self.from_mailbox()?)
            .to(to.parse()?)
            .cc(self.notify_address.parse()?)
            .subject("Your YoursAI demo is scheduled")
            .header(ContentType::TEXT_PLAIN)
            .body(body)?;

        self.send(mail).await
    }

    /// Forwards a contact-form submission to the team
    pub async fn send_contact_message(
        &self,
        name: &str,
        email: &str,
        subject: &str,
        message: &str,
    ) -> Result<(), EmailError> {
        let body = format!(
            "<h2>New Contact Form Submission</h2>\
             <p><b>Name:</b> {name}</p>\
             <p><b>Email:</b> {email}</p>\
             <p><b>Message:</b></p>\
             <p>{message}</p>"
        );

        let mail = Message::builder()
            .from(self.from_mailbox()?)
            .to(self.notify_address.parse()?)
            .reply_to(email.parse()?)
            .subject(format!("Contact: {subject}"))
            .header(ContentType::TEXT_HTML)
            .body(body)?;

        self.send(mail).await
    }

    /// Forwards a job application, resume attached, to the team
    pub async fn send_job_application(
        &self,
        name: &str,
        email: &str,
        phone: &str,
        cgpa: &str,
        experience: &str,
        position: &str,
        resume: ResumeFile,
    ) -> Result<(), EmailError> {
        let body = format!(
            "<h2>New Job Application</h2>\
             <p><b>Position:</b> {position}</p>\
             <p><b>Name:</b> {name}</p>\
             <p><b>Email:</b> {email}</p>\
             <p><b>Phone:</b> {phone}</p>\
             <p><b>CGPA:</b> {cgpa}</p>\
             <p><b>Experience:</b> {experience}</p>"
        );

        let attachment_type = ContentType::parse(&resume.content_type)
            .map_err(|_| EmailError::InvalidAttachment)?;

        let multipart = MultiPart::mixed()
            .singlepart(SinglePart::html(body))
            .singlepart(Attachment::new(resume.filename).body(resume.data, attachment_type));

        let mail = Message::builder()
            .from(self.from_mailbox()?)
            .to(self.notify_address.parse()?)
            .reply_to(email.parse()?)
            .subject(format!("New Job Application: {position}"))
            .multipart(multipart)?;

        self.send(mail).await
    }

    async fn send(&self, mail: Message) -> Result<(), EmailError> {
        self.transport.send(mail).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SmtpConfig;

    fn test_smtp_config() -> SmtpConfig {
        SmtpConfig {
            host: "smtp.example.com".to_string(),
            port: 587,
            username: "noreply@example.com".to_string(),
            password: "app-password".to_string(),
            notify_address: "team@example.com".to_string(),
        }
    }

    #[tokio::test]
    async fn test_service_construction_is_offline() {
        // Building the transport must not dial the relay
        let service = EmailService::new(&test_smtp_config());
        assert!(service.is_ok());
    }

    #[tokio::test]
    async fn test_from_mailbox_includes_display_name() {
        let service = EmailService::new(&test_smtp_config()).unwrap();
        let mailbox = service.from_mailbox().unwrap();
        assert_eq!(mailbox.email.to_string(), "noreply@example.com");
    }

    #[test]
    fn test_rejects_bad_attachment_content_type() {
        let parsed = ContentType::parse("not a content type");
        assert!(parsed.is_err());
    }

    // Delivery tests require a reachable SMTP relay and live in the
    // tests/ directory behind #[ignore].
}
