//! # Notification Routes
//!
//! Form endpoints that fan out to email: demo requests, full-demo
//! scheduling confirmations, contact-form submissions, and job
//! applications with an attached resume.
//!
//! Text fields are tolerated missing and rendered as "N/A" in the mail,
//! matching how loosely the frontend forms fill them in. The exceptions
//! are called out per handler.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::error::ApiError;
use crate::services::email::ResumeFile;

const MISSING: &str = "N/A";

/// Demo request form body
#[derive(Debug, Deserialize)]
pub struct DemoRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub message: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
}

/// Full demo scheduling body
#[derive(Debug, Deserialize)]
pub struct FullDemoRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,

    #[serde(rename = "selectedDateTime")]
    pub selected_date_time: Option<String>,

    pub message: Option<String>,
}

/// Contact form body
#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

fn or_missing(value: Option<String>) -> String {
    value.unwrap_or_else(|| MISSING.to_string())
}

/// POST /api/demo - notify the team about a demo request
pub async fn demo_request(
    State(state): State<AppState>,
    Json(payload): Json<DemoRequest>,
) -> Result<Json<Value>, ApiError> {
    state
        .email
        .send_demo_request(
            &or_missing(payload.name),
            &or_missing(payload.email),
            &or_missing(payload.phone),
            &or_missing(payload.company),
            &or_missing(payload.message),
            &or_missing(payload.date),
            &or_missing(payload.time),
        )
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Email sent successfully",
    })))
}

/// POST /api/fulldemo - confirm a scheduled full demo to the visitor
///
/// The visitor's email is the destination address, so it is the one field
/// that cannot be defaulted.
pub async fn full_demo(
    State(state): State<AppState>,
    Json(payload): Json<FullDemoRequest>,
) -> Result<Json<Value>, ApiError> {
    let Some(email) = payload.email else {
        return Err(ApiError::BadRequest("User email missing".to_string()));
    };

    state
        .email
        .send_full_demo_confirmation(
            &email,
            &or_missing(payload.name),
            &or_missing(payload.date),
            &or_missing(payload.time),
            &or_missing(payload.selected_date_time),
            &payload.message.unwrap_or_default(),
        )
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Email sent successfully",
    })))
}

/// POST /api/contact - forward a contact-form submission
pub async fn contact(
    State(state): State<AppState>,
    Json(payload): Json<ContactRequest>,
) -> Result<Json<Value>, ApiError> {
    state
        .email
        .send_contact_message(
            &or_missing(payload.name),
            &or_missing(payload.email),
            &payload.subject.unwrap_or_default(),
            &or_missing(payload.message),
        )
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Email sent successfully",
    })))
}

/// POST /api/apply - job application with resume upload
///
/// Multipart form: text fields plus a `resume` file part. Name, email,
/// position, and the resume are required.
pub async fn apply(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let mut name = None;
    let mut email = None;
    let mut phone = None;
    let mut cgpa = None;
    let mut experience = None;
    let mut position = None;
    let mut resume: Option<ResumeFile> = None;

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or_default().to_string();

        match field_name.as_str() {
            "name" => name = Some(field.text().await?),
            "email" => email = Some(field.text().await?),
            "phone" => phone = Some(field.text().await?),
            "cgpa" => cgpa = Some(field.text().await?),
            "experience" => experience = Some(field.text().await?),
            "position" => position = Some(field.text().await?),
            "resume" => {
                let filename = field
                    .file_name()
                    .unwrap_or("resume.pdf")
                    .to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field.bytes().await?.to_vec();

                resume = Some(ResumeFile {
                    filename,
                    content_type,
                    data,
                });
            }
            // Unknown parts are drained and dropped
            _ => {
                let _ = field.bytes().await?;
            }
        }
    }

    let (Some(name), Some(email), Some(position), Some(resume)) =
        (name, email, position, resume)
    else {
        return Err(ApiError::BadRequest("Missing required fields".to_string()));
    };

    state
        .email
        .send_job_application(
            &name,
            &email,
            &or_missing(phone),
            &or_missing(cgpa),
            &or_missing(experience),
            &position,
            resume,
        )
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Application sent successfully!",
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_demo_camel_case_field() {
        let payload: FullDemoRequest = serde_json::from_str(
            r#"{"email":"a@x.com","selectedDateTime":"2026-09-01 10:00"}"#,
        )
        .unwrap();

        assert_eq!(
            payload.selected_date_time.as_deref(),
            Some("2026-09-01 10:00")
        );
    }

    #[test]
    fn test_full_demo_carries_date_and_time() {
        let payload: FullDemoRequest = serde_json::from_str(
            r#"{"email":"a@x.com","date":"2026-09-01","time":"10:00","selectedDateTime":"2026-09-01 10:00"}"#,
        )
        .unwrap();

        assert_eq!(payload.date.as_deref(), Some("2026-09-01"));
        assert_eq!(payload.time.as_deref(), Some("10:00"));
    }

    #[test]
    fn test_demo_request_tolerates_empty_body() {
        let payload: DemoRequest = serde_json::from_str("{}").unwrap();
        assert!(payload.name.is_none());
        assert_eq!(or_missing(payload.name), "N/A");
    }

    #[test]
    fn test_or_missing_passes_values_through() {
        assert_eq!(or_missing(Some("x".to_string())), "x");
        assert_eq!(or_missing(None), "N/A");
    }
}
