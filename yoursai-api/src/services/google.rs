//! # Google OAuth Client
//!
//! Implements the authorization-code flow: build the consent URL, exchange
//! the returned code for an access token, then fetch the user's profile
//! from the OpenID userinfo endpoint. Google has verified the email by the
//! time the profile reaches us.

use serde::Deserialize;
use thiserror::Error;

use crate::config::GoogleConfig;

const AUTH_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
const USERINFO_ENDPOINT: &str = "https://openidconnect.googleapis.com/v1/userinfo";

/// Google OAuth errors
#[derive(Debug, Error)]
pub enum GoogleAuthError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Token exchange rejected: {0}")]
    TokenExchange(String),

    #[error("Profile has no email address")]
    MissingEmail,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Profile fields returned by the userinfo endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleProfile {
    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub name: Option<String>,
}

/// Google OAuth authorization-code client
#[derive(Clone)]
pub struct GoogleClient {
    http: reqwest::Client,
    client_id: String,
    client_secret: String,
    callback_url: String,
}

impl GoogleClient {
    pub fn new(config: &GoogleConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            callback_url: config.callback_url.clone(),
        }
    }

    /// Builds the consent-screen URL the browser is redirected to
    pub fn authorization_url(&self) -> String {
        format!(
            "{AUTH_ENDPOINT}?client_id={}&redirect_uri={}&response_type=code&scope={}",
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.callback_url),
            urlencoding::encode("openid email profile"),
        )
    }

    /// Exchanges an authorization code for an access token
    pub async fn exchange_code(&self, code: &str) -> Result<String, GoogleAuthError> {
        let response = self
            .http
            .post(TOKEN_ENDPOINT)
            .form(&[
                ("code", code),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("redirect_uri", self.callback_url.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GoogleAuthError::TokenExchange(body));
        }

        let token = response.json::<TokenResponse>().await?;
        Ok(token.access_token)
    }

    /// Fetches the signed-in user's profile
    ///
    /// # Errors
    ///
    /// Returns `MissingEmail` if the profile carries no email address; an
    /// account cannot be keyed without one.
    pub async fn fetch_profile(&self, access_token: &str) -> Result<GoogleProfile, GoogleAuthError> {
        let profile = self
            .http
            .get(USERINFO_ENDPOINT)
            .bearer_auth(access_token)
            .send()
            .await?
            .error_for_status()?
            .json::<GoogleProfile>()
            .await?;

        if profile.email.is_none() {
            return Err(GoogleAuthError::MissingEmail);
        }

        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> GoogleClient {
        GoogleClient::new(&GoogleConfig {
            client_id: "client-123.apps.googleusercontent.com".to_string(),
            client_secret: "secret".to_string(),
            callback_url: "http://localhost:8080/auth/google/callback".to_string(),
        })
    }

    #[test]
    fn test_authorization_url_shape() {
        let url = test_client().authorization_url();

        assert!(url.starts_with("https://accounts.google.com/o/oauth2/v2/auth?"));
        assert!(url.contains("client_id=client-123.apps.googleusercontent.com"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("scope=openid%20email%20profile"));
    }

    #[test]
    fn test_callback_url_is_encoded() {
        let url = test_client().authorization_url();
        assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A8080%2Fauth%2Fgoogle%2Fcallback"));
    }

    #[test]
    fn test_profile_deserializes() {
        let profile: GoogleProfile =
            serde_json::from_str(r#"{"email":"a@gmail.com","name":"A B","sub":"123"}"#).unwrap();
        assert_eq!(profile.email.as_deref(), Some("a@gmail.com"));
        assert_eq!(profile.name.as_deref(), Some("A B"));
    }
}
