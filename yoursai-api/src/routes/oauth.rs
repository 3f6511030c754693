//! # Google Sign-In Routes
//!
//! Authorization-code flow: `/auth/google` redirects the browser to the
//! Google consent screen; `/auth/google/callback` exchanges the returned
//! code, finds or creates the account, and redirects back to the frontend
//! with a session token.
//!
//! Provider-side failures (denied consent, rejected code) send the browser
//! back to the frontend login page rather than rendering an API error.

use axum::{
    extract::{Query, State},
    http::{header::SET_COOKIE, HeaderValue},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use crate::app::{session_cookie, AppState};
use crate::error::ApiError;
use yoursai_shared::auth::jwt::{create_token, Claims};
use yoursai_shared::models::user::User;

/// Query parameters Google appends to the callback redirect
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,

    #[serde(default)]
    pub error: Option<String>,
}

/// GET /auth/google - redirect to the Google consent screen
pub async fn google_login(State(state): State<AppState>) -> Redirect {
    Redirect::to(&state.google.authorization_url())
}

/// GET /auth/google/callback - complete the sign-in
pub async fn google_callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> Result<Response, ApiError> {
    let login_url = format!("{}/login", state.config.api.frontend_url);

    if let Some(error) = query.error {
        tracing::warn!("Google sign-in denied: {}", error);
        return Ok(Redirect::to(&login_url).into_response());
    }

    let Some(code) = query.code else {
        return Ok(Redirect::to(&login_url).into_response());
    };

    let access_token = match state.google.exchange_code(&code).await {
        Ok(token) => token,
        Err(e) => {
            tracing::warn!("Google code exchange failed: {}", e);
            return Ok(Redirect::to(&login_url).into_response());
        }
    };

    let profile = match state.google.fetch_profile(&access_token).await {
        Ok(profile) => profile,
        Err(e) => {
            tracing::warn!("Google profile fetch failed: {}", e);
            return Ok(Redirect::to(&login_url).into_response());
        }
    };

    // fetch_profile guarantees the email is present
    let email = profile.email.unwrap_or_default();
    let name = profile.name.unwrap_or_default();

    let user = User::find_or_create_federated(&state.db, &email, &name).await?;

    tracing::info!(user_id = user.id, "Google sign-in");

    let token = create_token(&Claims::new(&user.email), state.jwt_secret())?;

    let target = format!(
        "{}/auth?token={}",
        state.config.api.frontend_url,
        urlencoding::encode(&token)
    );

    let mut response = Redirect::to(&target).into_response();
    response.headers_mut().insert(
        SET_COOKIE,
        HeaderValue::from_str(&session_cookie(&token))
            .map_err(|e| ApiError::Internal(e.into()))?,
    );

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_callback_query_parses_code() {
        let query: CallbackQuery = serde_json::from_str(r#"{"code":"4/0Ab"}"#).unwrap();
        assert_eq!(query.code.as_deref(), Some("4/0Ab"));
        assert!(query.error.is_none());
    }

    #[test]
    fn test_callback_query_parses_denial() {
        let query: CallbackQuery =
            serde_json::from_str(r#"{"error":"access_denied"}"#).unwrap();
        assert!(query.code.is_none());
        assert_eq!(query.error.as_deref(), Some("access_denied"));
    }
}
