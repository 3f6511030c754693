//! # Authentication Routes
//!
//! Local-account signup and login, session inspection, and logout.
//!
//! Login issues a 24-hour JWT and returns it both in the response body and
//! as an HttpOnly `token` cookie, so browser and API clients can each hold
//! the session their own way.

use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use crate::app::{clear_session_cookie, session_cookie, AppState, AuthUser};
use crate::error::{validation_message, ApiError};
use yoursai_shared::auth::jwt::{create_token, Claims};
use yoursai_shared::auth::password::{hash_password, verify_password};
use yoursai_shared::models::user::{CreateUser, User};

/// Signup request body
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    pub phone: Option<String>,
}

/// Login request body
///
/// Fields are optional so a missing field maps to 400 instead of a body
/// deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// POST /signup - register a local account
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<Response, ApiError> {
    payload
        .validate()
        .map_err(|e| ApiError::BadRequest(validation_message(&e)))?;

    let password_hash = hash_password(&payload.password)?;

    // Duplicate emails surface as a unique violation, mapped to 409
    let user = User::create(
        &state.db,
        CreateUser {
            name: Some(payload.name),
            email: payload.email,
            password_hash: Some(password_hash),
            phone: payload.phone,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, "New signup");

    let body = json!({
        "success": true,
        "message": "Signup successful",
        "user": user.public(),
    });

    Ok((StatusCode::CREATED, Json(body)).into_response())
}

/// POST /login - authenticate and issue a session token
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    let (Some(email), Some(password)) = (payload.email, payload.password) else {
        return Err(ApiError::BadRequest(
            "Email and password are required".to_string(),
        ));
    };

    let user = User::find_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("User not found".to_string()))?;

    // Federated-only accounts have no hash to check against
    let verified = match &user.password {
        Some(hash) => verify_password(&password, hash)?,
        None => false,
    };

    if !verified {
        return Err(ApiError::Unauthorized("Incorrect password".to_string()));
    }

    let token = create_token(&Claims::new(&user.email), state.jwt_secret())?;

    let body = json!({
        "success": true,
        "message": "Login successful",
        "token": token,
    });

    let mut response = (StatusCode::OK, Json(body)).into_response();
    response.headers_mut().insert(
        SET_COOKIE,
        HeaderValue::from_str(&session_cookie(&token))
            .map_err(|e| ApiError::Internal(e.into()))?,
    );

    Ok(response)
}

/// GET /api/auth/user - return the account behind the current session
///
/// Requires a valid session; the auth middleware has already rejected
/// missing (401) and invalid (403) tokens before this handler runs.
pub async fn current_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user = User::find_by_email(&state.db, &auth.email)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(json!({ "user": user.public() })))
}

/// GET /api/auth/logout - clear the session cookie
///
/// Stateless tokens cannot be revoked server-side; clearing the cookie
/// ends the browser session.
pub async fn logout() -> Result<Response, ApiError> {
    let body = json!({
        "success": true,
        "message": "Logged out",
    });

    let mut response = (StatusCode::OK, Json(body)).into_response();
    response.headers_mut().insert(
        SET_COOKIE,
        HeaderValue::from_str(&clear_session_cookie())
            .map_err(|e| ApiError::Internal(e.into()))?,
    );

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signup_validation_rejects_bad_email() {
        let payload = SignupRequest {
            name: "A".to_string(),
            email: "not-an-email".to_string(),
            password: "secret".to_string(),
            phone: None,
        };

        let errors = payload.validate().unwrap_err();
        assert_eq!(validation_message(&errors), "Invalid email format");
    }

    #[test]
    fn test_signup_validation_rejects_empty_name() {
        let payload = SignupRequest {
            name: "".to_string(),
            email: "a@example.com".to_string(),
            password: "secret".to_string(),
            phone: None,
        };

        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_signup_validation_accepts_valid_payload() {
        let payload = SignupRequest {
            name: "John Doe".to_string(),
            email: "john@example.com".to_string(),
            password: "hunter2".to_string(),
            phone: Some("+911234567890".to_string()),
        };

        assert!(payload.validate().is_ok());
    }

    #[test]
    fn test_login_request_tolerates_missing_fields() {
        let payload: LoginRequest = serde_json::from_str(r#"{"email":"a@x.com"}"#).unwrap();
        assert!(payload.password.is_none());
    }
}
