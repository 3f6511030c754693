//! # API Error Handling
//!
//! Unified error type for all route handlers. Every error converts into an
//! HTTP response with the JSON body `{"success": false, "message": "..."}`,
//! which is the shape the frontend expects for every failure.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::services::email::EmailError;
use crate::services::google::GoogleAuthError;
use crate::services::razorpay::RazorpayError;
use yoursai_shared::auth::jwt::JwtError;
use yoursai_shared::auth::password::PasswordError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    /// 400 Bad Request
    #[error("{0}")]
    BadRequest(String),

    /// 401 Unauthorized
    #[error("{0}")]
    Unauthorized(String),

    /// 403 Forbidden
    #[error("{0}")]
    Forbidden(String),

    /// 404 Not Found
    #[error("{0}")]
    NotFound(String),

    /// 409 Conflict
    #[error("{0}")]
    Conflict(String),

    /// 500 from a failed outbound call (gateway, SMTP, OAuth provider)
    #[error("{0}")]
    Upstream(String),

    /// 500 Internal Server Error
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            // Internal error details stay out of responses
            ApiError::Internal(e) => {
                tracing::error!("Internal server error: {:?}", e);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = json!({
            "success": false,
            "message": self.message(),
        });

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                // The only unique violation reachable from a request path
                // is the users email constraint; order ids are assigned by
                // the gateway and never collide.
                ApiError::Conflict("Email already registered".to_string())
            }
            _ => {
                tracing::error!("Database error: {:?}", err);
                ApiError::Internal(err.into())
            }
        }
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        tracing::debug!("Token rejected: {}", err);
        ApiError::Forbidden("Invalid token".to_string())
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        tracing::error!("Password hashing error: {}", err);
        ApiError::Internal(err.into())
    }
}

impl From<EmailError> for ApiError {
    fn from(err: EmailError) -> Self {
        tracing::error!("Email delivery failed: {}", err);
        ApiError::Upstream("Failed to send email".to_string())
    }
}

impl From<RazorpayError> for ApiError {
    fn from(err: RazorpayError) -> Self {
        tracing::error!("Payment gateway error: {}", err);
        ApiError::Upstream("Failed to create order".to_string())
    }
}

impl From<GoogleAuthError> for ApiError {
    fn from(err: GoogleAuthError) -> Self {
        tracing::error!("Google OAuth error: {}", err);
        ApiError::Upstream("Google sign-in failed".to_string())
    }
}

impl From<axum::extract::multipart::MultipartError> for ApiError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        ApiError::BadRequest(format!("Invalid multipart body: {}", err))
    }
}

/// Collapses validator output into a single human-readable message
pub fn validation_message(errors: &validator::ValidationErrors) -> String {
    for (field, field_errors) in errors.field_errors() {
        if let Some(first) = field_errors.first() {
            if let Some(msg) = &first.message {
                return msg.to_string();
            }
            return format!("Invalid value for field '{}'", field);
        }
    }
    "Invalid request".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::BadRequest("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Unauthorized("x".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Forbidden("x".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Conflict("x".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Upstream("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_messages_pass_through() {
        assert_eq!(
            ApiError::Unauthorized("User not found".into()).message(),
            "User not found"
        );
        assert_eq!(
            ApiError::Conflict("Email already registered".into()).message(),
            "Email already registered"
        );
    }

    #[test]
    fn test_internal_error_hides_details() {
        let err = ApiError::Internal(anyhow::anyhow!("connection refused to 10.0.0.5"));
        assert_eq!(err.message(), "Internal server error");
    }

    #[test]
    fn test_unique_violation_maps_to_conflict() {
        // RowNotFound is the only sqlx variant we can construct directly
        let err: ApiError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn test_jwt_error_maps_to_forbidden() {
        let err: ApiError = JwtError::Expired.into();
        assert!(matches!(err, ApiError::Forbidden(_)));
    }
}
