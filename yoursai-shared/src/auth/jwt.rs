/// Bearer-token generation and validation
///
/// This module provides the signed, self-contained session credential used
/// by YoursAI. Tokens are signed with HS256 (HMAC-SHA256) and assert an
/// email identity together with an issued-at and expiry timestamp. Nothing
/// is persisted server-side; a token is valid while its signature checks
/// out and the current time is inside its validity window.
///
/// # Security
///
/// - **Algorithm**: HS256 (HMAC with SHA-256)
/// - **Expiration**: fixed 24-hour validity window
/// - **Validation**: signature, expiration, and issuer checks
/// - **Secret Management**: the signing secret should be at least 32 bytes
///
/// There is no refresh-token mechanism and no revocation list: once issued,
/// a token stays valid until it expires.
///
/// # Example
///
/// ```
/// use yoursai_shared::auth::jwt::{create_token, validate_token, Claims};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let claims = Claims::new("user@example.com");
/// let token = create_token(&claims, "your-secret-key-at-least-32-bytes")?;
///
/// let validated = validate_token(&token, "your-secret-key-at-least-32-bytes")?;
/// assert_eq!(validated.sub, "user@example.com");
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Fixed token validity window (24 hours)
pub const TOKEN_VALIDITY_HOURS: i64 = 24;

/// Issuer claim stamped into every token
const ISSUER: &str = "yoursai";

/// Error type for token operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Failed to validate token
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Invalid issuer
    #[error("Invalid token issuer")]
    InvalidIssuer,
}

/// Claims carried by a YoursAI bearer token
///
/// # Claims
///
/// - `sub`: Subject — the user's email (the natural key for lookup)
/// - `iss`: Issuer — always "yoursai"
/// - `iat`: Issued at (Unix timestamp)
/// - `exp`: Expiration (Unix timestamp, `iat` + 24h)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject — user email
    pub sub: String,

    /// Issuer — always "yoursai"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for the given email with the standard 24-hour
    /// expiry.
    ///
    /// # Example
    ///
    /// ```
    /// use yoursai_shared::auth::jwt::Claims;
    ///
    /// let claims = Claims::new("user@example.com");
    /// assert_eq!(claims.sub, "user@example.com");
    /// assert!(!claims.is_expired());
    /// ```
    pub fn new(email: &str) -> Self {
        let now = Utc::now();
        let expiration = now + Duration::hours(TOKEN_VALIDITY_HOURS);

        Self {
            sub: email.to_string(),
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        }
    }

    /// Creates claims with a custom expiration, used by tests to exercise
    /// the expiry path.
    pub fn with_expiration(email: &str, expires_in: Duration) -> Self {
        let now = Utc::now();
        let expiration = now + expires_in;

        Self {
            sub: email.to_string(),
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        }
    }

    /// Checks whether the validity window has already elapsed
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Creates a signed bearer token from claims
///
/// # Errors
///
/// Returns `JwtError::CreateError` if token encoding fails
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a bearer token and extracts its claims
///
/// Verifies:
/// - Signature is valid
/// - Token hasn't expired
/// - Issuer is "yoursai"
///
/// # Errors
///
/// Returns `JwtError::Expired` for an elapsed validity window,
/// `JwtError::InvalidIssuer` for a foreign issuer, and
/// `JwtError::ValidationError` for any other failure (bad signature,
/// malformed token).
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidIssuer => JwtError::InvalidIssuer,
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}
