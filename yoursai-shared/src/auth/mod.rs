/// Authentication utilities
///
/// This module provides the authentication primitives for YoursAI:
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: Bearer-token (JWT) generation and validation
///
/// # Security Features
///
/// - **Password Hashing**: Argon2id, salted, memory-hard
/// - **Bearer Tokens**: HS256 signing with a fixed 24-hour validity window
/// - **Constant-time Comparison**: Verification never short-circuits on
///   content
///
/// # Example
///
/// ```no_run
/// use yoursai_shared::auth::password::{hash_password, verify_password};
/// use yoursai_shared::auth::jwt::{create_token, validate_token, Claims};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// // Password authentication
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// // Bearer token for a logged-in user
/// let claims = Claims::new("user@example.com");
/// let token = create_token(&claims, "secret-key-at-least-32-bytes-long!")?;
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod password;
