/// Database models for YoursAI
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: User accounts (local and Google-federated)
/// - `payment`: Payment order ledger rows
///
/// # Example
///
/// ```no_run
/// use yoursai_shared::models::user::{User, CreateUser};
/// use yoursai_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let new_user = CreateUser {
///     name: Some("John Doe".to_string()),
///     email: "user@example.com".to_string(),
///     password_hash: Some("$argon2id$...".to_string()),
///     phone: None,
/// };
///
/// let user = User::create(&pool, new_user).await?;
/// # Ok(())
/// # }
/// ```

pub mod payment;
pub mod user;
