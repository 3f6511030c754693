/// User model and database operations
///
/// One row per account. Email is the natural key: at most one record per
/// email, enforced by a unique constraint, which is also the only
/// concurrency-safety mechanism for duplicate signups.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id          BIGSERIAL PRIMARY KEY,
///     name        TEXT,
///     email       TEXT NOT NULL UNIQUE,
///     password    TEXT,
///     phone       TEXT,
///     created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// `password` holds an Argon2id PHC string and is NULL for accounts that
/// only ever signed in through Google.
///
/// # Example
///
/// ```no_run
/// use yoursai_shared::models::user::{User, CreateUser};
/// # use sqlx::PgPool;
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let user = User::create(
///     &pool,
///     CreateUser {
///         name: Some("John Doe".to_string()),
///         email: "user@example.com".to_string(),
///         password_hash: Some("$argon2id$...".to_string()),
///         phone: None,
///     },
/// )
/// .await?;
///
/// let found = User::find_by_email(&pool, "user@example.com").await?;
/// assert!(found.is_some());
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// User account row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Surrogate identifier
    pub id: i64,

    /// Optional display name
    pub name: Option<String>,

    /// Email address — unique across all users
    pub email: String,

    /// Argon2id password hash; None for federated-only accounts
    pub password: Option<String>,

    /// Optional phone number
    pub phone: Option<String>,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Optional display name
    pub name: Option<String>,

    /// Email address (required)
    pub email: String,

    /// Argon2id password hash (NOT a plaintext password!); None marks a
    /// federated-only account
    pub password_hash: Option<String>,

    /// Optional phone number
    pub phone: Option<String>,
}

/// Public projection of a user, safe to return to clients
///
/// Never includes the password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: i64,
    pub name: Option<String>,
    pub email: String,
    pub phone: Option<String>,
}

impl User {
    /// Creates a new user in the database
    ///
    /// # Errors
    ///
    /// Returns an error if the email already exists (unique constraint
    /// violation) or the database connection fails.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password, phone)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, password, phone, created_at
            "#,
        )
        .bind(data.name)
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.phone)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by email address
    ///
    /// # Returns
    ///
    /// The user if found, None otherwise
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password, phone, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds an existing user by email or creates a federated-only account
    ///
    /// Used by the Google sign-in callback: the provider has already
    /// verified the email, so a missing row is created with no password
    /// hash. Concurrent first logins race on the unique email constraint;
    /// the loser of the race retries the lookup.
    pub async fn find_or_create_federated(
        pool: &PgPool,
        email: &str,
        name: &str,
    ) -> Result<Self, sqlx::Error> {
        if let Some(user) = Self::find_by_email(pool, email).await? {
            return Ok(user);
        }

        let created = Self::create(
            pool,
            CreateUser {
                name: Some(name.to_string()),
                email: email.to_string(),
                password_hash: None,
                phone: None,
            },
        )
        .await;

        match created {
            Ok(user) => Ok(user),
            // Lost the insert race; the row exists now
            Err(sqlx::Error::Database(e)) if e.constraint().is_some() => {
                Self::find_by_email(pool, email)
                    .await?
                    .ok_or(sqlx::Error::RowNotFound)
            }
            Err(e) => Err(e),
        }
    }

    /// Returns the public projection of this user
    pub fn public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_user_struct() {
        let create_user = CreateUser {
            name: Some("Test User".to_string()),
            email: "test@example.com".to_string(),
            password_hash: Some("hash".to_string()),
            phone: None,
        };

        assert_eq!(create_user.email, "test@example.com");
        assert_eq!(create_user.password_hash.as_deref(), Some("hash"));
    }

    #[test]
    fn test_public_projection_drops_password() {
        let user = User {
            id: 1,
            name: Some("A".to_string()),
            email: "a@x.com".to_string(),
            password: Some("$argon2id$secret".to_string()),
            phone: None,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(user.public()).unwrap();
        assert_eq!(json["email"], "a@x.com");
        assert!(json.get("password").is_none());
    }

    // Integration tests for database operations are in the API crate's
    // tests/ directory and require a running database.
}
