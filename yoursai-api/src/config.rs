//! # Configuration Management
//!
//! Loads configuration from environment variables with sensible defaults.
//! A `.env` file is honored in development via `dotenvy`.
//!
//! ## Required variables
//!
//! - `DATABASE_URL`: PostgreSQL connection string
//! - `JWT_SECRET`: Secret for signing session tokens (minimum 32 bytes)
//!
//! Everything else has a default or is only required when the feature it
//! configures is exercised (SMTP credentials, Google OAuth, Razorpay keys).

use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub smtp: SmtpConfig,
    pub google: GoogleConfig,
    pub razorpay: RazorpayConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Allowed CORS origins ("*" for permissive)
    pub cors_origins: Vec<String>,

    /// Base URL of the frontend, used for OAuth redirects
    pub frontend_url: String,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,
}

/// JWT session token configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Secret key for signing tokens (minimum 32 bytes)
    pub secret: String,
}

/// Outbound SMTP configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    /// SMTP relay host
    pub host: String,

    /// SMTP relay port (STARTTLS)
    pub port: u16,

    /// SMTP username, also used as the From address
    pub username: String,

    /// SMTP password or app password
    pub password: String,

    /// Internal mailbox that receives demo/contact/application notifications
    pub notify_address: String,
}

/// Google OAuth client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleConfig {
    pub client_id: String,
    pub client_secret: String,

    /// Redirect URI registered with Google, pointing at /auth/google/callback
    pub callback_url: String,
}

/// Razorpay gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RazorpayConfig {
    /// Public key id, also returned to the client for checkout
    pub key_id: String,

    /// API secret for basic-auth order creation
    pub key_secret: String,

    /// Shared secret for webhook signature verification
    pub webhook_secret: String,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors in production)
        let _ = dotenvy::dotenv();

        let api = ApiConfig {
            host: env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("API_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue {
                    var: "API_PORT".to_string(),
                    message: "must be a valid port number".to_string(),
                })?,
            cors_origins: env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
        };

        let database = DatabaseConfig {
            url: env::var("DATABASE_URL")
                .map_err(|_| ConfigError::MissingEnvVar("DATABASE_URL".to_string()))?,
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue {
                    var: "DATABASE_MAX_CONNECTIONS".to_string(),
                    message: "must be a positive integer".to_string(),
                })?,
        };

        let jwt = JwtConfig {
            secret: env::var("JWT_SECRET")
                .map_err(|_| ConfigError::MissingEnvVar("JWT_SECRET".to_string()))?,
        };

        if jwt.secret.len() < 32 {
            return Err(ConfigError::InvalidValue {
                var: "JWT_SECRET".to_string(),
                message: "must be at least 32 characters".to_string(),
            });
        }

        let smtp = SmtpConfig {
            host: env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.gmail.com".to_string()),
            port: env::var("SMTP_PORT")
                .unwrap_or_else(|_| "587".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue {
                    var: "SMTP_PORT".to_string(),
                    message: "must be a valid port number".to_string(),
                })?,
            username: env::var("SMTP_USERNAME").unwrap_or_default(),
            password: env::var("SMTP_PASSWORD").unwrap_or_default(),
            notify_address: env::var("NOTIFY_EMAIL")
                .or_else(|_| env::var("SMTP_USERNAME"))
                .unwrap_or_default(),
        };

        let google = GoogleConfig {
            client_id: env::var("GOOGLE_CLIENT_ID").unwrap_or_default(),
            client_secret: env::var("GOOGLE_CLIENT_SECRET").unwrap_or_default(),
            callback_url: env::var("GOOGLE_CALLBACK_URL")
                .unwrap_or_else(|_| "http://localhost:8080/auth/google/callback".to_string()),
        };

        let razorpay = RazorpayConfig {
            key_id: env::var("RAZORPAY_KEY_ID").unwrap_or_default(),
            key_secret: env::var("RAZORPAY_KEY_SECRET").unwrap_or_default(),
            webhook_secret: env::var("RAZORPAY_WEBHOOK_SECRET").unwrap_or_default(),
        };

        Ok(Config {
            api,
            database,
            jwt,
            smtp,
            google,
            razorpay,
        })
    }

    /// Returns the socket address string to bind to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                cors_origins: vec!["*".to_string()],
                frontend_url: "http://localhost:5173".to_string(),
            },
            database: DatabaseConfig {
                url: "postgres://localhost/test".to_string(),
                max_connections: 5,
            },
            jwt: JwtConfig {
                secret: "test-secret-key-that-is-long-enough!".to_string(),
            },
            smtp: SmtpConfig {
                host: "smtp.example.com".to_string(),
                port: 587,
                username: "noreply@example.com".to_string(),
                password: "password".to_string(),
                notify_address: "team@example.com".to_string(),
            },
            google: GoogleConfig {
                client_id: "client-id".to_string(),
                client_secret: "client-secret".to_string(),
                callback_url: "http://localhost:8080/auth/google/callback".to_string(),
            },
            razorpay: RazorpayConfig {
                key_id: "rzp_test_key".to_string(),
                key_secret: "rzp_test_secret".to_string(),
                webhook_secret: "webhook_secret".to_string(),
            },
        }
    }

    #[test]
    fn test_bind_address() {
        let config = test_config();
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
    }

    #[test]
    fn test_config_is_cloneable() {
        let config = test_config();
        let cloned = config.clone();
        assert_eq!(cloned.api.port, config.api.port);
        assert_eq!(cloned.razorpay.key_id, config.razorpay.key_id);
    }

    // Single test so env-var mutation cannot interleave with itself
    #[test]
    fn test_from_env_requires_and_validates_secrets() {
        env::remove_var("DATABASE_URL");
        env::remove_var("JWT_SECRET");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::MissingEnvVar(_))
        ));

        env::set_var("DATABASE_URL", "postgres://localhost/test");
        env::set_var("JWT_SECRET", "too-short");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::InvalidValue { .. })
        ));

        env::set_var("JWT_SECRET", "a-secret-that-is-comfortably-long-enough");
        assert!(Config::from_env().is_ok());

        env::remove_var("DATABASE_URL");
        env::remove_var("JWT_SECRET");
    }

    #[test]
    fn test_cors_origin_parsing() {
        let origins: Vec<String> = "http://a.com, http://b.com"
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        assert_eq!(origins, vec!["http://a.com", "http://b.com"]);
    }
}
