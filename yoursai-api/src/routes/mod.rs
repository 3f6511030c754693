/// API route handlers
///
/// # Routes
///
/// - `health`: Root banner and health check
/// - `auth`: Signup, login, session inspection, logout
/// - `oauth`: Google sign-in redirect and callback
/// - `payment`: Order creation and gateway webhook
/// - `notify`: Demo, contact, and job-application mail endpoints

pub mod auth;
pub mod health;
pub mod notify;
pub mod oauth;
pub mod payment;
