//! # Application State and Router
//!
//! Wires the database pool, configuration, and outbound service clients
//! into shared state and builds the HTTP router with its middleware stack.
//!
//! ## Sessions
//!
//! Sessions are a signed JWT carried either in an `Authorization: Bearer`
//! header or in an HttpOnly `token` cookie. Login and the OAuth callback
//! set the cookie; logout clears it. The auth middleware accepts both
//! carriers so browser clients and API clients share the same routes.

use axum::{
    extract::{Request, State},
    http::header::{AUTHORIZATION, CONTENT_TYPE, COOKIE},
    http::{HeaderMap, HeaderValue, Method},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::Config;
use crate::error::ApiError;
use crate::routes;
use crate::services::email::{EmailError, EmailService};
use crate::services::google::GoogleClient;
use crate::services::razorpay::RazorpayClient;
use yoursai_shared::auth::jwt;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "token";

/// Session cookie lifetime in seconds, matching token validity
const SESSION_MAX_AGE_SECONDS: i64 = jwt::TOKEN_VALIDITY_HOURS * 3600;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<Config>,
    pub email: EmailService,
    pub razorpay: RazorpayClient,
    pub google: GoogleClient,
}

impl AppState {
    /// Creates application state from a pool and configuration
    pub fn new(db: PgPool, config: Config) -> Result<Self, EmailError> {
        let email = EmailService::new(&config.smtp)?;
        let razorpay = RazorpayClient::new(&config.razorpay);
        let google = GoogleClient::new(&config.google);

        Ok(Self {
            db,
            config: Arc::new(config),
            email,
            razorpay,
            google,
        })
    }

    /// JWT signing secret
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Authenticated user identity injected by the auth middleware
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub email: String,
}

/// Builds the session cookie header value for a freshly issued token
pub fn session_cookie(token: &str) -> String {
    format!(
        "{SESSION_COOKIE}={token}; HttpOnly; SameSite=Lax; Max-Age={SESSION_MAX_AGE_SECONDS}; Path=/"
    )
}

/// Builds the cookie header value that clears the session
pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; HttpOnly; SameSite=Lax; Max-Age=0; Path=/")
}

/// Pulls the session token from the Bearer header or the session cookie
fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(value) = headers.get(AUTHORIZATION) {
        if let Ok(value) = value.to_str() {
            if let Some(token) = value.strip_prefix("Bearer ") {
                return Some(token.to_string());
            }
        }
    }

    let cookies = headers.get(COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then(|| value.to_string())
    })
}

/// Session-auth middleware
///
/// Rejects with 401 when no token is presented and 403 when the token
/// fails validation. On success the authenticated email is made available
/// to handlers as an `AuthUser` extension.
async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token(request.headers())
        .ok_or_else(|| ApiError::Unauthorized("Token missing".to_string()))?;

    let claims = jwt::validate_token(&token, state.jwt_secret())
        .map_err(|_| ApiError::Forbidden("Invalid token".to_string()))?;

    request.extensions_mut().insert(AuthUser { email: claims.sub });

    Ok(next.run(request).await)
}

fn build_cors(config: &Config) -> CorsLayer {
    if config.api.cors_origins.iter().any(|o| o == "*") {
        // Wildcard origins cannot be combined with credentials
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .allow_credentials(true)
}

/// Builds the application router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let cors = build_cors(&state.config);

    let protected = Router::new()
        .route("/user", get(routes::auth::current_user))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let session_routes = Router::new()
        .route("/logout", get(routes::auth::logout))
        .merge(protected);

    Router::new()
        .route("/", get(routes::health::root))
        .route("/health", get(routes::health::health))
        .route("/signup", post(routes::auth::signup))
        .route("/login", post(routes::auth::login))
        .nest("/api/auth", session_routes)
        .route("/auth/google", get(routes::oauth::google_login))
        .route("/auth/google/callback", get(routes::oauth::google_callback))
        .route("/api/payment/create-order", post(routes::payment::create_order))
        .route("/api/payment/webhook", post(routes::payment::webhook))
        .route("/api/demo", post(routes::notify::demo_request))
        .route("/api/fulldemo", post(routes::notify::full_demo))
        .route("/api/contact", post(routes::notify::contact))
        .route("/api/apply", post(routes::notify::apply))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("abc123");
        assert!(cookie.starts_with("token=abc123;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Max-Age=86400"));
        assert!(cookie.contains("Path=/"));
    }

    #[test]
    fn test_clear_cookie_expires_immediately() {
        let cookie = clear_session_cookie();
        assert!(cookie.starts_with("token=;"));
        assert!(cookie.contains("Max-Age=0"));
    }

    #[test]
    fn test_extract_token_from_bearer_header() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Bearer my-token".parse().unwrap());

        assert_eq!(extract_token(&headers), Some("my-token".to_string()));
    }

    #[test]
    fn test_extract_token_from_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, "theme=dark; token=cookie-token; a=b".parse().unwrap());

        assert_eq!(extract_token(&headers), Some("cookie-token".to_string()));
    }

    #[test]
    fn test_bearer_header_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Bearer header-token".parse().unwrap());
        headers.insert(COOKIE, "token=cookie-token".parse().unwrap());

        assert_eq!(extract_token(&headers), Some("header-token".to_string()));
    }

    #[test]
    fn test_no_token_anywhere() {
        let headers = HeaderMap::new();
        assert_eq!(extract_token(&headers), None);
    }
}
