//! Health check and root banner endpoints

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::app::AppState;

/// GET / - plain banner so uptime probes get a 200 from the bare origin
pub async fn root() -> &'static str {
    "Auth backend up and running"
}

/// GET /health - health check with database connectivity status
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let database = match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => "connected",
        Err(e) => {
            tracing::warn!("Health check database probe failed: {}", e);
            "disconnected"
        }
    };

    Json(json!({
        "status": if database == "connected" { "healthy" } else { "degraded" },
        "database": database,
        "version": yoursai_shared::VERSION,
    }))
}
