// handlers/public/mod.rs - Public handlers (no authentication required)

use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::{json, Value};

use crate::app::AppState;

/// GET / - Plain-text greeting
pub async fn index() -> &'static str {
    "Hello from espresso"
}

/// GET /health - Liveness plus a database round trip
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let (status, healthy, database) = match state.store.health_check().await {
        Ok(()) => (StatusCode::OK, true, "connected"),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, false, "unavailable")
        }
    };

    (
        status,
        Json(json!({
            "success": healthy,
            "data": {
                "status": if healthy { "ok" } else { "degraded" },
                "timestamp": chrono::Utc::now(),
                "database": database,
            }
        })),
    )
}
