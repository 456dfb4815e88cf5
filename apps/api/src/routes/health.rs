use axum::Json;
use serde_json::{json, Value};

/// GET /health
/// Liveness probe; performs no database or provider checks.
pub async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
