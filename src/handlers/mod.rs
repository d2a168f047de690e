use axum::Json;
use serde_json::json;

pub mod reversals;

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
