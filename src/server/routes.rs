use axum::Json;
use serde_json::{Value, json};

pub(super) mod auth;
pub(super) mod charts;
pub(super) mod trends;
pub(super) mod users;

pub async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
