//! Unauthenticated banner endpoint.

use axum::Json;
use serde_json::{json, Value};

/// `GET /` — fixed readiness message.
pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Sonia Video API - Ready" }))
}
