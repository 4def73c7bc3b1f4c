pub mod content;
pub mod jobs;
pub mod metrics;
pub mod sources;

use axum::response::{IntoResponse, Json};
use serde_json::json;

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}
