//! Single place HTTP status codes are chosen (§7 expansion). Handlers stay
//! free of status-code literals beyond the success path.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use chrono::Utc;
use gazette_core::{DbError, EngineError};
use serde_json::json;

pub struct ApiError(pub EngineError);

impl From<EngineError> for ApiError {
    fn from(e: EngineError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error, message) = match &self.0 {
            EngineError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, "InvalidRequest", msg.clone()),
            EngineError::InvalidRssFeed(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "InvalidRSSFeed", msg.clone())
            }
            EngineError::SourceFetchFailed(msg) => {
                (StatusCode::BAD_GATEWAY, "SourceFetchFailed", msg.clone())
            }
            EngineError::ExtractionFailed(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "ExtractionFailed", msg.clone())
            }
            EngineError::NotFound => {
                (StatusCode::NOT_FOUND, "NotFound", "resource not found".to_string())
            }
            EngineError::Conflict(msg) => (StatusCode::CONFLICT, "Conflict", msg.clone()),
            EngineError::Persistence(DbError::NotFound) => {
                (StatusCode::NOT_FOUND, "NotFound", "resource not found".to_string())
            }
            EngineError::Persistence(DbError::Conflict(msg)) => {
                (StatusCode::CONFLICT, "Conflict", msg.clone())
            }
            EngineError::Persistence(DbError::InvalidInput(msg)) => {
                (StatusCode::BAD_REQUEST, "InvalidRequest", msg.clone())
            }
            EngineError::Persistence(DbError::Transient(msg)) => {
                (StatusCode::SERVICE_UNAVAILABLE, "Transient", msg.clone())
            }
            EngineError::Persistence(DbError::Fatal(msg)) => {
                tracing::error!(error = %msg, "fatal persistence error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal", "internal error".to_string())
            }
        };

        if status.is_client_error() {
            tracing::info!(error = %self.0, "request rejected");
        } else {
            tracing::warn!(error = %self.0, "request failed");
        }

        let body = Json(json!({
            "error": error,
            "message": message,
            "statusCode": status.as_u16(),
            "timestamp": Utc::now().to_rfc3339(),
        }));
        (status, body).into_response()
    }
}
