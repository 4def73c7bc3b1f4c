use std::sync::Arc;

use axum::extract::State;
use axum::response::{IntoResponse, Json};
use gazette_core::EngineError;

use crate::error::ApiError;
use crate::AppState;

pub async fn get(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let snapshot = state.metrics.get().await.map_err(EngineError::from)?;
    Ok(Json(snapshot))
}
