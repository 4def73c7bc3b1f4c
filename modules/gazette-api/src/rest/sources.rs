use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use gazette_core::model::{NewSource, SourcePatch};
use serde_json::json;
use uuid::Uuid;

use crate::error::ApiError;
use crate::AppState;

pub async fn list(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let sources = state.sources.list().await?;
    Ok(Json(sources))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let source = state.sources.get(id).await?;
    Ok(Json(source))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewSource>,
) -> Result<impl IntoResponse, ApiError> {
    let source = state.sources.create(payload).await?;
    Ok((StatusCode::CREATED, Json(source)))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(patch): Json<SourcePatch>,
) -> Result<impl IntoResponse, ApiError> {
    let source = state.sources.update(id, patch).await?;
    Ok(Json(source))
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.sources.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn test(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.sources.test(id).await?;
    Ok(Json(json!({ "ok": true })))
}
