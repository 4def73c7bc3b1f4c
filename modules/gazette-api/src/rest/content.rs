use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Json};
use gazette_core::EngineError;
use gazette_db::content::ContentFilter;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::pagination::PageQuery;
use crate::AppState;

#[derive(Deserialize)]
pub struct ContentQuery {
    #[serde(flatten)]
    pub page: PageQuery,
    #[serde(flatten)]
    pub filter: ContentFilter,
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ContentQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (page, page_size) = query.page.resolve();
    let articles = state
        .content
        .list(query.filter, page, page_size)
        .await
        .map_err(EngineError::from)?;
    Ok(Json(articles))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let article = state.content.get(id).await.map_err(EngineError::from)?;
    Ok(Json(article))
}
