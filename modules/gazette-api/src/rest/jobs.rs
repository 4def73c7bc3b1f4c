use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use gazette_core::model::JobStatus;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::error::ApiError;
use crate::pagination::PageQuery;
use crate::AppState;

#[derive(Deserialize)]
pub struct TriggerScrapeRequest {
    pub sources: Vec<String>,
    #[serde(rename = "maxArticles")]
    pub max_articles: i32,
}

#[derive(Deserialize)]
pub struct ListJobsQuery {
    #[serde(flatten)]
    pub page: PageQuery,
    pub status: Option<JobStatus>,
}

pub async fn trigger(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TriggerScrapeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let job = state.jobs.create_and_start(req.sources, req.max_articles).await?;
    Ok((StatusCode::ACCEPTED, Json(json!({ "jobId": job.id }))))
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListJobsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (page, page_size) = query.page.resolve();
    let jobs = state.jobs.list_jobs(page, page_size, query.status).await?;
    Ok(Json(jobs))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let job = state.jobs.get_job(id).await?;
    Ok(Json(job))
}

pub async fn logs(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (page, page_size) = query.resolve();
    let logs = state.jobs.job_logs(id, page, page_size).await?;
    Ok(Json(logs))
}

pub async fn cancel(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.jobs.cancel(id).await?;
    Ok(Json(json!({ "cancelled": true })))
}
