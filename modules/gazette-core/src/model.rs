//! Domain types shared by the persistence, pipeline, extraction, and API crates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A configured origin of articles, identified by an RSS feed URL.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Source {
    pub id: Uuid,
    pub name: String,
    pub domain: String,
    pub rss_url: String,
    pub description: Option<String>,
    pub icon_url: Option<String>,
    pub respect_robots_txt: bool,
    pub delay_between_requests_ms: i32,
    pub user_agent: String,
    pub timeout_ms: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields accepted when creating a source. Validated by the Source Registry
/// before the RSS feed is probed.
#[derive(Debug, Clone, Deserialize)]
pub struct NewSource {
    pub name: String,
    pub domain: String,
    pub rss_url: String,
    pub description: Option<String>,
    pub icon_url: Option<String>,
    pub respect_robots_txt: Option<bool>,
    pub delay_between_requests_ms: Option<i32>,
    pub user_agent: Option<String>,
    pub timeout_ms: Option<i32>,
}

/// Partial update over a source; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourcePatch {
    pub name: Option<String>,
    pub domain: Option<String>,
    pub rss_url: Option<String>,
    pub description: Option<String>,
    pub icon_url: Option<String>,
    pub respect_robots_txt: Option<bool>,
    pub delay_between_requests_ms: Option<i32>,
    pub user_agent: Option<String>,
    pub timeout_ms: Option<i32>,
    pub is_active: Option<bool>,
}

/// Status taxonomy for a `ScrapingJob`. Stored as the Postgres enum
/// `job_status`; `new` and `in-progress` are the only non-terminal values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "job_status", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum JobStatus {
    New,
    InProgress,
    Successful,
    Partial,
    Failed,
    Cancelled,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobStatus::Successful | JobStatus::Partial | JobStatus::Failed | JobStatus::Cancelled
        )
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            JobStatus::New => "new",
            JobStatus::InProgress => "in-progress",
            JobStatus::Successful => "successful",
            JobStatus::Partial => "partial",
            JobStatus::Failed => "failed",
            JobStatus::Cancelled => "cancelled",
        };
        write!(f, "{s}")
    }
}

/// A user-initiated unit of work fetching up to `articles_per_source`
/// articles from each of `sources_requested`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ScrapingJob {
    pub id: Uuid,
    pub triggered_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub status: JobStatus,
    pub sources_requested: Vec<String>,
    pub articles_per_source: i32,
    pub total_articles_scraped: i32,
    pub total_errors: i32,
    pub progress_percent: Option<i32>,
    pub current_source: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "log_level", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warning,
    Error,
}

/// An append-only event tied to a job (and optionally a source).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ScrapingLog {
    pub id: Uuid,
    pub job_id: Uuid,
    pub source_id: Option<Uuid>,
    pub log_level: LogLevel,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub additional_data: serde_json::Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "content_language", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    He,
    Ar,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "processing_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProcessingStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

/// The cleaned, persisted result of fetching and extracting a single URL.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ScrapedContent {
    pub id: Uuid,
    pub source_id: Uuid,
    pub source_url: String,
    pub title: String,
    pub content: String,
    pub author: Option<String>,
    pub publication_date: Option<DateTime<Utc>>,
    pub content_type: String,
    pub language: Language,
    pub processing_status: ProcessingStatus,
    pub content_hash: String,
    pub full_html: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
}

/// A single extracted article awaiting persistence.
#[derive(Debug, Clone)]
pub struct ExtractedArticle {
    pub title: String,
    pub content: String,
    pub author: Option<String>,
    pub publication_date: Option<DateTime<Utc>>,
    pub language: Language,
}

/// Dashboard counters computed by the Metrics Aggregator over a rolling window.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub jobs_triggered: i64,
    pub success_rate: f64,
    pub articles_scraped: i64,
    pub average_job_duration_secs: f64,
    pub active_jobs: i64,
    pub recent_errors: i64,
}

/// A page of results with the uniform list envelope used across the API.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub has_more: bool,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, total: i64, page: i64, page_size: i64) -> Self {
        let has_more = page * page_size < total;
        Self { data, total, page, page_size, has_more }
    }
}
