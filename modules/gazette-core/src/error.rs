//! Typed errors for the engine, converging at the API boundary.

use thiserror::Error;

/// Errors surfaced by the persistence layer's repository contract.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("not found")]
    NotFound,

    /// Unique-violation absorbed as success on dedup paths (content_hash,
    /// source_url, sources.domain).
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Connection drop or statement timeout; callers may retry a bounded
    /// number of times before escalating.
    #[error("transient database error: {0}")]
    Transient(String),

    #[error("fatal database error: {0}")]
    Fatal(String),
}

impl From<sqlx::Error> for DbError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::RowNotFound => DbError::NotFound,
            sqlx::Error::Database(db_err) => {
                if db_err.code().as_deref() == Some("23505") {
                    DbError::Conflict(db_err.message().to_string())
                } else {
                    DbError::Fatal(db_err.message().to_string())
                }
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => DbError::Transient(e.to_string()),
            other => DbError::Fatal(other.to_string()),
        }
    }
}

/// The engine's top-level error kinds (§7). Each variant is attributed to the
/// boundary that raised it; logging level and job-vs-source escalation are
/// decided at the call site, not baked into the variant.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("invalid RSS feed: {0}")]
    InvalidRssFeed(String),

    #[error("source fetch failed: {0}")]
    SourceFetchFailed(String),

    #[error("extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("persistence error: {0}")]
    Persistence(#[from] DbError),

    #[error("not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

pub type DbResult<T> = std::result::Result<T, DbError>;
pub type EngineResult<T> = std::result::Result<T, EngineError>;
