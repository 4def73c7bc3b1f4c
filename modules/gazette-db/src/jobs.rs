//! Job Manager repository (§4.1, §4.5). The Job Manager is the only writer
//! to `scraping_jobs` rows while a job is in flight.

use chrono::{DateTime, Utc};
use gazette_core::model::{JobStatus, LogLevel, Page, ScrapingJob};
use gazette_core::{DbError, LogFields};
use sqlx::PgPool;
use uuid::Uuid;

use crate::logs::append_tx;

#[derive(Clone)]
pub struct JobRepo {
    pool: PgPool,
}

impl JobRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the job row and its initial "job created" log in one
    /// transaction; on failure neither exists (§4.5).
    pub async fn create_with_log(
        &self,
        sources_requested: Vec<String>,
        articles_per_source: i32,
    ) -> Result<ScrapingJob, DbError> {
        let mut tx = self.pool.begin().await?;

        let job = sqlx::query_as::<_, ScrapingJob>(
            r#"
            INSERT INTO scraping_jobs (status, sources_requested, articles_per_source)
            VALUES ('new', $1, $2)
            RETURNING *
            "#,
        )
        .bind(&sources_requested)
        .bind(articles_per_source)
        .fetch_one(&mut *tx)
        .await?;

        let fields = LogFields::lifecycle("job_created").to_json();
        append_tx(&mut tx, job.id, None, LogLevel::Info, "Job created", fields).await?;

        tx.commit().await?;
        Ok(job)
    }

    pub async fn get(&self, id: Uuid) -> Result<ScrapingJob, DbError> {
        sqlx::query_as::<_, ScrapingJob>("SELECT * FROM scraping_jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(DbError::NotFound)
    }

    pub async fn list(
        &self,
        page: i64,
        page_size: i64,
        status: Option<JobStatus>,
    ) -> Result<Page<ScrapingJob>, DbError> {
        let page = page.max(1);
        let page_size = page_size.clamp(1, 200);
        let offset = (page - 1) * page_size;

        let total: i64 = match status {
            Some(s) => {
                sqlx::query_scalar("SELECT COUNT(*) FROM scraping_jobs WHERE status = $1")
                    .bind(s)
                    .fetch_one(&self.pool)
                    .await?
            }
            None => {
                sqlx::query_scalar("SELECT COUNT(*) FROM scraping_jobs")
                    .fetch_one(&self.pool)
                    .await?
            }
        };

        let data = match status {
            Some(s) => {
                sqlx::query_as::<_, ScrapingJob>(
                    "SELECT * FROM scraping_jobs WHERE status = $1 ORDER BY triggered_at DESC LIMIT $2 OFFSET $3",
                )
                .bind(s)
                .bind(page_size)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, ScrapingJob>(
                    "SELECT * FROM scraping_jobs ORDER BY triggered_at DESC LIMIT $1 OFFSET $2",
                )
                .bind(page_size)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(Page::new(data, total, page, page_size))
    }

    /// `new -> in-progress`. Idempotent: a no-op if already in progress or
    /// terminal.
    pub async fn mark_in_progress(&self, id: Uuid) -> Result<(), DbError> {
        sqlx::query(
            "UPDATE scraping_jobs SET status = 'in-progress', updated_at = now() \
             WHERE id = $1 AND status = 'new'",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Monotonically advances the running totals. Deltas are non-negative;
    /// callers never decrement.
    pub async fn add_counters(
        &self,
        id: Uuid,
        articles_delta: i32,
        errors_delta: i32,
    ) -> Result<(), DbError> {
        sqlx::query(
            r#"
            UPDATE scraping_jobs SET
                total_articles_scraped = total_articles_scraped + $2,
                total_errors = total_errors + $3,
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(articles_delta)
        .bind(errors_delta)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn set_progress(
        &self,
        id: Uuid,
        progress_percent: i32,
        current_source: Option<&str>,
    ) -> Result<(), DbError> {
        sqlx::query(
            "UPDATE scraping_jobs SET progress_percent = $2, current_source = $3, updated_at = now() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(progress_percent.clamp(0, 100))
        .bind(current_source)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Atomically sets the terminal status, `completed_at`, and writes the
    /// terminal log in one transaction (§4.5).
    pub async fn set_terminal(
        &self,
        id: Uuid,
        status: JobStatus,
        event_name: &'static str,
        message: &str,
    ) -> Result<ScrapingJob, DbError> {
        let mut tx = self.pool.begin().await?;

        let job = sqlx::query_as::<_, ScrapingJob>(
            r#"
            UPDATE scraping_jobs SET
                status = $2, completed_at = now(), updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_one(&mut *tx)
        .await?;

        let fields = LogFields::lifecycle(event_name).to_json();
        append_tx(&mut tx, id, None, LogLevel::Info, message, fields).await?;

        tx.commit().await?;
        Ok(job)
    }

    /// At startup, transitions any `new`/`in-progress` job older than
    /// `threshold` to `failed`, logging `stuck_job_recovery` for each.
    pub async fn recover_orphans(
        &self,
        threshold: DateTime<Utc>,
    ) -> Result<Vec<ScrapingJob>, DbError> {
        let orphans = sqlx::query_as::<_, ScrapingJob>(
            "SELECT * FROM scraping_jobs \
             WHERE status IN ('new', 'in-progress') AND triggered_at < $1",
        )
        .bind(threshold)
        .fetch_all(&self.pool)
        .await?;

        let mut recovered = Vec::with_capacity(orphans.len());
        for orphan in orphans {
            let job = self
                .set_terminal(
                    orphan.id,
                    JobStatus::Failed,
                    "stuck_job_recovery",
                    "Job recovered as failed: orphaned past the stuck-job threshold",
                )
                .await?;
            recovered.push(job);
        }
        Ok(recovered)
    }

    /// Whether `source_id` is referenced by a non-terminal job (§4.2
    /// `DeleteSource` precondition).
    pub async fn is_source_referenced_by_active_job(&self, source_id: Uuid) -> Result<bool, DbError> {
        let id_text = source_id.to_string();
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM scraping_jobs \
             WHERE status IN ('new', 'in-progress') AND $1 = ANY(sources_requested)",
        )
        .bind(&id_text)
        .fetch_one(&self.pool)
        .await?;
        Ok(count > 0)
    }
}
