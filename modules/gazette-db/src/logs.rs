//! Logger repository (§4.6). Append-only: no row is ever updated.

use gazette_core::model::{LogLevel, Page, ScrapingLog};
use gazette_core::DbError;
use serde_json::Value;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

#[derive(Clone)]
pub struct LogRepo {
    pool: PgPool,
}

impl LogRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn append(
        &self,
        job_id: Uuid,
        source_id: Option<Uuid>,
        level: LogLevel,
        message: &str,
        additional_data: Value,
    ) -> Result<ScrapingLog, DbError> {
        let mut tx = self.pool.begin().await?;
        let log =
            append_tx(&mut tx, job_id, source_id, level, message, additional_data).await?;
        tx.commit().await?;
        Ok(log)
    }

    pub async fn list_for_job(
        &self,
        job_id: Uuid,
        page: i64,
        page_size: i64,
    ) -> Result<Page<ScrapingLog>, DbError> {
        let page = page.max(1);
        let page_size = page_size.clamp(1, 500);
        let offset = (page - 1) * page_size;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM scraping_logs WHERE job_id = $1")
            .bind(job_id)
            .fetch_one(&self.pool)
            .await?;

        let data = sqlx::query_as::<_, ScrapingLog>(
            r#"
            SELECT * FROM scraping_logs
            WHERE job_id = $1
            ORDER BY timestamp DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(job_id)
        .bind(page_size)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(Page::new(data, total, page, page_size))
    }
}

/// Append a log row within a caller-owned transaction, so job-row mutations
/// and their log entries commit or roll back together (§4.5).
pub async fn append_tx(
    tx: &mut Transaction<'_, Postgres>,
    job_id: Uuid,
    source_id: Option<Uuid>,
    level: LogLevel,
    message: &str,
    additional_data: Value,
) -> Result<ScrapingLog, DbError> {
    sqlx::query_as::<_, ScrapingLog>(
        r#"
        INSERT INTO scraping_logs (job_id, source_id, log_level, message, additional_data)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(job_id)
    .bind(source_id)
    .bind(level)
    .bind(message)
    .bind(additional_data)
    .fetch_one(&mut **tx)
    .await
    .map_err(DbError::from)
}
