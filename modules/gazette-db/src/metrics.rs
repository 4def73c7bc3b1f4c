//! Metrics Aggregator queries (§4.8). Caching lives in `gazette-pipeline`;
//! this repository only computes a fresh snapshot.

use gazette_core::model::MetricsSnapshot;
use gazette_core::DbError;
use sqlx::PgPool;

#[derive(Clone)]
pub struct MetricsRepo {
    pool: PgPool,
}

impl MetricsRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn compute(&self, window_days: i64) -> Result<MetricsSnapshot, DbError> {
        let jobs_triggered: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM scraping_jobs WHERE triggered_at > now() - ($1 || ' days')::interval",
        )
        .bind(window_days.to_string())
        .fetch_one(&self.pool)
        .await?;

        let completed: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM scraping_jobs
            WHERE triggered_at > now() - ($1 || ' days')::interval
              AND status IN ('successful', 'partial')
            "#,
        )
        .bind(window_days.to_string())
        .fetch_one(&self.pool)
        .await?;

        let success_rate = if jobs_triggered > 0 {
            (completed as f64 / jobs_triggered as f64 * 100.0 * 100.0).round() / 100.0
        } else {
            0.0
        };

        let articles_scraped: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(total_articles_scraped), 0) FROM scraping_jobs \
             WHERE triggered_at > now() - ($1 || ' days')::interval",
        )
        .bind(window_days.to_string())
        .fetch_one(&self.pool)
        .await?;

        let average_job_duration_secs: f64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(AVG(EXTRACT(EPOCH FROM (completed_at - triggered_at))), 0)
            FROM scraping_jobs
            WHERE triggered_at > now() - ($1 || ' days')::interval AND completed_at IS NOT NULL
            "#,
        )
        .bind(window_days.to_string())
        .fetch_one(&self.pool)
        .await?;

        let active_jobs: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM scraping_jobs WHERE status IN ('new', 'in-progress')",
        )
        .fetch_one(&self.pool)
        .await?;

        let recent_errors: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM scraping_jobs WHERE status = 'failed' AND triggered_at > now() - interval '24 hours'",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(MetricsSnapshot {
            jobs_triggered,
            success_rate,
            articles_scraped,
            average_job_duration_secs,
            active_jobs,
            recent_errors,
        })
    }
}
