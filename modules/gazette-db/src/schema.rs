//! Idempotent schema bootstrap. No separate migration binary: every
//! statement here is safe to run against an already-initialized database,
//! the same way the event store's own test fixtures stand up their schema.

use gazette_core::DbResult;
use sqlx::PgPool;

const ENUMS: &[(&str, &[&str])] = &[
    ("job_status", &["new", "in-progress", "successful", "partial", "failed", "cancelled"]),
    ("log_level", &["info", "warning", "error"]),
    ("content_language", &["en", "he", "ar", "other"]),
    ("processing_status", &["pending", "processing", "completed", "failed"]),
];

pub async fn init(pool: &PgPool) -> DbResult<()> {
    for (name, variants) in ENUMS {
        let labels = variants.iter().map(|v| format!("'{v}'")).collect::<Vec<_>>().join(", ");
        let stmt = format!(
            r#"DO $$ BEGIN
                CREATE TYPE {name} AS ENUM ({labels});
            EXCEPTION WHEN duplicate_object THEN null;
            END $$;"#
        );
        sqlx::query(&stmt).execute(pool).await?;
    }

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sources (
            id                         UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name                       TEXT NOT NULL,
            domain                     TEXT NOT NULL UNIQUE,
            rss_url                    TEXT NOT NULL,
            description                TEXT,
            icon_url                   TEXT,
            respect_robots_txt         BOOLEAN NOT NULL DEFAULT true,
            delay_between_requests_ms  INT NOT NULL DEFAULT 1000,
            user_agent                 TEXT NOT NULL DEFAULT 'gazette-scraper/1.0',
            timeout_ms                 INT NOT NULL DEFAULT 30000,
            is_active                  BOOLEAN NOT NULL DEFAULT true,
            created_at                 TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS scraping_jobs (
            id                      UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            triggered_at            TIMESTAMPTZ NOT NULL DEFAULT now(),
            completed_at            TIMESTAMPTZ,
            status                  job_status NOT NULL DEFAULT 'new',
            sources_requested       TEXT[] NOT NULL,
            articles_per_source     INT NOT NULL,
            total_articles_scraped  INT NOT NULL DEFAULT 0,
            total_errors            INT NOT NULL DEFAULT 0,
            progress_percent        INT,
            current_source          TEXT,
            created_at              TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at              TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    )
    .execute(pool)
    .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_scraping_jobs_triggered_at ON scraping_jobs(triggered_at)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_scraping_jobs_status ON scraping_jobs(status)")
        .execute(pool)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS scraping_logs (
            id              UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            job_id          UUID NOT NULL REFERENCES scraping_jobs(id) ON DELETE CASCADE,
            source_id       UUID,
            log_level       log_level NOT NULL,
            message         TEXT NOT NULL,
            timestamp       TIMESTAMPTZ NOT NULL DEFAULT now(),
            additional_data JSONB NOT NULL DEFAULT '{}'::jsonb
        )
        "#,
    )
    .execute(pool)
    .await?;
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_scraping_logs_job_ts ON scraping_logs(job_id, timestamp DESC)",
    )
    .execute(pool)
    .await?;
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_scraping_logs_event_type ON scraping_logs((additional_data->>'event_type'))",
    )
    .execute(pool)
    .await?;
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_scraping_logs_correlation_id ON scraping_logs((additional_data->>'correlation_id'))",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS scraped_content (
            id                 UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            source_id          UUID NOT NULL REFERENCES sources(id) ON DELETE CASCADE,
            source_url         TEXT NOT NULL UNIQUE,
            title              TEXT NOT NULL,
            content            TEXT NOT NULL,
            author             TEXT,
            publication_date   TIMESTAMPTZ,
            content_type       TEXT NOT NULL DEFAULT 'article',
            language           content_language NOT NULL,
            processing_status  processing_status NOT NULL DEFAULT 'completed',
            content_hash       TEXT NOT NULL,
            full_html          TEXT,
            category           TEXT,
            tags               TEXT[],
            created_at         TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    )
    .execute(pool)
    .await?;
    sqlx::query(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_scraped_content_hash ON scraped_content(content_hash)",
    )
    .execute(pool)
    .await?;

    Ok(())
}
