//! Source Registry repository (§4.2, §4.5).

use gazette_core::model::{NewSource, Source, SourcePatch};
use gazette_core::DbError;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct SourceRepo {
    pool: PgPool,
}

impl SourceRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new: NewSource) -> Result<Source, DbError> {
        sqlx::query_as::<_, Source>(
            r#"
            INSERT INTO sources
                (name, domain, rss_url, description, icon_url, respect_robots_txt,
                 delay_between_requests_ms, user_agent, timeout_ms)
            VALUES ($1, $2, $3, $4, $5, COALESCE($6, true), COALESCE($7, 1000),
                    COALESCE($8, 'gazette-scraper/1.0'), COALESCE($9, 30000))
            RETURNING *
            "#,
        )
        .bind(new.name)
        .bind(new.domain)
        .bind(new.rss_url)
        .bind(new.description)
        .bind(new.icon_url)
        .bind(new.respect_robots_txt)
        .bind(new.delay_between_requests_ms)
        .bind(new.user_agent)
        .bind(new.timeout_ms)
        .fetch_one(&self.pool)
        .await
        .map_err(DbError::from)
    }

    pub async fn update(&self, id: Uuid, patch: SourcePatch) -> Result<Source, DbError> {
        let existing = self.get(id).await?;
        sqlx::query_as::<_, Source>(
            r#"
            UPDATE sources SET
                name = $2, domain = $3, rss_url = $4, description = $5, icon_url = $6,
                respect_robots_txt = $7, delay_between_requests_ms = $8,
                user_agent = $9, timeout_ms = $10, is_active = $11
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(patch.name.unwrap_or(existing.name))
        .bind(patch.domain.unwrap_or(existing.domain))
        .bind(patch.rss_url.unwrap_or(existing.rss_url))
        .bind(patch.description.or(existing.description))
        .bind(patch.icon_url.or(existing.icon_url))
        .bind(patch.respect_robots_txt.unwrap_or(existing.respect_robots_txt))
        .bind(patch.delay_between_requests_ms.unwrap_or(existing.delay_between_requests_ms))
        .bind(patch.user_agent.unwrap_or(existing.user_agent))
        .bind(patch.timeout_ms.unwrap_or(existing.timeout_ms))
        .bind(patch.is_active.unwrap_or(existing.is_active))
        .fetch_one(&self.pool)
        .await
        .map_err(DbError::from)
    }

    /// Forbidden if referenced by a non-terminal job; the caller (Source
    /// Registry) checks `jobs.is_source_referenced_by_active_job` first.
    pub async fn delete(&self, id: Uuid) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM sources WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }
        Ok(())
    }

    pub async fn get(&self, id: Uuid) -> Result<Source, DbError> {
        sqlx::query_as::<_, Source>("SELECT * FROM sources WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(DbError::NotFound)
    }

    pub async fn get_by_name(&self, name: &str) -> Result<Source, DbError> {
        sqlx::query_as::<_, Source>("SELECT * FROM sources WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(DbError::NotFound)
    }

    pub async fn list(&self) -> Result<Vec<Source>, DbError> {
        sqlx::query_as::<_, Source>("SELECT * FROM sources ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(DbError::from)
    }
}
