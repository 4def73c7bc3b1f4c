//! Persistence for `ScrapedContent` (§4.4, §4.5). Duplicate suppression is
//! enforced entirely by the database via unique indexes on `source_url` and
//! `content_hash`; a single `INSERT ... ON CONFLICT DO NOTHING` absorbs either
//! collision atomically, so concurrent inserts can never race past a
//! check-then-insert window.

use gazette_core::model::{Language, Page, ProcessingStatus, ScrapedContent};
use gazette_core::DbError;
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct NewArticle {
    pub source_id: Uuid,
    pub source_url: String,
    pub title: String,
    pub content: String,
    pub author: Option<String>,
    pub publication_date: Option<chrono::DateTime<chrono::Utc>>,
    pub language: Language,
    pub content_hash: String,
    pub full_html: Option<String>,
}

#[derive(Default, Debug, Clone, Deserialize)]
pub struct ContentFilter {
    pub search: Option<String>,
    pub source: Option<Uuid>,
    pub language: Option<Language>,
    pub status: Option<ProcessingStatus>,
}

#[derive(Clone)]
pub struct ContentRepo {
    pool: sqlx::PgPool,
}

impl ContentRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }

    /// Returns `Ok(None)` when the article was absorbed as a duplicate
    /// rather than inserted (§8 invariant 6, invariant 4).
    pub async fn insert(&self, article: NewArticle) -> Result<Option<ScrapedContent>, DbError> {
        let row = sqlx::query_as::<_, ScrapedContent>(
            r#"
            INSERT INTO scraped_content
                (source_id, source_url, title, content, author, publication_date,
                 language, processing_status, content_hash, full_html)
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'completed', $8, $9)
            ON CONFLICT DO NOTHING
            RETURNING *
            "#,
        )
        .bind(article.source_id)
        .bind(article.source_url)
        .bind(article.title)
        .bind(article.content)
        .bind(article.author)
        .bind(article.publication_date)
        .bind(article.language)
        .bind(article.content_hash)
        .bind(article.full_html)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get(&self, id: Uuid) -> Result<ScrapedContent, DbError> {
        sqlx::query_as::<_, ScrapedContent>("SELECT * FROM scraped_content WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(DbError::NotFound)
    }

    pub async fn list(
        &self,
        filter: ContentFilter,
        page: i64,
        page_size: i64,
    ) -> Result<Page<ScrapedContent>, DbError> {
        let page = page.max(1);
        let page_size = page_size.clamp(1, 200);
        let offset = (page - 1) * page_size;
        let search_pattern = filter.search.map(|s| format!("%{s}%"));

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM scraped_content
            WHERE ($1::text IS NULL OR title ILIKE $1 OR content ILIKE $1)
              AND ($2::uuid IS NULL OR source_id = $2)
              AND ($3::content_language IS NULL OR language = $3)
              AND ($4::processing_status IS NULL OR processing_status = $4)
            "#,
        )
        .bind(&search_pattern)
        .bind(filter.source)
        .bind(filter.language)
        .bind(filter.status)
        .fetch_one(&self.pool)
        .await?;

        let data = sqlx::query_as::<_, ScrapedContent>(
            r#"
            SELECT * FROM scraped_content
            WHERE ($1::text IS NULL OR title ILIKE $1 OR content ILIKE $1)
              AND ($2::uuid IS NULL OR source_id = $2)
              AND ($3::content_language IS NULL OR language = $3)
              AND ($4::processing_status IS NULL OR processing_status = $4)
            ORDER BY created_at DESC
            LIMIT $5 OFFSET $6
            "#,
        )
        .bind(&search_pattern)
        .bind(filter.source)
        .bind(filter.language)
        .bind(filter.status)
        .bind(page_size)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(Page::new(data, total, page, page_size))
    }
}
