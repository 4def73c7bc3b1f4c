//! HTTP-surface integration tests, driven against the real `Router` with
//! `tower::ServiceExt::oneshot`. Requires Postgres; set `DATABASE_TEST_URL`
//! or these tests are skipped.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use gazette_core::Config;
use gazette_db::Repos;
use gazette_pipeline::{JobManager, MetricsCache, SourceRegistry};
use sqlx::PgPool;
use tower::ServiceExt;

#[path = "../src/app.rs"]
mod app;
#[path = "../src/error.rs"]
mod error;
#[path = "../src/pagination.rs"]
mod pagination;
#[path = "../src/rest/mod.rs"]
mod rest;
#[path = "../src/state.rs"]
mod state;

async fn test_app() -> Option<axum::Router> {
    let url = std::env::var("DATABASE_TEST_URL").ok()?;
    let pool = PgPool::connect(&url).await.ok()?;
    gazette_db::schema::init(&pool).await.ok()?;
    sqlx::query("TRUNCATE scraping_logs, scraped_content, scraping_jobs, sources CASCADE")
        .execute(&pool)
        .await
        .ok()?;

    let repos = Repos::new(pool);
    let jobs = JobManager::new(repos.clone(), 4, 3);
    let sources = SourceRegistry::new(repos.sources.clone(), repos.jobs.clone());
    let metrics = MetricsCache::new(repos.metrics.clone(), 7, std::time::Duration::from_secs(60));

    let state = std::sync::Arc::new(state::AppState {
        jobs,
        sources,
        content: repos.content.clone(),
        metrics,
        config: Config::from_env(),
    });

    Some(app::build(state, &[]))
}

#[tokio::test]
async fn health_check_returns_ok_without_touching_the_database() {
    let Some(app) = test_app().await else { return };

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn trigger_with_empty_sources_is_rejected() {
    let Some(app) = test_app().await else { return };

    let request = Request::builder()
        .method("POST")
        .uri("/api/scrape")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"sources": [], "maxArticles": 5}"#))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn get_unknown_job_returns_404() {
    let Some(app) = test_app().await else { return };

    let id = uuid::Uuid::new_v4();
    let request = Request::builder()
        .uri(format!("/api/jobs/{id}"))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
