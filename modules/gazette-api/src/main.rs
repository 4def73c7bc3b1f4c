use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use gazette_core::Config;
use gazette_db::Repos;
use gazette_pipeline::{JobManager, MetricsCache, SourceRegistry};

mod app;
mod error;
mod pagination;
mod rest;
mod state;

pub use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("gazette=info".parse()?))
        .init();

    let config = Config::from_env();

    let pool = gazette_db::connect(&config).await?;
    let repos = Repos::new(pool);

    let jobs = JobManager::new(repos.clone(), config.concurrent_sources, config.concurrent_articles);
    let recovered = jobs.recover_orphans(config.stuck_job_threshold.as_secs()).await?;
    if recovered > 0 {
        info!(recovered, "recovered orphaned jobs at startup");
    }

    let sources = SourceRegistry::new(repos.sources.clone(), repos.jobs.clone());
    let metrics = MetricsCache::new(repos.metrics.clone(), config.metrics_window_days, config.metrics_cache_ttl);

    let state = Arc::new(AppState {
        jobs,
        sources,
        content: repos.content.clone(),
        metrics,
        config: config.clone(),
    });

    let cors_origins = config.cors_origins.clone();
    let app = app::build(state, &cors_origins);

    let addr = format!("{}:{}", config.host, config.port);
    info!("Gazette scraping engine starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
