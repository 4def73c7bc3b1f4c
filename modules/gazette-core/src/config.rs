//! Process configuration loaded from environment variables.

use std::time::Duration;

/// Configuration for the scraping engine, loaded once at process start.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_pool_max: u32,
    pub database_pool_min: u32,
    pub database_connect_timeout: Duration,

    pub host: String,
    pub port: u16,

    /// Sources processed concurrently within a job (`C_src`).
    pub concurrent_sources: usize,
    /// Articles fetched concurrently within a source (`C_art`).
    pub concurrent_articles: usize,

    /// Age past which a `new`/`in-progress` job is considered orphaned at
    /// startup recovery.
    pub stuck_job_threshold: Duration,

    pub metrics_window_days: i64,
    pub metrics_cache_ttl: Duration,

    pub cors_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let config = Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost/gazette".to_string()),
            database_pool_max: env_parse("DATABASE_POOL_MAX", 20),
            database_pool_min: env_parse("DATABASE_POOL_MIN", 2),
            database_connect_timeout: Duration::from_secs(env_parse(
                "DATABASE_POOL_CONNECTION_TIMEOUT",
                10,
            )),
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env_parse("PORT", 8080),
            concurrent_sources: env_parse("C_SRC", 4),
            concurrent_articles: env_parse("C_ART", 3),
            stuck_job_threshold: Duration::from_secs(env_parse("STUCK_JOB_THRESHOLD_SECS", 3600)),
            metrics_window_days: env_parse("METRICS_WINDOW_DAYS", 7),
            metrics_cache_ttl: Duration::from_secs(env_parse("METRICS_CACHE_TTL_SECS", 60)),
            cors_origins: std::env::var("CORS_ORIGINS")
                .unwrap_or_default()
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        };

        config.log_keys();
        config
    }

    fn log_keys(&self) {
        fn preview(url: &str) -> String {
            // never print a DSN verbatim: scheme + redacted host only
            match url::Url::parse(url) {
                Ok(u) => format!("{}://***", u.scheme()),
                Err(_) => "<unparseable>".to_string(),
            }
        }

        tracing::info!("Config loaded:");
        tracing::info!("  DATABASE_URL: {}", preview(&self.database_url));
        tracing::info!("  PORT: {}", self.port);
        tracing::info!(
            "  C_SRC={} C_ART={}",
            self.concurrent_sources,
            self.concurrent_articles
        );
        tracing::info!(
            "  STUCK_JOB_THRESHOLD_SECS: {}",
            self.stuck_job_threshold.as_secs()
        );
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}
