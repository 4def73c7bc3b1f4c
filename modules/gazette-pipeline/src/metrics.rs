//! Metrics Aggregator caching wrapper (§4.8). Concurrent requests during
//! the TTL window share one computation: only the thread that finds the
//! cache absent or stale takes the write lock to recompute.

use std::time::{Duration, Instant};

use gazette_core::model::MetricsSnapshot;
use gazette_core::DbResult;
use gazette_db::MetricsRepo;
use tokio::sync::RwLock;

pub struct MetricsCache {
    repo: MetricsRepo,
    window_days: i64,
    ttl: Duration,
    cached: RwLock<Option<(Instant, MetricsSnapshot)>>,
}

impl MetricsCache {
    pub fn new(repo: MetricsRepo, window_days: i64, ttl: Duration) -> Self {
        Self { repo, window_days, ttl, cached: RwLock::new(None) }
    }

    pub async fn get(&self) -> DbResult<MetricsSnapshot> {
        if let Some((computed_at, snapshot)) = self.cached.read().await.as_ref() {
            if computed_at.elapsed() < self.ttl {
                return Ok(snapshot.clone());
            }
        }

        let mut cached = self.cached.write().await;
        if let Some((computed_at, snapshot)) = cached.as_ref() {
            if computed_at.elapsed() < self.ttl {
                return Ok(snapshot.clone());
            }
        }

        let snapshot = self.repo.compute(self.window_days).await?;
        *cached = Some((Instant::now(), snapshot.clone()));
        Ok(snapshot)
    }
}
