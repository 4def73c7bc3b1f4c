//! Per-job cancellation signals (§4.1 dispatch mechanism expansion).
//!
//! Entries live only while a job is in flight: `CancelJob` on an id that
//! isn't registered (already terminal, or the process restarted) is a
//! harmless no-op, and `RecoverOrphans` reconciles that case at startup.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;
use uuid::Uuid;

/// Returned by [`check_cancelled`] at a suspension point once a job's flag
/// has been flipped; callers unwind to terminal handling rather than
/// propagating this as an `EngineError`.
#[derive(Debug, Clone, Copy)]
pub struct Cancelled;

#[derive(Clone, Default)]
pub struct CancellationRegistry {
    flags: Arc<Mutex<HashMap<Uuid, Arc<AtomicBool>>>>,
}

impl CancellationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register(&self, job_id: Uuid) -> Arc<AtomicBool> {
        let flag = Arc::new(AtomicBool::new(false));
        self.flags.lock().await.insert(job_id, flag.clone());
        flag
    }

    /// Flips the flag if the job is still in flight. No-op otherwise.
    pub async fn cancel(&self, job_id: Uuid) -> bool {
        match self.flags.lock().await.get(&job_id) {
            Some(flag) => {
                flag.store(true, Ordering::Relaxed);
                true
            }
            None => false,
        }
    }

    pub async fn unregister(&self, job_id: Uuid) {
        self.flags.lock().await.remove(&job_id);
    }
}

/// Checked at every suspension point: before each RSS/article fetch and
/// after each politeness delay.
pub async fn check_cancelled(flag: &AtomicBool) -> Result<(), Cancelled> {
    if flag.load(Ordering::Relaxed) {
        Err(Cancelled)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn cancel_on_registered_job_flips_flag() {
        let registry = CancellationRegistry::new();
        let job_id = Uuid::new_v4();
        let flag = registry.register(job_id).await;

        assert!(registry.cancel(job_id).await);
        assert!(check_cancelled(&flag).await.is_err());
    }

    #[tokio::test]
    async fn cancel_on_unknown_job_is_a_harmless_no_op() {
        let registry = CancellationRegistry::new();
        assert!(!registry.cancel(Uuid::new_v4()).await);
    }

    #[tokio::test]
    async fn unregister_drops_the_entry() {
        let registry = CancellationRegistry::new();
        let job_id = Uuid::new_v4();
        registry.register(job_id).await;
        registry.unregister(job_id).await;
        assert!(!registry.cancel(job_id).await);
    }
}
