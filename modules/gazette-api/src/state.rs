use std::sync::Arc;

use gazette_core::Config;
use gazette_db::ContentRepo;
use gazette_pipeline::{JobManager, MetricsCache, SourceRegistry};

pub struct AppState {
    pub jobs: JobManager,
    pub sources: SourceRegistry,
    pub content: ContentRepo,
    pub metrics: MetricsCache,
    pub config: Config,
}

pub type SharedState = Arc<AppState>;
