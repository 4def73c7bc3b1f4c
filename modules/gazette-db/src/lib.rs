pub mod content;
pub mod jobs;
pub mod logs;
pub mod metrics;
pub mod pool;
pub mod schema;
pub mod sources;

pub use content::{ContentFilter, ContentRepo, NewArticle};
pub use jobs::JobRepo;
pub use logs::LogRepo;
pub use metrics::MetricsRepo;
pub use pool::connect;
pub use sources::SourceRepo;

use sqlx::PgPool;

/// Handle to every repository, sharing one connection pool.
#[derive(Clone)]
pub struct Repos {
    pub sources: SourceRepo,
    pub jobs: JobRepo,
    pub logs: LogRepo,
    pub content: ContentRepo,
    pub metrics: MetricsRepo,
}

impl Repos {
    pub fn new(pool: PgPool) -> Self {
        Self {
            sources: SourceRepo::new(pool.clone()),
            jobs: JobRepo::new(pool.clone()),
            logs: LogRepo::new(pool.clone()),
            content: ContentRepo::new(pool.clone()),
            metrics: MetricsRepo::new(pool),
        }
    }
}
