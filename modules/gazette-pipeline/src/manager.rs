//! Job Manager (§4.1): owns job lifecycle, dispatches the Scraping
//! Pipeline, and reconciles orphaned jobs at startup.

use gazette_core::model::{JobStatus, Page, ScrapingJob, ScrapingLog};
use gazette_core::{validate, EngineError, EngineResult};
use gazette_db::Repos;
use uuid::Uuid;

use crate::cancellation::CancellationRegistry;
use crate::pipeline;

#[derive(Clone)]
pub struct JobManager {
    repos: Repos,
    http: reqwest::Client,
    cancellation: CancellationRegistry,
    concurrent_sources: usize,
    concurrent_articles: usize,
}

impl JobManager {
    pub fn new(repos: Repos, concurrent_sources: usize, concurrent_articles: usize) -> Self {
        Self {
            repos,
            http: reqwest::Client::new(),
            cancellation: CancellationRegistry::new(),
            concurrent_sources,
            concurrent_articles,
        }
    }

    /// Resolves source names to ids, validates, creates the job row, and
    /// dispatches the run. Returns as soon as the row exists and the run has
    /// been spawned — the caller (API handler) responds `202` immediately.
    pub async fn create_and_start(
        &self,
        source_names: Vec<String>,
        articles_per_source: i32,
    ) -> EngineResult<ScrapingJob> {
        if source_names.is_empty() {
            return Err(EngineError::InvalidRequest("sources must not be empty".into()));
        }
        if articles_per_source < 1 {
            return Err(EngineError::InvalidRequest("maxArticles must be at least 1".into()));
        }

        let mut source_ids = Vec::with_capacity(source_names.len());
        for name in &source_names {
            if !validate::is_valid_name(name) {
                return Err(EngineError::InvalidRequest(format!("invalid source name: {name}")));
            }
            let source = self.repos.sources.get_by_name(name).await.map_err(|_| {
                EngineError::InvalidRequest(format!("unknown or inactive source: {name}"))
            })?;
            if !source.is_active {
                return Err(EngineError::InvalidRequest(format!("source is inactive: {name}")));
            }
            source_ids.push(source.id.to_string());
        }

        let job = self.repos.jobs.create_with_log(source_ids.clone(), articles_per_source).await?;
        self.start(job.id, source_ids, articles_per_source).await;
        Ok(job)
    }

    /// Idempotent: spawns the pipeline run for a job that is still `new`.
    async fn start(&self, job_id: Uuid, source_ids: Vec<String>, articles_per_source: i32) {
        let cancel_flag = self.cancellation.register(job_id).await;
        let repos = self.repos.clone();
        let http = self.http.clone();
        let cancellation = self.cancellation.clone();
        let concurrent_sources = self.concurrent_sources;
        let concurrent_articles = self.concurrent_articles;

        tokio::spawn(async move {
            pipeline::run_job(
                repos,
                http,
                job_id,
                source_ids,
                articles_per_source,
                cancel_flag,
                concurrent_sources,
                concurrent_articles,
            )
            .await;
            cancellation.unregister(job_id).await;
        });
    }

    /// No-op if the job is not currently in flight or is already terminal.
    pub async fn cancel(&self, job_id: Uuid) -> EngineResult<()> {
        let job = self.repos.jobs.get(job_id).await?;
        if job.status.is_terminal() {
            return Err(EngineError::Conflict("job is already terminal".into()));
        }
        self.cancellation.cancel(job_id).await;
        Ok(())
    }

    pub async fn get_job(&self, job_id: Uuid) -> EngineResult<ScrapingJob> {
        Ok(self.repos.jobs.get(job_id).await?)
    }

    pub async fn list_jobs(
        &self,
        page: i64,
        page_size: i64,
        status: Option<JobStatus>,
    ) -> EngineResult<Page<ScrapingJob>> {
        Ok(self.repos.jobs.list(page, page_size, status).await?)
    }

    pub async fn job_logs(
        &self,
        job_id: Uuid,
        page: i64,
        page_size: i64,
    ) -> EngineResult<Page<ScrapingLog>> {
        // Surfaces NotFound for an unknown job rather than an empty page.
        self.repos.jobs.get(job_id).await?;
        Ok(self.repos.logs.list_for_job(job_id, page, page_size).await?)
    }

    /// At startup, transitions any orphaned `new`/`in-progress` job to
    /// `failed`. The only write path that may terminate a job without the
    /// Scraping Pipeline's participation.
    pub async fn recover_orphans(&self, threshold_secs: u64) -> EngineResult<usize> {
        let threshold = chrono::Utc::now() - chrono::Duration::seconds(threshold_secs as i64);
        let recovered = self.repos.jobs.recover_orphans(threshold).await?;
        Ok(recovered.len())
    }
}
