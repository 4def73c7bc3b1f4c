//! Scraping Pipeline (§4.3): drives a single job from `in-progress` to a
//! terminal status, isolating per-source and per-article failures so one
//! bad source or article never aborts the run.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use gazette_core::model::{JobStatus, LogLevel, Source};
use gazette_core::LogFields;
use gazette_db::{content::NewArticle, Repos};
use tokio::sync::Semaphore;
use uuid::Uuid;

use crate::cancellation::check_cancelled;
use crate::progress::ProgressTracker;

struct SourceOutcome {
    articles_saved: i32,
    /// Set when the source itself could not be processed at all (bad id,
    /// missing row, RSS fetch/parse failure) as distinct from per-article
    /// failures within an otherwise-successful source (spec.md:92). Per-article
    /// failures are counted in the job's `total_errors` column directly and do
    /// not factor into the terminal-status decision below.
    source_failed: bool,
}

/// Runs the full per-job algorithm to completion (or cancellation) and
/// leaves the job in a terminal status.
pub async fn run_job(
    repos: Repos,
    http: reqwest::Client,
    job_id: Uuid,
    sources_requested: Vec<String>,
    articles_per_source: i32,
    cancel_flag: Arc<AtomicBool>,
    concurrent_sources: usize,
    concurrent_articles: usize,
) {
    if let Err(e) = repos.jobs.mark_in_progress(job_id).await {
        tracing::warn!(error = %e, job_id = %job_id, "failed to mark job in-progress");
        return;
    }
    let _ = repos
        .logs
        .append(
            job_id,
            None,
            LogLevel::Info,
            "Job started",
            LogFields::lifecycle("job_started").to_json(),
        )
        .await;

    let total_sources = sources_requested.len();
    let tracker = Arc::new(ProgressTracker::new(
        total_sources,
        total_sources * articles_per_source.max(1) as usize,
    ));
    let article_permits = Arc::new(Semaphore::new(concurrent_articles.max(1)));

    let outcomes: Vec<SourceOutcome> = stream::iter(sources_requested.into_iter())
        .map(|source_id_str| {
            let repos = repos.clone();
            let http = http.clone();
            let cancel_flag = cancel_flag.clone();
            let tracker = tracker.clone();
            let permits = article_permits.clone();
            async move {
                process_source(
                    repos,
                    http,
                    job_id,
                    source_id_str,
                    articles_per_source,
                    cancel_flag,
                    tracker,
                    permits,
                )
                .await
            }
        })
        .buffer_unordered(concurrent_sources.max(1))
        .collect()
        .await;

    let total_saved: i32 = outcomes.iter().map(|o| o.articles_saved).sum();

    let cancelled = cancel_flag.load(Ordering::Relaxed);
    let any_success = outcomes.iter().any(|o| o.articles_saved > 0);
    let any_failure = outcomes.iter().any(|o| o.source_failed);

    let (status, event_name, message) = if cancelled {
        (JobStatus::Cancelled, "job_cancelled", "Job cancelled")
    } else if total_saved == 0 {
        (JobStatus::Failed, "job_completed", "Job failed: no articles were scraped")
    } else if any_failure {
        (JobStatus::Partial, "job_completed", "Job completed with partial results")
    } else if any_success {
        (JobStatus::Successful, "job_completed", "Job completed successfully")
    } else {
        (JobStatus::Failed, "job_completed", "Job failed")
    };

    if let Err(e) = repos.jobs.set_terminal(job_id, status, event_name, message).await {
        tracing::error!(error = %e, job_id = %job_id, "failed to set terminal job status");
    }
}

#[allow(clippy::too_many_arguments)]
async fn process_source(
    repos: Repos,
    http: reqwest::Client,
    job_id: Uuid,
    source_id_str: String,
    articles_per_source: i32,
    cancel_flag: Arc<AtomicBool>,
    tracker: Arc<ProgressTracker>,
    article_permits: Arc<Semaphore>,
) -> SourceOutcome {
    let source_id = match Uuid::parse_str(&source_id_str) {
        Ok(id) => id,
        Err(_) => {
            log_error(&repos, job_id, None, "invalid_source_id", &source_id_str).await;
            emit_milestone(&repos, job_id, &tracker, tracker.source_done()).await;
            return SourceOutcome { articles_saved: 0, source_failed: true };
        }
    };

    let source = match repos.sources.get(source_id).await {
        Ok(s) => s,
        Err(e) => {
            log_error(&repos, job_id, Some(source_id), "source_not_found", &e.to_string()).await;
            emit_milestone(&repos, job_id, &tracker, tracker.source_done()).await;
            return SourceOutcome { articles_saved: 0, source_failed: true };
        }
    };

    let _ = repos.jobs.set_progress(job_id, 0, Some(&source.name)).await;

    if check_cancelled(&cancel_flag).await.is_err() {
        emit_milestone(&repos, job_id, &tracker, tracker.source_done()).await;
        return SourceOutcome { articles_saved: 0, source_failed: false };
    }

    let feed = match fetch_feed(&http, &source).await {
        Ok(feed) => feed,
        Err(e) => {
            log_error(&repos, job_id, Some(source_id), "rss_fetch_failed", &e).await;
            emit_milestone(&repos, job_id, &tracker, tracker.source_done()).await;
            return SourceOutcome { articles_saved: 0, source_failed: true };
        }
    };

    // RSS fetch is the first request against the source; politeness delay
    // applies to it exactly as it would to an article fetch.
    tokio::time::sleep(Duration::from_millis(source.delay_between_requests_ms as u64)).await;
    if check_cancelled(&cancel_flag).await.is_err() {
        emit_milestone(&repos, job_id, &tracker, tracker.source_done()).await;
        return SourceOutcome { articles_saved: 0, source_failed: false };
    }

    let _ = repos
        .logs
        .append(
            job_id,
            Some(source_id),
            LogLevel::Info,
            "RSS feed parsed",
            LogFields::http("rss_parsed")
                .with_url(source.rss_url.clone())
                .to_json(),
        )
        .await;

    let urls: Vec<String> = feed
        .entries
        .into_iter()
        .filter_map(|entry| entry.links.first().map(|l| l.href.clone()))
        .take(articles_per_source.max(0) as usize)
        .collect();

    let mut articles_saved = 0i32;

    for url in urls {
        if check_cancelled(&cancel_flag).await.is_err() {
            break;
        }

        let _permit = article_permits.acquire().await.expect("semaphore is never closed");
        match fetch_and_extract(&http, &source, &url).await {
            Ok(Some(article)) => match insert_with_retry(&repos, article).await {
                Ok(Some(_)) => {
                    articles_saved += 1;
                    let _ = repos.jobs.add_counters(job_id, 1, 0).await;
                    let _ = repos
                        .logs
                        .append(
                            job_id,
                            Some(source_id),
                            LogLevel::Info,
                            "Article saved",
                            LogFields::extraction("article_saved").with_url(url.clone()).to_json(),
                        )
                        .await;
                }
                Ok(None) => {
                    // duplicate, absorbed as success per the dedup contract
                }
                Err(e) => {
                    let _ = repos.jobs.add_counters(job_id, 0, 1).await;
                    log_error(&repos, job_id, Some(source_id), "persistence_failed", &e.to_string()).await;
                }
            },
            Ok(None) => {
                let _ = repos.jobs.add_counters(job_id, 0, 1).await;
                log_error(&repos, job_id, Some(source_id), "extraction_failed", &url).await;
            }
            Err(e) => {
                let _ = repos.jobs.add_counters(job_id, 0, 1).await;
                log_error(&repos, job_id, Some(source_id), "http_failed", &e).await;
            }
        }

        let percent = tracker.add_articles(1);
        emit_milestone(&repos, job_id, &tracker, percent).await;

        tokio::time::sleep(Duration::from_millis(source.delay_between_requests_ms as u64)).await;
        if check_cancelled(&cancel_flag).await.is_err() {
            break;
        }
    }

    let percent = tracker.source_done();
    emit_milestone(&repos, job_id, &tracker, percent).await;

    SourceOutcome { articles_saved, source_failed: false }
}

const MAX_PERSISTENCE_RETRIES: u32 = 3;

/// Retries a transient persistence failure with a short bounded backoff
/// before escalating it to the caller as a per-article failure (§7).
async fn insert_with_retry(
    repos: &Repos,
    article: NewArticle,
) -> Result<Option<gazette_core::model::ScrapedContent>, gazette_core::DbError> {
    let mut attempt = 0;
    loop {
        match repos.content.insert(article.clone()).await {
            Err(gazette_core::DbError::Transient(_)) if attempt < MAX_PERSISTENCE_RETRIES => {
                attempt += 1;
                tokio::time::sleep(Duration::from_millis(100 * attempt as u64)).await;
            }
            other => return other,
        }
    }
}

async fn fetch_feed(http: &reqwest::Client, source: &Source) -> Result<feed_rs::model::Feed, String> {
    let bytes = http
        .get(&source.rss_url)
        .header("User-Agent", &source.user_agent)
        .timeout(Duration::from_millis(source.timeout_ms as u64))
        .send()
        .await
        .map_err(|e| e.to_string())?
        .bytes()
        .await
        .map_err(|e| e.to_string())?;

    feed_rs::parser::parse(&bytes[..]).map_err(|e| e.to_string())
}

async fn fetch_and_extract(
    http: &reqwest::Client,
    source: &Source,
    url: &str,
) -> Result<Option<NewArticle>, String> {
    let html = http
        .get(url)
        .header("User-Agent", &source.user_agent)
        .timeout(Duration::from_millis(source.timeout_ms as u64))
        .send()
        .await
        .map_err(|e| e.to_string())?
        .text()
        .await
        .map_err(|e| e.to_string())?;

    let Some(extracted) = gazette_extractor::extract(&html) else {
        return Ok(None);
    };

    let content_hash = gazette_extractor::content_hash(&extracted.title, &extracted.content);

    Ok(Some(NewArticle {
        source_id: source.id,
        source_url: url.to_string(),
        title: extracted.title,
        content: extracted.content,
        author: extracted.author,
        publication_date: extracted.publication_date.or(Some(Utc::now())),
        language: extracted.language,
        content_hash,
        full_html: None,
    }))
}

async fn log_error(
    repos: &Repos,
    job_id: Uuid,
    source_id: Option<Uuid>,
    error_type: &'static str,
    message: &str,
) {
    let _ = repos
        .logs
        .append(
            job_id,
            source_id,
            LogLevel::Warning,
            message,
            LogFields::error("error").with_error(error_type, message).to_json(),
        )
        .await;
}

async fn emit_milestone(repos: &Repos, job_id: Uuid, tracker: &ProgressTracker, percent: i32) {
    let _ = repos.jobs.set_progress(job_id, percent, None).await;
    if let Some(milestone) = tracker.crossed_milestone(percent) {
        let _ = repos
            .logs
            .append(
                job_id,
                None,
                LogLevel::Info,
                &format!("Progress: {milestone}%"),
                LogFields::lifecycle("progress_milestone").to_json(),
            )
            .await;
    }
}
