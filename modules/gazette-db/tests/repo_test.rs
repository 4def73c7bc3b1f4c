//! Integration tests for the repository layer.
//! Requires a Postgres instance. Set DATABASE_TEST_URL or these tests are skipped.

use gazette_core::model::{JobStatus, NewSource};
use gazette_db::content::NewArticle;
use gazette_db::Repos;
use sqlx::PgPool;

async fn test_repos() -> Option<Repos> {
    let url = std::env::var("DATABASE_TEST_URL").ok()?;
    let pool = PgPool::connect(&url).await.ok()?;

    gazette_db::schema::init(&pool).await.ok()?;

    // Clean slate for each test.
    sqlx::query("TRUNCATE scraping_logs, scraped_content, scraping_jobs, sources CASCADE")
        .execute(&pool)
        .await
        .ok()?;

    Some(Repos::new(pool))
}

#[tokio::test]
async fn create_job_writes_job_and_created_log_in_one_transaction() {
    let Some(repos) = test_repos().await else { return };

    let job = repos
        .jobs
        .create_with_log(vec!["source-a".into()], 5)
        .await
        .unwrap();
    assert_eq!(job.status, JobStatus::New);
    assert_eq!(job.total_articles_scraped, 0);

    let logs = repos.logs.list_for_job(job.id, 1, 10).await.unwrap();
    assert_eq!(logs.data.len(), 1);
    assert_eq!(logs.data[0].additional_data["event_name"], "job_created");
}

#[tokio::test]
async fn set_terminal_sets_completed_at_and_writes_terminal_log() {
    let Some(repos) = test_repos().await else { return };

    let job = repos.jobs.create_with_log(vec!["a".into()], 1).await.unwrap();
    repos.jobs.mark_in_progress(job.id).await.unwrap();

    let terminal = repos
        .jobs
        .set_terminal(job.id, JobStatus::Successful, "job_completed", "Job completed")
        .await
        .unwrap();

    assert!(terminal.completed_at.is_some());
    assert_eq!(terminal.status, JobStatus::Successful);

    let logs = repos.logs.list_for_job(job.id, 1, 10).await.unwrap();
    assert!(logs
        .data
        .iter()
        .any(|l| l.additional_data["event_name"] == "job_completed"));
}

#[tokio::test]
async fn recover_orphans_transitions_stale_jobs_to_failed() {
    let Some(repos) = test_repos().await else { return };

    let job = repos.jobs.create_with_log(vec!["a".into()], 1).await.unwrap();
    repos.jobs.mark_in_progress(job.id).await.unwrap();

    // threshold in the future catches everything regardless of age
    let recovered = repos
        .jobs
        .recover_orphans(chrono::Utc::now() + chrono::Duration::hours(1))
        .await
        .unwrap();

    assert_eq!(recovered.len(), 1);
    assert_eq!(recovered[0].status, JobStatus::Failed);

    let logs = repos.logs.list_for_job(job.id, 1, 10).await.unwrap();
    assert!(logs
        .data
        .iter()
        .any(|l| l.additional_data["event_name"] == "stuck_job_recovery"));
}

#[tokio::test]
async fn duplicate_source_url_is_absorbed_not_inserted_twice() {
    let Some(repos) = test_repos().await else { return };

    let source = repos
        .sources
        .create(NewSource {
            name: "BBC News".into(),
            domain: "bbc.co.uk".into(),
            rss_url: "https://feeds.bbci.co.uk/news/rss.xml".into(),
            description: None,
            icon_url: None,
            respect_robots_txt: None,
            delay_between_requests_ms: None,
            user_agent: None,
            timeout_ms: None,
        })
        .await
        .unwrap();

    let article = NewArticle {
        source_id: source.id,
        source_url: "https://bbc.co.uk/article-1".into(),
        title: "Headline".into(),
        content: "Body text that is long enough to pass the minimum length check.".into(),
        author: None,
        publication_date: None,
        language: gazette_core::model::Language::En,
        content_hash: "hash-1".into(),
        full_html: None,
    };

    let first = repos.content.insert(article.clone()).await.unwrap();
    assert!(first.is_some());

    let second = repos.content.insert(article).await.unwrap();
    assert!(second.is_none());

    let page = repos
        .content
        .list(Default::default(), 1, 10)
        .await
        .unwrap();
    assert_eq!(page.total, 1);
}

#[tokio::test]
async fn duplicate_content_hash_different_url_is_still_absorbed() {
    let Some(repos) = test_repos().await else { return };

    let source = repos
        .sources
        .create(NewSource {
            name: "Source".into(),
            domain: "example.com".into(),
            rss_url: "https://example.com/feed.xml".into(),
            description: None,
            icon_url: None,
            respect_robots_txt: None,
            delay_between_requests_ms: None,
            user_agent: None,
            timeout_ms: None,
        })
        .await
        .unwrap();

    let base = NewArticle {
        source_id: source.id,
        source_url: "https://example.com/a".into(),
        title: "Same Title".into(),
        content: "Same content body that is long enough for extraction.".into(),
        author: None,
        publication_date: None,
        language: gazette_core::model::Language::En,
        content_hash: "same-hash".into(),
        full_html: None,
    };
    repos.content.insert(base.clone()).await.unwrap();

    let mut duplicate = base;
    duplicate.source_url = "https://example.com/b".into();
    let result = repos.content.insert(duplicate).await.unwrap();
    assert!(result.is_none());
}
