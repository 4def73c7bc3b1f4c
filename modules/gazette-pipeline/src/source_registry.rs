//! Source Registry (§4.2): CRUD over sources with RSS-feed validation at
//! the boundary, never trusting what is already in the store.

use std::time::Duration;

use gazette_core::model::{NewSource, Source, SourcePatch};
use gazette_core::{validate, EngineError, EngineResult};
use gazette_db::{JobRepo, SourceRepo};
use uuid::Uuid;

const RSS_VALIDATION_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct SourceRegistry {
    sources: SourceRepo,
    jobs: JobRepo,
    http: reqwest::Client,
}

impl SourceRegistry {
    pub fn new(sources: SourceRepo, jobs: JobRepo) -> Self {
        Self {
            sources,
            jobs,
            http: reqwest::Client::new(),
        }
    }

    pub async fn create(&self, new: NewSource) -> EngineResult<Source> {
        validate_fields(&new.name, &new.domain, &new.rss_url)?;
        self.validate_feed(&new.rss_url).await?;
        Ok(self.sources.create(new).await?)
    }

    pub async fn update(&self, id: Uuid, patch: SourcePatch) -> EngineResult<Source> {
        if let Some(name) = &patch.name {
            if !validate::is_valid_name(name) {
                return Err(EngineError::InvalidRequest("name is invalid".into()));
            }
        }
        if let Some(domain) = &patch.domain {
            if !validate::is_valid_domain(domain) {
                return Err(EngineError::InvalidRequest("domain is invalid".into()));
            }
        }
        if let Some(rss_url) = &patch.rss_url {
            if !validate::is_valid_rss_url(rss_url) {
                return Err(EngineError::InvalidRequest("rss_url is invalid".into()));
            }
            self.validate_feed(rss_url).await?;
        }
        Ok(self.sources.update(id, patch).await?)
    }

    pub async fn delete(&self, id: Uuid) -> EngineResult<()> {
        if self.jobs.is_source_referenced_by_active_job(id).await? {
            return Err(EngineError::Conflict(
                "source is referenced by a non-terminal job".into(),
            ));
        }
        Ok(self.sources.delete(id).await?)
    }

    pub async fn get(&self, id: Uuid) -> EngineResult<Source> {
        Ok(self.sources.get(id).await?)
    }

    pub async fn list(&self) -> EngineResult<Vec<Source>> {
        Ok(self.sources.list().await?)
    }

    /// Dry-run RSS validation without persisting anything (§4.2 `TestSource`).
    pub async fn test(&self, id: Uuid) -> EngineResult<()> {
        let source = self.sources.get(id).await?;
        self.validate_feed(&source.rss_url).await
    }

    async fn validate_feed(&self, rss_url: &str) -> EngineResult<()> {
        let response = self
            .http
            .get(rss_url)
            .timeout(RSS_VALIDATION_TIMEOUT)
            .send()
            .await
            .map_err(|e| EngineError::InvalidRssFeed(format!("could not fetch feed: {e}")))?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| EngineError::InvalidRssFeed(format!("could not read feed body: {e}")))?;

        feed_rs::parser::parse(&bytes[..])
            .map_err(|e| EngineError::InvalidRssFeed(format!("could not parse feed: {e}")))?;

        Ok(())
    }
}

fn validate_fields(name: &str, domain: &str, rss_url: &str) -> EngineResult<()> {
    if !validate::is_valid_name(name) {
        return Err(EngineError::InvalidRequest("name is invalid".into()));
    }
    if !validate::is_valid_domain(domain) {
        return Err(EngineError::InvalidRequest("domain is invalid".into()));
    }
    if !validate::is_valid_rss_url(rss_url) {
        return Err(EngineError::InvalidRequest("rss_url is invalid".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_name() {
        assert!(validate_fields("", "bbc.co.uk", "https://bbc.co.uk/feed.xml").is_err());
    }

    #[test]
    fn rejects_bad_domain() {
        assert!(validate_fields("BBC", "not a domain", "https://bbc.co.uk/feed.xml").is_err());
    }

    #[test]
    fn accepts_well_formed_fields() {
        assert!(validate_fields("BBC News", "bbc.co.uk", "https://feeds.bbci.co.uk/news/rss.xml").is_ok());
    }
}
