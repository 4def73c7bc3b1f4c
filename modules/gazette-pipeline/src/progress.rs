//! Progress-percent math (§4.1): `0.3 * sourcesProcessed/totalSources +
//! 0.7 * articlesProcessed/expectedArticles`, clamped to `[0, 100]`, with
//! milestone logs at 25/50/75/100.

use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};

pub const MILESTONES: [i32; 4] = [25, 50, 75, 100];

pub struct ProgressTracker {
    total_sources: usize,
    expected_articles: usize,
    sources_processed: AtomicUsize,
    articles_processed: AtomicUsize,
    last_milestone: AtomicI32,
}

impl ProgressTracker {
    pub fn new(total_sources: usize, expected_articles: usize) -> Self {
        Self {
            total_sources: total_sources.max(1),
            expected_articles: expected_articles.max(1),
            sources_processed: AtomicUsize::new(0),
            articles_processed: AtomicUsize::new(0),
            last_milestone: AtomicI32::new(-1),
        }
    }

    fn percent(&self) -> i32 {
        let sources_ratio =
            self.sources_processed.load(Ordering::Relaxed) as f64 / self.total_sources as f64;
        let articles_ratio =
            self.articles_processed.load(Ordering::Relaxed) as f64 / self.expected_articles as f64;
        let percent = 0.3 * sources_ratio + 0.7 * articles_ratio.min(1.0);
        ((percent * 100.0).round() as i32).clamp(0, 100)
    }

    pub fn add_articles(&self, count: usize) -> i32 {
        self.articles_processed.fetch_add(count, Ordering::Relaxed);
        self.percent()
    }

    pub fn source_done(&self) -> i32 {
        self.sources_processed.fetch_add(1, Ordering::Relaxed);
        self.percent()
    }

    /// Returns the milestone just crossed, if any, and marks it emitted so
    /// it is never reported twice.
    pub fn crossed_milestone(&self, percent: i32) -> Option<i32> {
        MILESTONES
            .into_iter()
            .filter(|m| percent >= *m)
            .max()
            .filter(|m| {
                self.last_milestone
                    .fetch_max(*m, Ordering::Relaxed)
                    < *m
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_weights_sources_and_articles() {
        let tracker = ProgressTracker::new(2, 10);
        tracker.source_done();
        tracker.add_articles(5);
        // 0.3 * 1/2 + 0.7 * 5/10 = 0.15 + 0.35 = 0.50 -> 50
        assert_eq!(tracker.percent(), 50);
    }

    #[test]
    fn percent_never_exceeds_one_hundred() {
        let tracker = ProgressTracker::new(1, 1);
        tracker.source_done();
        tracker.add_articles(5);
        assert_eq!(tracker.percent(), 100);
    }

    #[test]
    fn each_milestone_is_reported_exactly_once() {
        let tracker = ProgressTracker::new(1, 1);
        assert_eq!(tracker.crossed_milestone(30), Some(25));
        assert_eq!(tracker.crossed_milestone(30), None);
        assert_eq!(tracker.crossed_milestone(80), Some(75));
        assert_eq!(tracker.crossed_milestone(100), Some(100));
    }
}
