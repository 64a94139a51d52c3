//! Crawl statistics and per-page reports.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What happened to a URL popped from the frontier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum PageOutcome {
    /// Cleaned content was appended and its links were considered
    Persisted { links_enqueued: usize },
    /// Fetched, but nothing survived cleaning
    SkippedEmpty,
    /// The fetcher reported failure
    FetchFailed,
    /// Canonical form was already fetched earlier in the run
    AlreadyVisited,
}

/// Why the crawl loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The page budget was spent
    TargetReached,
    /// No URLs left to fetch
    FrontierExhausted,
    /// The global crawl timeout elapsed
    TimedOut,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Termination::TargetReached => "target reached",
            Termination::FrontierExhausted => "frontier exhausted",
            Termination::TimedOut => "timed out",
        };
        f.write_str(label)
    }
}

/// A URL and what the crawl did with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageReport {
    pub url: String,
    #[serde(flatten)]
    pub outcome: PageOutcome,
}

/// Summary of a crawl run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlSummary {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub termination: Termination,
    /// Successful fetches, the quantity bounded by the page budget
    pub pages_fetched: usize,
    pub pages_persisted: usize,
    pub pages_skipped_empty: usize,
    pub fetch_failures: usize,
    pub duplicates_skipped: usize,
    pub links_enqueued: usize,
    pub pages: Vec<PageReport>,
}

impl CrawlSummary {
    pub(crate) fn start() -> Self {
        let now = Utc::now();
        Self {
            start_time: now,
            end_time: now,
            termination: Termination::FrontierExhausted,
            pages_fetched: 0,
            pages_persisted: 0,
            pages_skipped_empty: 0,
            fetch_failures: 0,
            duplicates_skipped: 0,
            links_enqueued: 0,
            pages: Vec::new(),
        }
    }

    /// Record the outcome of one frontier entry.
    pub(crate) fn record(&mut self, url: &str, outcome: PageOutcome) {
        match outcome {
            PageOutcome::Persisted { links_enqueued } => {
                self.pages_fetched += 1;
                self.pages_persisted += 1;
                self.links_enqueued += links_enqueued;
            }
            PageOutcome::SkippedEmpty => {
                self.pages_fetched += 1;
                self.pages_skipped_empty += 1;
            }
            PageOutcome::FetchFailed => self.fetch_failures += 1,
            PageOutcome::AlreadyVisited => self.duplicates_skipped += 1,
        }
        self.pages.push(PageReport {
            url: url.to_string(),
            outcome,
        });
    }

    pub(crate) fn finish(&mut self, termination: Termination) {
        self.termination = termination;
        self.end_time = Utc::now();
    }

    pub fn elapsed_secs(&self) -> i64 {
        (self.end_time - self.start_time).num_seconds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_counts_fetches() {
        let mut summary = CrawlSummary::start();
        summary.record("https://ex.com/", PageOutcome::Persisted { links_enqueued: 3 });
        summary.record("https://ex.com/a", PageOutcome::SkippedEmpty);
        summary.record("https://ex.com/b", PageOutcome::FetchFailed);
        summary.record("https://ex.com/#x", PageOutcome::AlreadyVisited);

        assert_eq!(summary.pages_fetched, 2);
        assert_eq!(summary.pages_persisted, 1);
        assert_eq!(summary.pages_skipped_empty, 1);
        assert_eq!(summary.fetch_failures, 1);
        assert_eq!(summary.duplicates_skipped, 1);
        assert_eq!(summary.links_enqueued, 3);
        assert_eq!(summary.pages.len(), 4);
    }

    #[test]
    fn test_report_serializes_flat() {
        let report = PageReport {
            url: "https://ex.com/".to_string(),
            outcome: PageOutcome::Persisted { links_enqueued: 2 },
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["outcome"], "persisted");
        assert_eq!(json["links_enqueued"], 2);
        assert_eq!(json["url"], "https://ex.com/");
    }
}
