//! Breadth-first crawl frontier.
//!
//! The queue holds URLs as discovered and performs no deduplication on admission.
//! Identity is decided at pop time through the visited set, so the same
//! page may sit in the queue more than once until the first copy is fetched.

use std::collections::{HashSet, VecDeque};

use url::Url;

use crate::models::CanonicalUrl;

/// Pending queue plus the set of canonical URLs already fetched.
#[derive(Debug, Default)]
pub struct CrawlFrontier {
    queue: VecDeque<Url>,
    visited: HashSet<CanonicalUrl>,
}

impl CrawlFrontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset the queue to a single entry.
    pub fn seed(&mut self, url: Url) {
        self.queue.clear();
        self.queue.push_back(url);
    }

    /// Pop the oldest pending URL.
    pub fn next(&mut self) -> Option<Url> {
        self.queue.pop_front()
    }

    /// Append a URL to the tail without consulting the visited set.
    pub fn enqueue(&mut self, url: Url) {
        self.queue.push_back(url);
    }

    /// Record a page as fetched. Returns `false` if it already was.
    pub fn mark_visited(&mut self, url: CanonicalUrl) -> bool {
        self.visited.insert(url)
    }

    pub fn is_visited(&self, url: &CanonicalUrl) -> bool {
        self.visited.contains(url)
    }

    pub fn visited(&self) -> &HashSet<CanonicalUrl> {
        &self.visited
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
