//! Fetch results handed from a page fetcher to the crawl loop.

use serde::{Deserialize, Serialize};

/// An outbound link as reported by the fetcher, possibly relative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredLink {
    pub href: String,
}

impl DiscoveredLink {
    pub fn new(href: impl Into<String>) -> Self {
        Self { href: href.into() }
    }
}

/// Outcome of a single fetch attempt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageResult {
    /// URL the content was served from, after any redirects
    pub url: String,

    /// Whether the fetcher produced usable content
    pub success: bool,

    /// Extracted text content
    pub content: Option<String>,

    /// Outbound links found on the page
    pub links: Vec<DiscoveredLink>,
}

impl PageResult {
    /// A successful fetch.
    pub fn fetched(
        url: impl Into<String>,
        content: impl Into<String>,
        links: Vec<DiscoveredLink>,
    ) -> Self {
        Self {
            url: url.into(),
            success: true,
            content: Some(content.into()),
            links,
        }
    }

    /// A failed fetch. Carries no content and no links.
    pub fn failed(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }
}
