//! Service layer for the crawler application.
//!
//! - `PageFetcher`: the seam between the crawl loop and whatever retrieves
//!   and renders pages
//! - `HttpPageFetcher`: static HTML over reqwest
//! - `extract_page`: HTML to markdown-like text and links

mod extract;
mod fetcher;
#[cfg(test)]
pub(crate) mod testing;

use async_trait::async_trait;

use crate::models::PageResult;

pub use extract::{ExtractedPage, extract_page};
pub use fetcher::HttpPageFetcher;

/// Retrieves a page and reports its text content and outbound links.
///
/// Failures are reported through [`PageResult::success`] rather than an
/// error; the crawl loop treats every failure the same way.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> PageResult;
}
