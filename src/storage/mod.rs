//! Storage abstractions for the crawl corpus.
//!
//! The corpus is append-only: entries land in fetch order and are never
//! rewritten.
//!
//! ## Corpus Layout
//!
//! ```text
//! # Documentation for {seed}
//!
//! ---
//!
//! ## Source: {first page url}
//!
//! {cleaned content}
//!
//! ---
//!
//! ## Source: {second page url}
//! ...
//! ```

pub mod local;
pub mod memory;

use async_trait::async_trait;

use crate::error::Result;

// Re-export for convenience
pub use local::MarkdownCorpus;
pub use memory::{CorpusEntry, MemoryCorpus};

/// Trait for corpus backends.
#[async_trait]
pub trait DocumentSink: Send {
    /// Append one page's cleaned content under a heading naming its source.
    ///
    /// A failed append leaves the corpus in an unknown state; callers must
    /// stop the run.
    async fn append(&mut self, source_url: &str, content: &str) -> Result<()>;
}

/// Title line written once at the top of a corpus.
pub fn corpus_header(seed_url: &str) -> String {
    format!("# Documentation for {seed_url}\n")
}

/// One corpus entry: separator, source heading, content.
pub fn corpus_entry(source_url: &str, content: &str) -> String {
    format!("\n---\n\n## Source: {source_url}\n\n{}\n", content.trim_end())
}
