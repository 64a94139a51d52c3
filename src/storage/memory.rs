//! In-memory corpus, for embedding the crawler in other programs.

use async_trait::async_trait;

use crate::error::Result;
use crate::storage::{DocumentSink, corpus_entry, corpus_header};

/// A persisted page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusEntry {
    pub source_url: String,
    pub content: String,
}

/// Corpus kept as a list of entries.
#[derive(Debug, Default)]
pub struct MemoryCorpus {
    pub entries: Vec<CorpusEntry>,
}

impl MemoryCorpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render the entries in the same layout as [`MarkdownCorpus`](super::MarkdownCorpus).
    pub fn to_markdown(&self, seed_url: &str) -> String {
        let mut out = corpus_header(seed_url);
        for entry in &self.entries {
            out.push_str(&corpus_entry(&entry.source_url, &entry.content));
        }
        out
    }
}

#[async_trait]
impl DocumentSink for MemoryCorpus {
    async fn append(&mut self, source_url: &str, content: &str) -> Result<()> {
        self.entries.push(CorpusEntry {
            source_url: source_url.to_string(),
            content: content.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_to_markdown_matches_file_layout() {
        let mut corpus = MemoryCorpus::new();
        corpus.append("https://ex.com/", "Welcome.").await.unwrap();

        assert_eq!(
            corpus.to_markdown("https://ex.com/"),
            "# Documentation for https://ex.com/\n\n---\n\n## Source: https://ex.com/\n\nWelcome.\n"
        );
    }
}
