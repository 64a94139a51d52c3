//! Local filesystem corpus.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::error::Result;
use crate::storage::{DocumentSink, corpus_entry, corpus_header};

/// Markdown file written sequentially as pages are persisted.
///
/// Each append is flushed before returning, so a crash loses at most the
/// page being written.
pub struct MarkdownCorpus {
    path: PathBuf,
    file: File,
    entries: usize,
}

impl MarkdownCorpus {
    /// Create (or truncate) the corpus file and write its title line.
    pub async fn create(path: impl Into<PathBuf>, seed_url: &str) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut file = File::create(&path).await?;
        file.write_all(corpus_header(seed_url).as_bytes()).await?;
        file.flush().await?;

        log::debug!("Corpus file created at {}", path.display());
        Ok(Self {
            path,
            file,
            entries: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of pages appended so far.
    pub fn entries(&self) -> usize {
        self.entries
    }
}

#[async_trait]
impl DocumentSink for MarkdownCorpus {
    async fn append(&mut self, source_url: &str, content: &str) -> Result<()> {
        self.file
            .write_all(corpus_entry(source_url, content).as_bytes())
            .await?;
        self.file.flush().await?;
        self.entries += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_create_writes_header() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out/corpus.md");

        let corpus = MarkdownCorpus::create(&path, "https://ex.com/").await.unwrap();
        assert_eq!(corpus.entries(), 0);
        assert_eq!(corpus.path(), path.as_path());

        let text = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(text, "# Documentation for https://ex.com/\n");
    }

    #[tokio::test]
    async fn test_appends_in_order() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("corpus.md");

        let mut corpus = MarkdownCorpus::create(&path, "https://ex.com/").await.unwrap();
        corpus.append("https://ex.com/", "# Home\n\nWelcome.").await.unwrap();
        corpus.append("https://ex.com/about", "About us.\n").await.unwrap();
        assert_eq!(corpus.entries(), 2);

        let text = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(
            text,
            "# Documentation for https://ex.com/\n\
             \n---\n\n## Source: https://ex.com/\n\n# Home\n\nWelcome.\n\
             \n---\n\n## Source: https://ex.com/about\n\nAbout us.\n"
        );
    }

    #[tokio::test]
    async fn test_create_truncates_previous_run() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("corpus.md");
        tokio::fs::write(&path, "stale content").await.unwrap();

        MarkdownCorpus::create(&path, "https://ex.com/").await.unwrap();
        let text = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(!text.contains("stale"));
    }
}
