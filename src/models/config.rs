//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP client settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Crawl target, budget and output
    #[serde(default)]
    pub crawl: CrawlConfig,

    /// Boilerplate and duplicate block filtering
    #[serde(default)]
    pub dedup: DedupConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Render the configuration as TOML.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::validation("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::validation("crawler.timeout_secs must be > 0"));
        }
        if self.crawl.max_pages == 0 {
            return Err(AppError::validation("crawl.max_pages must be > 0"));
        }
        if self.crawl.timeout_secs == Some(0) {
            return Err(AppError::validation("crawl.timeout_secs must be > 0"));
        }
        if self.crawl.output_path.trim().is_empty() {
            return Err(AppError::validation("crawl.output_path is empty"));
        }
        if self.dedup.repeat_threshold == 0 {
            return Err(AppError::validation("dedup.repeat_threshold must be > 0"));
        }
        if !(0.0..=1.0).contains(&self.dedup.uppercase_ratio) {
            return Err(AppError::validation(
                "dedup.uppercase_ratio must be between 0 and 1",
            ));
        }
        self.crawl.seed()?;
        Ok(())
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Crawl target and limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlConfig {
    /// Page the crawl starts from; its host bounds the crawl
    #[serde(default)]
    pub seed_url: String,

    /// Markdown corpus written during the crawl
    #[serde(default = "defaults::output_path")]
    pub output_path: String,

    /// Successful fetches after which the crawl stops
    #[serde(default = "defaults::max_pages")]
    pub max_pages: usize,

    /// Wall-clock limit for the whole crawl, checked between pages
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Path suffixes that are never fetched
    #[serde(default = "defaults::excluded_extensions")]
    pub excluded_extensions: Vec<String>,
}

impl CrawlConfig {
    /// Parse the seed URL and extract its host.
    pub fn seed(&self) -> Result<(Url, String)> {
        if self.seed_url.trim().is_empty() {
            return Err(AppError::config("crawl.seed_url is empty"));
        }
        let url = Url::parse(self.seed_url.trim())?;
        let host = url
            .host_str()
            .map(str::to_string)
            .ok_or_else(|| AppError::validation(format!("seed URL {url} has no host")))?;
        Ok((url, host))
    }
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            seed_url: String::new(),
            output_path: defaults::output_path(),
            max_pages: defaults::max_pages(),
            timeout_secs: None,
            excluded_extensions: defaults::excluded_extensions(),
        }
    }
}

/// Block filtering policy.
///
/// The thresholds were tuned against documentation sites and are kept
/// configurable because the right values depend on the target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DedupConfig {
    /// Occurrences of a block allowed crawl-wide before it is dropped
    #[serde(default = "defaults::repeat_threshold")]
    pub repeat_threshold: usize,

    /// Normalized length below which a block is never fingerprinted
    #[serde(default = "defaults::min_fingerprint_len")]
    pub min_fingerprint_len: usize,

    /// Lower-case substrings marking a block as site chrome
    #[serde(default = "defaults::layout_keywords")]
    pub layout_keywords: Vec<String>,

    /// Markdown link count at which a block counts as a link list
    #[serde(default = "defaults::min_link_constructs")]
    pub min_link_constructs: usize,

    /// Token count up to which the upper-case label check applies
    #[serde(default = "defaults::uppercase_max_tokens")]
    pub uppercase_max_tokens: usize,

    /// Share of upper-case tokens marking a short block as menu labels
    #[serde(default = "defaults::uppercase_ratio")]
    pub uppercase_ratio: f64,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            repeat_threshold: defaults::repeat_threshold(),
            min_fingerprint_len: defaults::min_fingerprint_len(),
            layout_keywords: defaults::layout_keywords(),
            min_link_constructs: defaults::min_link_constructs(),
            uppercase_max_tokens: defaults::uppercase_max_tokens(),
            uppercase_ratio: defaults::uppercase_ratio(),
        }
    }
}

mod defaults {
    // Crawler defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; sitecorpus/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }

    // Crawl defaults
    pub fn output_path() -> String {
        "corpus.md".into()
    }
    pub fn max_pages() -> usize {
        20
    }
    pub fn excluded_extensions() -> Vec<String> {
        [
            ".png", ".jpg", ".jpeg", ".gif", ".webp", ".bmp", ".svg", ".ico", ".css", ".js",
            ".pdf", ".zip", ".tar", ".gz",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }

    // Dedup defaults
    pub fn repeat_threshold() -> usize {
        1
    }
    pub fn min_fingerprint_len() -> usize {
        40
    }
    pub fn layout_keywords() -> Vec<String> {
        [
            "navigation",
            "footer",
            "copyright",
            "all rights reserved",
            "cookie",
            "privacy policy",
            "subscribe",
            "newsletter",
            "terms of service",
            "hero section",
            "menu",
            "contact us",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }
    pub fn min_link_constructs() -> usize {
        3
    }
    pub fn uppercase_max_tokens() -> usize {
        15
    }
    pub fn uppercase_ratio() -> f64 {
        0.6
    }
}
