// src/models/mod.rs

//! Domain models for the crawler application.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod canonical;
mod config;
mod page;
mod summary;

// Re-export all public types
pub use canonical::CanonicalUrl;
pub use config::{Config, CrawlConfig, CrawlerConfig, DedupConfig};
pub use page::{DiscoveredLink, PageResult};
pub use summary::{CrawlSummary, PageOutcome, PageReport, Termination};
