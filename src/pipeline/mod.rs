//! Pipeline entry points and the stages of a crawl.
//!
//! - `run_crawler`: Crawl one site into a markdown corpus
//! - `run_render`: Convert a corpus into a printable HTML document

pub mod crawl;
pub mod dedup;
pub mod frontier;
pub mod normalize;
#[cfg(feature = "render")]
pub mod render;

pub use crawl::{CrawlOrchestrator, run_crawler};
pub use dedup::{BlockFingerprint, CleanOutcome, ContentDeduplicator, FingerprintRegistry, LayoutReason};
pub use frontier::CrawlFrontier;
pub use normalize::{LinkNormalizer, LinkRejection};
#[cfg(feature = "render")]
pub use render::{render_document, run_render};
