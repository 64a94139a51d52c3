// src/pipeline/crawl.rs

//! Breadth-first crawl loop.
//!
//! One page at a time: pop, fetch, clean, persist, enqueue. Link discovery
//! for a page finishes before the next pop, which keeps the traversal in
//! strict FIFO order and lets the fingerprint registry and visited set be
//! plain owned data.

use std::time::Duration;

use tokio::time::Instant;
use url::Url;

use crate::error::Result;
use crate::models::{
    CanonicalUrl, Config, CrawlSummary, DiscoveredLink, PageOutcome, Termination,
};
use crate::pipeline::{ContentDeduplicator, CrawlFrontier, FingerprintRegistry, LinkNormalizer};
use crate::services::{HttpPageFetcher, PageFetcher};
use crate::storage::{DocumentSink, MarkdownCorpus};
use crate::utils::resolve;

/// Drives a single crawl run over one domain.
///
/// All run state (frontier, visited set, fingerprint registry) belongs to
/// the orchestrator, so separate runs never share dedup history.
pub struct CrawlOrchestrator<F, S> {
    fetcher: F,
    sink: S,
    seed: Url,
    max_pages: usize,
    timeout: Option<Duration>,
    frontier: CrawlFrontier,
    normalizer: LinkNormalizer,
    dedup: ContentDeduplicator,
    registry: FingerprintRegistry,
}

impl<F: PageFetcher, S: DocumentSink> CrawlOrchestrator<F, S> {
    /// Prepare a crawl from the seed, budget and dedup policy in `config`.
    pub fn new(config: &Config, fetcher: F, sink: S) -> Result<Self> {
        let (seed, host) = config.crawl.seed()?;

        let mut frontier = CrawlFrontier::new();
        frontier.seed(seed.clone());

        Ok(Self {
            fetcher,
            sink,
            seed,
            max_pages: config.crawl.max_pages,
            timeout: config.crawl.timeout_secs.map(Duration::from_secs),
            frontier,
            normalizer: LinkNormalizer::new(host, &config.crawl.excluded_extensions),
            dedup: ContentDeduplicator::new(config.dedup.clone()),
            registry: FingerprintRegistry::new(),
        })
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    pub fn frontier(&self) -> &CrawlFrontier {
        &self.frontier
    }

    pub fn registry(&self) -> &FingerprintRegistry {
        &self.registry
    }

    /// Run until the budget is spent, the frontier drains, or the timeout
    /// elapses. Pages already started always run to completion.
    ///
    /// Only a failed corpus append aborts the run.
    pub async fn run(&mut self) -> Result<CrawlSummary> {
        let deadline = self.timeout.map(|timeout| Instant::now() + timeout);
        let mut summary = CrawlSummary::start();

        log::info!(
            "Starting crawl on {} (domain {}, max {} pages)",
            self.seed,
            self.normalizer.origin_domain(),
            self.max_pages
        );

        let termination = loop {
            if summary.pages_fetched >= self.max_pages {
                break Termination::TargetReached;
            }
            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                log::warn!("Crawl timeout reached, stopping");
                break Termination::TimedOut;
            }
            let Some(url) = self.frontier.next() else {
                break Termination::FrontierExhausted;
            };

            let outcome = self.process(&url, summary.pages_fetched).await?;
            summary.record(url.as_str(), outcome);
        };

        summary.finish(termination);
        log::info!(
            "Crawl complete ({}): {} pages fetched, {} persisted, {} empty, {} failed",
            summary.termination,
            summary.pages_fetched,
            summary.pages_persisted,
            summary.pages_skipped_empty,
            summary.fetch_failures
        );
        Ok(summary)
    }

    /// Take one frontier entry through fetch, clean, persist and enqueue.
    async fn process(&mut self, url: &Url, fetched: usize) -> Result<PageOutcome> {
        let canonical = CanonicalUrl::from_url(url);
        if self.frontier.is_visited(&canonical) {
            log::debug!("Already visited {}, skipping", canonical);
            return Ok(PageOutcome::AlreadyVisited);
        }

        log::info!("Processing [{}/{}]: {}", fetched + 1, self.max_pages, url);
        let page = self.fetcher.fetch(url.as_str()).await;
        if !page.success {
            log::warn!("Failed to crawl {}", url);
            return Ok(PageOutcome::FetchFailed);
        }

        self.frontier.mark_visited(canonical.clone());

        // Links resolve against, and the corpus names, the page actually
        // served after redirects.
        let landed = Url::parse(&page.url).unwrap_or_else(|_| url.clone());
        let landed_canonical = CanonicalUrl::from_url(&landed);
        if landed_canonical != canonical {
            if landed.host_str() != Some(self.normalizer.origin_domain()) {
                log::warn!("{} redirected off-site to {}, skipping", url, landed);
                return Ok(PageOutcome::FetchFailed);
            }
            if !self.frontier.mark_visited(landed_canonical) {
                log::debug!("{} redirected to already visited {}", url, landed);
                return Ok(PageOutcome::AlreadyVisited);
            }
            log::debug!("{} redirected to {}", url, landed);
        }

        let raw = page.content.unwrap_or_default();
        let cleaned = self.dedup.clean_detailed(&raw, &mut self.registry);
        log::debug!(
            "Cleaned {}: {} kept, {} duplicate, {} layout{}",
            url,
            cleaned.kept,
            cleaned.duplicates,
            cleaned.layout,
            if cleaned.used_fallback { ", fallback used" } else { "" }
        );

        if cleaned.content.trim().is_empty() {
            log::info!("Skipping {} because no content remained after cleaning", url);
            return Ok(PageOutcome::SkippedEmpty);
        }

        self.sink.append(landed.as_str(), &cleaned.content).await?;

        let links_enqueued = self.enqueue_links(&landed, &page.links);
        Ok(PageOutcome::Persisted { links_enqueued })
    }

    /// Resolve discovered hrefs against the page and admit the valid ones.
    fn enqueue_links(&mut self, base: &Url, links: &[DiscoveredLink]) -> usize {
        let mut enqueued = 0;
        for link in links {
            let Some(target) = resolve(base, &link.href) else {
                log::debug!("Dropping malformed link {:?} on {}", link.href, base);
                continue;
            };
            match self.normalizer.check(&target, self.frontier.visited()) {
                Ok(_) => {
                    self.frontier.enqueue(target);
                    enqueued += 1;
                }
                Err(reason) => log::debug!("Rejected {}: {}", target, reason),
            }
        }
        enqueued
    }
}

/// Crawl the configured site over HTTP into the configured corpus file.
pub async fn run_crawler(config: &Config) -> Result<CrawlSummary> {
    let (seed, _) = config.crawl.seed()?;
    let fetcher = HttpPageFetcher::new(&config.crawler)?;
    let sink = MarkdownCorpus::create(&config.crawl.output_path, seed.as_str()).await?;

    let mut orchestrator = CrawlOrchestrator::new(config, fetcher, sink)?;
    let summary = orchestrator.run().await?;

    log::info!(
        "Saved {} pages to {}",
        orchestrator.sink().entries(),
        orchestrator.sink().path().display()
    );
    Ok(summary)
}
