//! Boilerplate removal and cross-page block deduplication.
//!
//! Pages are split into paragraph blocks. Blocks that look like site chrome
//! (navigation, footers, cookie banners, menu labels) are held back, and the
//! remaining blocks are fingerprinted against a registry that lives for the
//! whole crawl. Boilerplate repeats verbatim on every page of a site, so the
//! registry has to be crawl-wide: a per-page check would never see it twice.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use sha2::{Digest, Sha256};

use crate::models::DedupConfig;

/// Paragraph boundary: a line break followed by one or more blank lines.
static BLOCK_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r?\n(?:[ \t]*\r?\n)+").expect("valid block regex"));

/// Inline markdown link, `[text](target)`.
static MARKDOWN_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]]+\]\([^)]+\)").expect("valid link regex"));

/// Hash of a block's normalized text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlockFingerprint(String);

impl BlockFingerprint {
    /// Fingerprint a block, or `None` when its normalized text is shorter
    /// than `min_len` and therefore too ambiguous to deduplicate.
    pub fn of(block: &str, min_len: usize) -> Option<Self> {
        let normalized = normalize_block(block);
        if normalized.len() < min_len {
            return None;
        }
        Some(Self(hex::encode(Sha256::digest(normalized.as_bytes()))))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Collapse whitespace, lower-case, and keep only ASCII letters, digits and
/// single spaces between words.
pub fn normalize_block(block: &str) -> String {
    block
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == ' ')
        .collect()
}

/// Occurrence counts of every fingerprinted block seen in one crawl run.
///
/// Counts never decrease.
#[derive(Debug, Default)]
pub struct FingerprintRegistry {
    counts: HashMap<BlockFingerprint, usize>,
}

impl FingerprintRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, fingerprint: &BlockFingerprint) -> usize {
        self.counts.get(fingerprint).copied().unwrap_or(0)
    }

    /// Increment the count for `fingerprint`, returning the new value.
    pub fn record(&mut self, fingerprint: BlockFingerprint) -> usize {
        let count = self.counts.entry(fingerprint).or_insert(0);
        *count += 1;
        *count
    }

    /// Number of distinct fingerprints.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Which layout check matched a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutReason {
    /// Contains a boilerplate keyword
    Keyword(String),
    /// Made up mostly of links
    LinkDensity(usize),
    /// Short run of upper-case menu labels
    UppercaseRatio,
}

impl fmt::Display for LayoutReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutReason::Keyword(keyword) => write!(f, "keyword '{keyword}'"),
            LayoutReason::LinkDensity(links) => write!(f, "{links} links"),
            LayoutReason::UppercaseRatio => f.write_str("upper-case labels"),
        }
    }
}

type LayoutPredicate = fn(&str, &DedupConfig) -> Option<LayoutReason>;

/// Evaluated in order; the first match classifies the block.
const LAYOUT_PREDICATES: [LayoutPredicate; 3] = [keyword_match, link_density, uppercase_labels];

fn keyword_match(block: &str, config: &DedupConfig) -> Option<LayoutReason> {
    let surface = block.to_lowercase();
    config
        .layout_keywords
        .iter()
        .find(|keyword| surface.contains(keyword.as_str()))
        .map(|keyword| LayoutReason::Keyword(keyword.clone()))
}

fn link_density(block: &str, config: &DedupConfig) -> Option<LayoutReason> {
    let links = MARKDOWN_LINK.find_iter(block).count();
    (links > 0 && links >= config.min_link_constructs).then_some(LayoutReason::LinkDensity(links))
}

fn uppercase_labels(block: &str, config: &DedupConfig) -> Option<LayoutReason> {
    let tokens: Vec<&str> = block.split_whitespace().collect();
    if tokens.is_empty() || tokens.len() > config.uppercase_max_tokens {
        return None;
    }
    let hits = tokens.iter().filter(|token| is_upper_token(token)).count();
    let ratio = hits as f64 / tokens.len() as f64;
    (ratio >= config.uppercase_ratio).then_some(LayoutReason::UppercaseRatio)
}

/// At least one cased character and none of them lower-case.
fn is_upper_token(token: &str) -> bool {
    token.chars().any(char::is_uppercase) && !token.chars().any(char::is_lowercase)
}

/// Split raw page text into trimmed, non-empty blocks.
pub fn split_blocks(raw: &str) -> Vec<&str> {
    BLOCK_BREAK
        .split(raw)
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .collect()
}

/// Pick the most substantive block: longest first, then the one with the
/// most sentence terminators. Ties go to the earliest block.
pub fn select_fallback<'a>(blocks: &[&'a str]) -> Option<&'a str> {
    let score = |block: &str| {
        let terminators = block.chars().filter(|c| matches!(c, '.' | '!' | '?')).count();
        (block.chars().count(), terminators)
    };

    let mut best: Option<(&'a str, (usize, usize))> = None;
    for &block in blocks {
        let candidate = score(block);
        if best.is_none_or(|(_, top)| candidate > top) {
            best = Some((block, candidate));
        }
    }
    best.map(|(block, _)| block)
}

/// Result of cleaning one page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanOutcome {
    /// Surviving blocks joined by blank lines
    pub content: String,
    /// Blocks emitted through the normal path
    pub kept: usize,
    /// Blocks dropped because their fingerprint hit the repeat threshold
    pub duplicates: usize,
    /// Blocks held back as layout
    pub layout: usize,
    /// Whether the output is a fallback block
    pub used_fallback: bool,
}

/// Strips layout blocks and blocks already seen elsewhere in the crawl.
#[derive(Debug, Clone)]
pub struct ContentDeduplicator {
    config: DedupConfig,
}

impl ContentDeduplicator {
    pub fn new(mut config: DedupConfig) -> Self {
        config.layout_keywords = config
            .layout_keywords
            .iter()
            .map(|keyword| keyword.to_lowercase())
            .filter(|keyword| !keyword.is_empty())
            .collect();
        Self { config }
    }

    /// Classify a block as layout, returning the first matching reason.
    pub fn classify(&self, block: &str) -> Option<LayoutReason> {
        LAYOUT_PREDICATES
            .iter()
            .find_map(|predicate| predicate(block, &self.config))
    }

    /// Clean a page's raw text. May return an empty string only when the
    /// input has no non-blank block.
    pub fn clean(&self, raw: &str, registry: &mut FingerprintRegistry) -> String {
        self.clean_detailed(raw, registry).content
    }

    /// Like [`clean`](Self::clean), with per-page statistics.
    pub fn clean_detailed(&self, raw: &str, registry: &mut FingerprintRegistry) -> CleanOutcome {
        let blocks = split_blocks(raw);
        let mut outcome = CleanOutcome::default();
        let mut kept: Vec<&str> = Vec::new();
        let mut layout: Vec<&str> = Vec::new();

        for &block in &blocks {
            if let Some(reason) = self.classify(block) {
                log::trace!("Layout block ({reason}): {}", preview(block));
                layout.push(block);
                continue;
            }

            let Some(fingerprint) = BlockFingerprint::of(block, self.config.min_fingerprint_len)
            else {
                kept.push(block);
                continue;
            };

            if registry.count(&fingerprint) >= self.config.repeat_threshold {
                outcome.duplicates += 1;
                continue;
            }
            registry.record(fingerprint);
            kept.push(block);
        }

        outcome.kept = kept.len();
        outcome.layout = layout.len();

        if kept.is_empty() {
            let pool = if layout.is_empty() { &blocks } else { &layout };
            if let Some(fallback) = select_fallback(pool) {
                kept.push(fallback);
                outcome.used_fallback = true;
            }
        }

        outcome.content = kept.join("\n\n").trim().to_string();
        outcome
    }
}

fn preview(block: &str) -> String {
    block.chars().take(60).collect::<String>().replace('\n', " ")
}
