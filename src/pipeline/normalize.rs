//! Link admission rules for the frontier.

use std::collections::HashSet;
use std::fmt;

use url::Url;

use crate::models::CanonicalUrl;

/// Why a discovered link was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkRejection {
    /// Host differs from the crawl origin, or there is no host at all
    ForeignHost(Option<String>),
    /// Path ends with an excluded static-asset extension
    StaticAsset(String),
    /// Canonical form was already fetched
    AlreadyVisited(CanonicalUrl),
}

impl fmt::Display for LinkRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkRejection::ForeignHost(Some(host)) => write!(f, "foreign host {host}"),
            LinkRejection::ForeignHost(None) => f.write_str("no host"),
            LinkRejection::StaticAsset(ext) => write!(f, "static asset ({ext})"),
            LinkRejection::AlreadyVisited(url) => write!(f, "already visited {url}"),
        }
    }
}

/// Validates candidate URLs against the origin host, the excluded
/// extensions and the visited set, in that order.
#[derive(Debug, Clone)]
pub struct LinkNormalizer {
    origin_domain: String,
    excluded_extensions: Vec<String>,
}

impl LinkNormalizer {
    pub fn new(origin_domain: impl Into<String>, excluded_extensions: &[String]) -> Self {
        Self {
            origin_domain: origin_domain.into(),
            excluded_extensions: excluded_extensions
                .iter()
                .map(|ext| ext.to_lowercase())
                .collect(),
        }
    }

    pub fn origin_domain(&self) -> &str {
        &self.origin_domain
    }

    /// Whether `candidate` may enter the frontier.
    pub fn validate(&self, candidate: &Url, visited: &HashSet<CanonicalUrl>) -> bool {
        self.check(candidate, visited).is_ok()
    }

    /// Apply the admission rules, returning the canonical form on success.
    pub fn check(
        &self,
        candidate: &Url,
        visited: &HashSet<CanonicalUrl>,
    ) -> Result<CanonicalUrl, LinkRejection> {
        match candidate.host_str() {
            Some(host) if host == self.origin_domain => {}
            other => return Err(LinkRejection::ForeignHost(other.map(str::to_string))),
        }

        let path = candidate.path().to_lowercase();
        if let Some(ext) = self
            .excluded_extensions
            .iter()
            .find(|ext| path.ends_with(ext.as_str()))
        {
            return Err(LinkRejection::StaticAsset(ext.clone()));
        }

        let canonical = CanonicalUrl::from_url(candidate);
        if visited.contains(&canonical) {
            return Err(LinkRejection::AlreadyVisited(canonical));
        }
        Ok(canonical)
    }
}
