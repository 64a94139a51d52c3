//! Canonical page identity.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::Result;

/// A URL with its query string and fragment removed.
///
/// Two URLs with the same canonical form are the same page for the
/// purposes of visiting and deduplication.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalUrl(String);

impl CanonicalUrl {
    /// Canonicalize an already parsed URL.
    pub fn from_url(url: &Url) -> Self {
        let mut stripped = url.clone();
        stripped.set_fragment(None);
        stripped.set_query(None);
        Self(stripped.into())
    }

    /// Parse and canonicalize a raw URL string.
    pub fn parse(raw: &str) -> Result<Self> {
        Ok(Self::from_url(&Url::parse(raw)?))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_query_and_fragment() {
        let canonical = CanonicalUrl::parse("https://ex.com/guide?page=2#install").unwrap();
        assert_eq!(canonical.as_str(), "https://ex.com/guide");
    }

    #[test]
    fn test_variants_share_identity() {
        let a = CanonicalUrl::parse("https://ex.com/a#top").unwrap();
        let b = CanonicalUrl::parse("https://ex.com/a?ref=nav").unwrap();
        let c = CanonicalUrl::parse("https://ex.com/a").unwrap();
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn test_bare_origin_gets_root_path() {
        let canonical = CanonicalUrl::parse("https://ex.com").unwrap();
        assert_eq!(canonical.to_string(), "https://ex.com/");
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(CanonicalUrl::parse("::not a url::").is_err());
    }
}
