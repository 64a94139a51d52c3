//! Utility functions and helpers.

pub mod http;

use url::Url;

/// Resolve a potentially relative href against the page it was found on.
///
/// Returns `None` for hrefs that cannot form a URL.
pub fn resolve(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    base.join(href).ok()
}
