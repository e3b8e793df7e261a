//! URL handling module for SEO Survey
//!
//! This module provides URL normalization and same-site classification.
//! Everything here is pure: no network or disk I/O.

mod domain;
mod normalize;

pub use domain::{extract_host, same_registrable_domain, site_key};
pub use normalize::{clean_url, normalize, normalize_url};

/// Where a link points relative to the surveyed site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkScope {
    /// Same registrable domain as the base host
    Internal,
    /// Any other host, or an unparseable URL
    External,
}

impl LinkScope {
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Classifies a URL as internal or external to `base_host`
///
/// # Examples
///
/// ```
/// use seo_survey::url::{classify_link, LinkScope};
///
/// assert_eq!(classify_link("https://www.example.com/a", "example.com"), LinkScope::Internal);
/// assert_eq!(classify_link("https://other.org/", "example.com"), LinkScope::External);
/// ```
pub fn classify_link(url: &str, base_host: &str) -> LinkScope {
    if same_registrable_domain(url, base_host) {
        LinkScope::Internal
    } else {
        LinkScope::External
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_internal() {
        assert_eq!(
            classify_link("http://example.com/x", "www.example.com"),
            LinkScope::Internal
        );
        assert!(classify_link("http://example.com/x", "example.com").is_internal());
    }

    #[test]
    fn test_classify_external() {
        assert_eq!(
            classify_link("https://cdn.example.net/x", "example.com"),
            LinkScope::External
        );
    }
}
