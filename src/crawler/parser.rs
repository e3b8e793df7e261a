//! Anchor extraction for the fallback crawl
//!
//! Only `<a href>` elements are followed. Canonical links, scripts,
//! stylesheets and images never enter the frontier.

use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Extracts every followable anchor target from an HTML page
///
/// # Exclusion Rules
///
/// - `<a href="..." download>`
/// - `javascript:`, `mailto:`, `tel:` and `data:` links
/// - Fragment-only links (same page anchors)
/// - Anything that is not http(s) after resolution
///
/// `rel="nofollow"` links are still followed. Duplicates are dropped,
/// keeping document order.
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `base_url` - The base URL for resolving relative links
///
/// # Returns
///
/// Absolute URLs in the order they appear
///
/// # Example
///
/// ```
/// use seo_survey::crawler::extract_anchors;
/// use url::Url;
///
/// let html = r#"<body><a href="/page">Link</a><a href="mailto:x@y.z">Mail</a></body>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// assert_eq!(extract_anchors(html, &base_url), vec!["https://example.com/page"]);
/// ```
pub fn extract_anchors(html: &str, base_url: &Url) -> Vec<String> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut anchors = Vec::new();

    for element in document.select(&selector) {
        if element.value().attr("download").is_some() {
            continue;
        }

        let Some(href) = element.value().attr("href") else {
            continue;
        };

        if let Some(absolute) = resolve_link(href, base_url) {
            if seen.insert(absolute.clone()) {
                anchors.push(absolute);
            }
        }
    }

    anchors
}

/// Resolves a link href to an absolute http(s) URL
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if ["javascript:", "mailto:", "tel:", "data:"]
        .iter()
        .any(|scheme| lower.starts_with(scheme))
    {
        return None;
    }

    let absolute = base_url.join(href).ok()?;
    match absolute.scheme() {
        "http" | "https" => Some(absolute.to_string()),
        _ => None,
    }
}
