use crate::UrlError;
use url::Url;

/// Parses and canonicalizes a URL
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed or not http(s)
/// 2. Scheme and host are lower-cased (the `url` crate does this on parse)
/// 3. Remove fragment (everything after #)
/// 4. Remove a trailing slash from a non-root path
///
/// Path case is left intact and the query string is preserved.
///
/// # Examples
///
/// ```
/// use seo_survey::url::normalize_url;
///
/// let url = normalize_url("HTTPS://Example.COM/Docs/#intro").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/Docs");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }

    url.set_fragment(None);

    let path = url.path();
    if path.len() > 1 && path.ends_with('/') {
        let trimmed = path.trim_end_matches('/').to_string();
        url.set_path(if trimmed.is_empty() { "/" } else { &trimmed });
    }

    Ok(url)
}

/// Canonical string form of a URL, used as the dedup key everywhere
///
/// Unlike [`normalize_url`] this never fails: input that cannot be parsed
/// keeps its original text minus fragment and trailing slashes, so callers
/// can still compare it consistently. The root path slash is dropped as well
/// (`https://example.com/` becomes `https://example.com`).
pub fn normalize(url_str: &str) -> String {
    match normalize_url(url_str) {
        Ok(url) => {
            let mut out = url.to_string();
            if url.path() == "/" && url.query().is_none() && out.ends_with('/') {
                out.pop();
            }
            out
        }
        Err(_) => {
            let without_fragment = url_str.trim().split('#').next().unwrap_or_default();
            without_fragment.trim_end_matches('/').to_string()
        }
    }
}

/// Normalizes a URL and drops its query string as well
///
/// Used for links harvested during the fallback crawl so that tracking and
/// session parameters do not multiply the frontier.
pub fn clean_url(url_str: &str) -> String {
    match normalize_url(url_str) {
        Ok(mut url) => {
            url.set_query(None);
            normalize(url.as_str())
        }
        Err(_) => {
            let base = url_str.trim().split(['#', '?']).next().unwrap_or_default();
            base.trim_end_matches('/').to_string()
        }
    }
}
