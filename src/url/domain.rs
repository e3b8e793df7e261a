use url::Url;

/// Extracts the lower-cased host from a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use seo_survey::url::extract_host;
///
/// let url = Url::parse("https://WWW.Example.com/path").unwrap();
/// assert_eq!(extract_host(&url), Some("www.example.com".to_string()));
/// ```
pub fn extract_host(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Lower-cases a host and drops one leading `www.`
pub fn site_key(host: &str) -> String {
    let host = host.trim().to_lowercase();
    match host.strip_prefix("www.") {
        Some(rest) => rest.to_string(),
        None => host,
    }
}

/// Returns true if `url` belongs to the same site as `base_host`
///
/// `www.example.com` and `example.com` are treated as one site. Other
/// subdomains are distinct. Unparseable URLs are never same-site.
pub fn same_registrable_domain(url: &str, base_host: &str) -> bool {
    let Ok(parsed) = Url::parse(url.trim()) else {
        return false;
    };

    match extract_host(&parsed) {
        Some(host) if !host.is_empty() => site_key(&host) == site_key(base_host),
        _ => false,
    }
}
