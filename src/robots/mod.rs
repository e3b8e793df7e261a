//! Robots.txt handling module
//!
//! robots.txt is fetched once per run, before discovery starts. The rules
//! feed the [`PolicyContext`](crate::policy::PolicyContext).

mod parser;

pub use parser::{RobotsRules, WILDCARD_AGENT};

use crate::crawler::{fetch_text, retry_with_backoff, RetryPolicy};
use reqwest::Client;
use url::Url;

/// Fetches robots.txt for a site
///
/// Best-effort: any failure (after retries) yields rules that allow
/// everything, so a site without robots.txt is crawled without restriction.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `base_url` - Root URL of the site
/// * `retry` - Backoff policy for transient failures
///
/// # Returns
///
/// The site's rules, or [`RobotsRules::allow_all`]
pub async fn fetch_robots(client: &Client, base_url: &Url, retry: &RetryPolicy) -> RobotsRules {
    let robots_url = match base_url.join("/robots.txt") {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!("Cannot build robots.txt URL for {}: {}", base_url, e);
            return RobotsRules::allow_all();
        }
    };

    let result = retry_with_backoff(retry, robots_url.as_str(), || {
        fetch_text(client, robots_url.as_str())
    })
    .await;

    match result {
        Ok(body) => {
            tracing::info!("Loaded robots.txt from {} ({} bytes)", robots_url, body.len());
            RobotsRules::from_content(&body)
        }
        Err(e) => {
            tracing::info!("No usable robots.txt ({}); crawling unrestricted", e);
            RobotsRules::allow_all()
        }
    }
}
