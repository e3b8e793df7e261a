//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests made during a survey:
//! - Building the shared HTTP client with the configured user agent
//! - Plain-text GETs for robots.txt and sitemaps
//! - The [`PageFetcher`] seam used by the crawler and the analysis pipeline
//! - Error classification into [`FetchError`]

use crate::config::UserAgentConfig;
use crate::crawler::parser::extract_anchors;
use crate::{FetchError, FetchResult};
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// A fetched HTML page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// The URL that was requested
    pub url: String,

    /// URL after redirects
    pub final_url: String,

    /// HTTP status code
    pub status_code: u16,

    /// Page body
    pub html: String,

    /// Absolute http(s) targets of every `<a href>` on the page
    pub anchors: Vec<String>,
}

/// Retrieves pages over the network
///
/// Crawl workers and analysis workers only talk to this trait, so tests can
/// substitute an in-memory site.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches one page and resolves its anchors
    async fn fetch(&self, url: &str) -> FetchResult<FetchedPage>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Per-request timeout
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use seo_survey::config::UserAgentConfig;
/// use seo_survey::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(15)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// GETs `url` and returns the body as text
///
/// Any non-2xx status is an error.
pub async fn fetch_text(client: &Client, url: &str) -> FetchResult<String> {
    let (_, _, body) = get_body(client, url).await?;
    Ok(body)
}

async fn get_body(client: &Client, url: &str) -> FetchResult<(String, u16, String)> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| FetchError::from_reqwest(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let final_url = response.url().to_string();
    let body = response.text().await.map_err(|e| FetchError::Body {
        url: url.to_string(),
        message: e.to_string(),
    })?;

    Ok((final_url, status.as_u16(), body))
}

/// [`PageFetcher`] backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpPageFetcher {
    client: Client,
}

impl HttpPageFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str) -> FetchResult<FetchedPage> {
        let (final_url, status_code, html) = get_body(&self.client, url).await?;

        // Relative links resolve against where the redirects ended up
        let anchors = match Url::parse(&final_url) {
            Ok(base) => extract_anchors(&html, &base),
            Err(_) => Vec::new(),
        };

        Ok(FetchedPage {
            url: url.to_string(),
            final_url,
            status_code,
            html,
            anchors,
        })
    }
}
