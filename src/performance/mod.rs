//! Optional page performance scoring via PageSpeed Insights
//!
//! Without an API key no request is ever made and every page reports
//! `"no key"`, so the analysis pipeline is never blocked by this service.

use crate::FetchError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::fmt;

pub const PAGESPEED_ENDPOINT: &str = "https://www.googleapis.com/pagespeedonline/v5/runPagespeed";

/// Device profile to score under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    Mobile,
    Desktop,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mobile => "mobile",
            Self::Desktop => "desktop",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one performance measurement
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PerformanceResult {
    /// 0..=100, absent if the service could not score the page
    pub performance_score: Option<u32>,
    pub error: Option<String>,
}

impl PerformanceResult {
    pub fn scored(score: u32) -> Self {
        Self {
            performance_score: Some(score),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            performance_score: None,
            error: Some(error.into()),
        }
    }
}

/// Scores a page's load performance
#[async_trait]
pub trait PerformanceScorer: Send + Sync {
    async fn score(&self, url: &str, strategy: Strategy) -> PerformanceResult;
}

/// PageSpeed Insights v5 client
#[derive(Debug, Clone)]
pub struct PageSpeedClient {
    client: Client,
    api_key: Option<String>,
    endpoint: String,
}

impl PageSpeedClient {
    pub fn new(client: Client, api_key: Option<String>) -> Self {
        Self {
            client,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            endpoint: PAGESPEED_ENDPOINT.to_string(),
        }
    }

    /// Points the client at another endpoint (used by tests)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    async fn request(&self, url: &str, key: &str, strategy: Strategy) -> Result<PageSpeedResponse, FetchError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("url", url), ("key", key), ("strategy", strategy.as_str())])
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

        response.json().await.map_err(|e| FetchError::Body {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl PerformanceScorer for PageSpeedClient {
    async fn score(&self, url: &str, strategy: Strategy) -> PerformanceResult {
        let Some(key) = self.api_key.as_deref() else {
            return PerformanceResult::failed("no key");
        };

        tracing::debug!("PageSpeed {} ({})", url, strategy);
        match self.request(url, key, strategy).await {
            Ok(body) => match body.performance_score() {
                Some(score) => PerformanceResult::scored(score),
                None => {
                    tracing::warn!("PageSpeed returned no performance score for {} ({})", url, strategy);
                    PerformanceResult::default()
                }
            },
            Err(e) => {
                tracing::warn!("PageSpeed failed for {} ({}): {}", url, strategy, e);
                PerformanceResult::failed(e.to_string())
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct PageSpeedResponse {
    #[serde(rename = "lighthouseResult")]
    lighthouse_result: Option<LighthouseResult>,
}

#[derive(Debug, Deserialize)]
struct LighthouseResult {
    categories: Option<Categories>,
}

#[derive(Debug, Deserialize)]
struct Categories {
    performance: Option<Category>,
}

#[derive(Debug, Deserialize)]
struct Category {
    score: Option<f64>,
}

impl PageSpeedResponse {
    /// `lighthouseResult.categories.performance.score` scaled to 0..=100
    fn performance_score(&self) -> Option<u32> {
        let raw = self
            .lighthouse_result
            .as_ref()?
            .categories
            .as_ref()?
            .performance
            .as_ref()?
            .score?;
        Some((raw * 100.0).round().clamp(0.0, 100.0) as u32)
    }
}
