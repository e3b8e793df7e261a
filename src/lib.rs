//! SEO Survey: site discovery and on-page SEO scoring
//!
//! This crate discovers the pages of a web site (sitemap first, breadth-first
//! crawl as the fallback), extracts SEO signals from every page concurrently,
//! merges keyword frequencies into a site-wide aggregate and scores each page.

pub mod analysis;
pub mod config;
pub mod crawler;
pub mod output;
pub mod performance;
pub mod pipeline;
pub mod policy;
pub mod robots;
pub mod scoring;
pub mod sitemap;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for SEO Survey operations
#[derive(Debug, Error)]
pub enum SurveyError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Parse error for {url}: {message}")]
    Parse { url: String, message: String },

    #[error("URL rejected by crawl policy: {url}")]
    PolicyViolation { url: String },

    #[error("No usable sitemap found")]
    NoSitemap,

    #[error("Keyword aggregate was merged inconsistently")]
    AggregationConflict,

    #[error("No crawlable URLs discovered for {base_url} (sitemap and crawl both empty)")]
    NoUrlsDiscovered { base_url: String },

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid worker state transition from {from} to {to}")]
    InvalidTransition {
        from: state::WorkerState,
        to: state::WorkerState,
    },

    #[error("Run cancelled")]
    Cancelled,
}

/// Errors raised while fetching a single resource
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("Failed to read body of {url}: {message}")]
    Body { url: String, message: String },
}

impl FetchError {
    /// Builds a fetch error from a reqwest failure
    pub fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else if let Some(status) = err.status() {
            Self::Status {
                url: url.to_string(),
                status: status.as_u16(),
            }
        } else {
            Self::Network {
                url: url.to_string(),
                message: err.to_string(),
            }
        }
    }

    /// Returns true if another attempt could plausibly succeed
    ///
    /// Timeouts, network failures, 5xx and 429 are transient. Any other
    /// status (404, 410, 403, ...) is permanent.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Network { .. } | Self::Body { .. } => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
        }
    }

    /// The URL this error refers to
    pub fn url(&self) -> &str {
        match self {
            Self::Timeout { url }
            | Self::Status { url, .. }
            | Self::Network { url, .. }
            | Self::Body { url, .. } => url,
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for SEO Survey operations
pub type Result<T> = std::result::Result<T, SurveyError>;

/// Result type alias for fetch operations
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use analysis::{KeywordAggregate, KeywordCounter, PageFeatures};
pub use config::Config;
pub use pipeline::{Pipeline, PipelineEvent, SiteReport};
pub use policy::PolicyContext;
pub use scoring::{score, ScoreReport};
pub use url::{normalize, same_registrable_domain};
