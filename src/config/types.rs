use serde::Deserialize;
use std::time::Duration;

/// Extensions that never point at an analyzable HTML page
pub const DEFAULT_IGNORED_EXTENSIONS: &[&str] = &[
    ".jpg", ".jpeg", ".png", ".gif", ".svg", ".bmp", ".webp", ".ico", ".pdf", ".zip", ".exe",
    ".rar", ".gz", ".tgz", ".mp4", ".avi", ".mp3",
];

/// Hard ceiling on pages per run
pub const MAX_PAGES_CEILING: u32 = 999;

/// Main configuration structure for SEO Survey
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub pagespeed: PageSpeedConfig,
}

impl Config {
    /// Builds a configuration for `base_url` with every other section defaulted
    pub fn for_site(base_url: &str) -> Self {
        Self {
            site: SiteConfig {
                base_url: base_url.to_string(),
            },
            crawler: CrawlerConfig::default(),
            retry: RetryConfig::default(),
            user_agent: UserAgentConfig::default(),
            analysis: AnalysisConfig::default(),
            pagespeed: PageSpeedConfig::default(),
        }
    }
}

/// The site under survey
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Root URL of the site, e.g. `https://example.com`
    #[serde(rename = "base-url")]
    pub base_url: String,
}

/// Discovery and worker pool limits
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum number of pages discovered and analyzed
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: u32,

    /// Maximum link depth from the base URL during the fallback crawl
    #[serde(rename = "max-depth", default = "default_max_depth")]
    pub max_depth: u32,

    /// Worker count; 0 means 75% of available cores
    #[serde(default)]
    pub workers: u32,

    /// Per-request timeout in seconds
    #[serde(rename = "fetch-timeout-secs", default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,
}

impl CrawlerConfig {
    /// Resolves the effective worker count
    pub fn worker_count(&self) -> usize {
        if self.workers > 0 {
            self.workers as usize
        } else {
            default_worker_count()
        }
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: default_max_pages(),
            max_depth: default_max_depth(),
            workers: 0,
            fetch_timeout_secs: default_fetch_timeout(),
        }
    }
}

/// Retry policy for robots.txt and sitemap fetches
#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    /// Total attempts including the first one
    #[serde(default = "default_attempts")]
    pub attempts: u32,

    /// Delay before the first retry (milliseconds)
    #[serde(rename = "base-delay-ms", default = "default_base_delay")]
    pub base_delay_ms: u64,

    /// Upper bound on any single backoff delay (milliseconds)
    #[serde(rename = "max-delay-ms", default = "default_max_delay")]
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            attempts: default_attempts(),
            base_delay_ms: default_base_delay(),
            max_delay_ms: default_max_delay(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Format: CrawlerName/Version (+ContactURL; ContactEmail)
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "SeoSurvey".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://example.com/seo-survey".to_string(),
            contact_email: "seo-survey@example.com".to_string(),
        }
    }
}

/// Page analysis settings
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    /// Keywords reported per page
    #[serde(rename = "top-keywords", default = "default_top_keywords")]
    pub top_keywords: usize,

    /// Keywords reported on the SITEWIDE row
    #[serde(rename = "sitewide-top-keywords", default = "default_sitewide_top")]
    pub sitewide_top_keywords: usize,

    /// Path suffixes that are never crawled or analyzed
    #[serde(rename = "ignored-extensions", default = "default_ignored_extensions")]
    pub ignored_extensions: Vec<String>,

    /// Words added to the built-in stop-word list
    #[serde(rename = "extra-stop-words", default)]
    pub extra_stop_words: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            top_keywords: default_top_keywords(),
            sitewide_top_keywords: default_sitewide_top(),
            ignored_extensions: default_ignored_extensions(),
            extra_stop_words: Vec::new(),
        }
    }
}

/// PageSpeed Insights settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageSpeedConfig {
    #[serde(rename = "api-key")]
    pub api_key: Option<String>,
}

/// W = max(1, round(0.75 × available cores))
pub fn default_worker_count() -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    ((cores as f64 * 0.75).round() as usize).max(1)
}

fn default_max_pages() -> u32 {
    100
}

fn default_max_depth() -> u32 {
    2
}

fn default_fetch_timeout() -> u64 {
    15
}

fn default_attempts() -> u32 {
    3
}

fn default_base_delay() -> u64 {
    1000
}

fn default_max_delay() -> u64 {
    32_000
}

fn default_top_keywords() -> usize {
    5
}

fn default_sitewide_top() -> usize {
    10
}

fn default_ignored_extensions() -> Vec<String> {
    DEFAULT_IGNORED_EXTENSIONS
        .iter()
        .map(|ext| ext.to_string())
        .collect()
}
