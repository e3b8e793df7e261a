//! Survey orchestration
//!
//! A run has two stages:
//! 1. Discovery: robots.txt, then the sitemap walker, falling back to the
//!    frontier crawler when the site has no usable sitemap
//! 2. Analysis: every discovered URL goes through the page analysis pipeline
//!
//! The orchestrator filters the discovered list once more through the same
//! crawl policy, so whichever strategy produced it, only crawlable unique URLs
//! reach analysis.

mod events;

pub use events::{EventSink, Phase, PipelineEvent};
pub use crate::output::{DiscoverySource, PageReport, SiteReport};

use crate::analysis::{AnalysisPipeline, FeatureExtractor, StopWords, Tokenizer};
use crate::config::{validate, Config};
use crate::crawler::{build_http_client, FrontierCrawler, HttpPageFetcher, PageFetcher, RetryPolicy};
use crate::output::sitewide_row;
use crate::performance::{PageSpeedClient, PerformanceScorer};
use crate::policy::PolicyContext;
use crate::robots::fetch_robots;
use crate::sitemap::SitemapWalker;
use crate::SurveyError;
use chrono::Utc;
use reqwest::Client;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use url::Url;

/// The URLs a run will analyze and where they came from
#[derive(Debug, Clone)]
pub struct Discovery {
    pub source: DiscoverySource,
    pub urls: Vec<String>,
}

/// Runs a complete site survey
pub struct Pipeline {
    config: Config,
    client: Client,
    retry: RetryPolicy,
    fetcher: Arc<dyn PageFetcher>,
    performance: Arc<dyn PerformanceScorer>,
    stop: Arc<AtomicBool>,
    events: EventSink,
}

impl Pipeline {
    /// Creates a pipeline with the default HTTP page fetcher and PageSpeed client
    ///
    /// # Arguments
    ///
    /// * `config` - The run configuration (validated here)
    ///
    /// # Returns
    ///
    /// * `Ok(Pipeline)` - Ready to run
    /// * `Err(SurveyError)` - Invalid configuration or HTTP client setup failure
    pub fn new(config: Config) -> Result<Self, SurveyError> {
        validate(&config)?;

        let client = build_http_client(&config.user_agent, config.crawler.fetch_timeout())?;
        let fetcher: Arc<dyn PageFetcher> = Arc::new(HttpPageFetcher::new(client.clone()));
        let performance: Arc<dyn PerformanceScorer> = Arc::new(PageSpeedClient::new(
            client.clone(),
            config.pagespeed.api_key.clone(),
        ));

        Ok(Self {
            retry: RetryPolicy::from(&config.retry),
            config,
            client,
            fetcher,
            performance,
            stop: Arc::new(AtomicBool::new(false)),
            events: EventSink::disabled(),
        })
    }

    /// Replaces the page fetcher used by the crawler and the analysis workers
    pub fn with_fetcher(mut self, fetcher: Arc<dyn PageFetcher>) -> Self {
        self.fetcher = fetcher;
        self
    }

    pub fn with_performance_scorer(mut self, performance: Arc<dyn PerformanceScorer>) -> Self {
        self.performance = performance;
        self
    }

    pub fn with_events(mut self, events: EventSink) -> Self {
        self.events = events;
        self
    }

    /// Overrides the retry policy for robots.txt and sitemap fetches
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Flag that stops the run when set
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Discovers the URLs to analyze
    ///
    /// # Returns
    ///
    /// * `Ok(Discovery)` - At least one crawlable URL
    /// * `Err(SurveyError::NoUrlsDiscovered)` - Neither the sitemap nor the
    ///   crawl produced anything
    /// * `Err(SurveyError::Cancelled)` - The stop flag was raised
    pub async fn discover(&self) -> Result<Discovery, SurveyError> {
        let base_url = Url::parse(&self.config.site.base_url)?;

        self.events.status("Reading robots.txt");
        let robots = fetch_robots(&self.client, &base_url, &self.retry).await;
        let policy = Arc::new(PolicyContext::from_config(&self.config, robots)?);

        self.events.status("Looking for a sitemap");
        let walker = SitemapWalker::new(self.client.clone(), self.retry, Arc::clone(&policy))
            .with_stop_flag(Arc::clone(&self.stop))
            .with_events(self.events.clone());

        let (source, urls) = match walker.walk(&base_url).await {
            Ok(urls) => {
                tracing::info!("Sitemap yielded {} URL(s)", urls.len());
                (DiscoverySource::Sitemap, urls)
            }
            Err(SurveyError::NoSitemap) => {
                tracing::info!("No usable sitemap; falling back to crawling {}", base_url);
                self.events.status("No sitemap found, crawling instead");

                let crawler = FrontierCrawler::new(
                    Arc::clone(&self.fetcher),
                    Arc::clone(&policy),
                    self.config.crawler.worker_count(),
                )
                .with_stop_flag(Arc::clone(&self.stop))
                .with_events(self.events.clone());

                let outcome = crawler.crawl(base_url.as_str()).await?;
                if outcome.cancelled {
                    return Err(SurveyError::Cancelled);
                }
                tracing::info!(
                    "Crawl visited {} URL(s), {} failed",
                    outcome.visited.len(),
                    outcome.failures
                );
                (DiscoverySource::Crawl, outcome.visited)
            }
            Err(e) => return Err(e),
        };

        let urls = filter_discovered(urls, &policy);
        if urls.is_empty() {
            tracing::error!("No crawlable URLs discovered for {}", base_url);
            return Err(SurveyError::NoUrlsDiscovered {
                base_url: base_url.to_string(),
            });
        }

        Ok(Discovery { source, urls })
    }

    /// Runs discovery and analysis and assembles the final report
    ///
    /// Pages that fail to fetch stay in the report with their error set. A
    /// stop request during analysis yields a report over the pages finished
    /// so far.
    pub async fn run(&self) -> Result<SiteReport, SurveyError> {
        let started_at = Utc::now();
        tracing::info!("Surveying {}", self.config.site.base_url);

        let discovery = self.discover().await?;
        tracing::info!(
            "Discovered {} URL(s) via {}",
            discovery.urls.len(),
            discovery.source
        );

        let stop_words = Arc::new(StopWords::english_with(
            &self.config.analysis.extra_stop_words,
        ));
        let extractor = FeatureExtractor::new(
            Tokenizer::new(stop_words),
            self.config.analysis.top_keywords,
        );

        let analysis = AnalysisPipeline::new(
            Arc::clone(&self.fetcher),
            Arc::clone(&self.performance),
            Arc::new(extractor),
            self.config.crawler.worker_count(),
        )
        .with_stop_flag(Arc::clone(&self.stop))
        .with_events(self.events.clone());

        let outcome = analysis.run(discovery.urls).await?;
        if self.stop.load(Ordering::SeqCst) {
            tracing::warn!(
                "Run stopped early; reporting {} analyzed page(s)",
                outcome.reports.len()
            );
        }

        let sitewide = sitewide_row(
            &outcome.keywords,
            self.config.analysis.sitewide_top_keywords,
        );
        let finished_at = Utc::now();
        self.events.status("Survey complete");

        Ok(SiteReport {
            base_url: self.config.site.base_url.clone(),
            discovery: discovery.source,
            rows: outcome.reports,
            sitewide,
            started_at,
            finished_at,
        })
    }
}

/// Keeps the first occurrence of every crawlable URL, in order
fn filter_discovered(urls: Vec<String>, policy: &PolicyContext) -> Vec<String> {
    let before = urls.len();
    let mut seen = HashSet::with_capacity(before);
    let kept: Vec<String> = urls
        .into_iter()
        .filter(|url| policy.is_crawlable(url) && seen.insert(url.clone()))
        .collect();

    let removed = before - kept.len();
    if removed > 0 {
        tracing::info!("Policy filter removed {} discovered URL(s)", removed);
    }
    kept
}
