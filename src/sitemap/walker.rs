//! Iterative sitemap traversal
//!
//! Starts from `/sitemap.xml` (falling back to `/sitemap_index.xml`),
//! follows index documents breadth-first, and collects crawlable page URLs
//! until the page budget is reached.

use crate::crawler::{fetch_text, retry_with_backoff, RetryPolicy};
use crate::pipeline::{EventSink, Phase};
use crate::policy::{PolicyContext, PolicyVerdict};
use crate::sitemap::parser::{parse_sitemap, SitemapDocument};
use crate::url::normalize;
use crate::SurveyError;
use reqwest::Client;
use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use url::Url;

/// Root sitemap locations, tried in order
pub const SITEMAP_CANDIDATES: &[&str] = &["/sitemap.xml", "/sitemap_index.xml"];

/// Walks a site's sitemaps
pub struct SitemapWalker {
    client: Client,
    retry: RetryPolicy,
    policy: Arc<PolicyContext>,
    stop: Arc<AtomicBool>,
    events: EventSink,
}

impl SitemapWalker {
    pub fn new(client: Client, retry: RetryPolicy, policy: Arc<PolicyContext>) -> Self {
        Self {
            client,
            retry,
            policy,
            stop: Arc::new(AtomicBool::new(false)),
            events: EventSink::disabled(),
        }
    }

    pub fn with_stop_flag(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = stop;
        self
    }

    pub fn with_events(mut self, events: EventSink) -> Self {
        self.events = events;
        self
    }

    /// Collects page URLs from the site's sitemaps
    ///
    /// # Returns
    ///
    /// * `Ok(urls)` - Normalized, crawlable, de-duplicated page URLs in
    ///   document order, at most `max_pages` of them
    /// * `Err(SurveyError::NoSitemap)` - No root sitemap could be fetched and
    ///   parsed, or it yielded no crawlable pages
    /// * `Err(SurveyError::Cancelled)` - The stop flag was raised
    pub async fn walk(&self, base_url: &Url) -> Result<Vec<String>, SurveyError> {
        let max_pages = self.policy.max_pages();
        let Some((root_url, root)) = self.fetch_root(base_url).await else {
            return Err(SurveyError::NoSitemap);
        };

        let mut collector = UrlCollector::new(max_pages);
        let mut pending: VecDeque<String> = VecDeque::new();
        let mut seen_sitemaps: HashSet<String> = HashSet::from([root_url]);

        self.absorb(root, &mut collector, &mut pending, &mut seen_sitemaps);

        while let Some(sitemap_url) = pending.pop_front() {
            if collector.is_full() {
                break;
            }
            if self.stop.load(Ordering::SeqCst) {
                return Err(SurveyError::Cancelled);
            }

            if self.policy.verdict(&sitemap_url) == PolicyVerdict::RobotsDisallowed {
                tracing::info!("Skipping sitemap {} (disallowed by robots.txt)", sitemap_url);
                continue;
            }

            match self.fetch_document(&sitemap_url).await {
                Ok(doc) => self.absorb(doc, &mut collector, &mut pending, &mut seen_sitemaps),
                Err(e) => tracing::warn!("Skipping sitemap {}: {}", sitemap_url, e),
            }
        }

        if collector.urls.is_empty() {
            tracing::info!("Sitemap yielded no crawlable pages");
            return Err(SurveyError::NoSitemap);
        }

        tracing::info!(
            "Sitemap discovery found {} page(s) ({} rejected by policy)",
            collector.urls.len(),
            collector.rejected
        );
        Ok(collector.urls)
    }

    /// Tries each root candidate until one fetches and parses
    async fn fetch_root(&self, base_url: &Url) -> Option<(String, SitemapDocument)> {
        for candidate in SITEMAP_CANDIDATES {
            let url = match base_url.join(candidate) {
                Ok(url) => url.to_string(),
                Err(e) => {
                    tracing::warn!("Cannot build sitemap URL from {}: {}", base_url, e);
                    continue;
                }
            };

            match self.fetch_document(&url).await {
                Ok(doc) => return Some((url, doc)),
                Err(e) => tracing::info!("No sitemap at {}: {}", url, e),
            }
        }
        None
    }

    async fn fetch_document(&self, url: &str) -> Result<SitemapDocument, SurveyError> {
        self.events.status(format!("Fetching sitemap {}", url));
        let body = retry_with_backoff(&self.retry, url, || fetch_text(&self.client, url)).await?;
        parse_sitemap(&body, url)
    }

    fn absorb(
        &self,
        doc: SitemapDocument,
        collector: &mut UrlCollector,
        pending: &mut VecDeque<String>,
        seen_sitemaps: &mut HashSet<String>,
    ) {
        match doc {
            SitemapDocument::Index(children) => {
                tracing::debug!("Sitemap index lists {} child sitemap(s)", children.len());
                for child in children {
                    if seen_sitemaps.insert(child.clone()) {
                        pending.push_back(child);
                    }
                }
            }
            SitemapDocument::UrlSet(pages) => {
                for page in pages {
                    if collector.is_full() {
                        break;
                    }
                    collector.offer(&page, &self.policy);
                }
                self.events
                    .progress(Phase::Discovery, collector.urls.len(), collector.max_pages);
            }
        }
    }
}

struct UrlCollector {
    urls: Vec<String>,
    seen: HashSet<String>,
    rejected: usize,
    max_pages: usize,
}

impl UrlCollector {
    fn new(max_pages: usize) -> Self {
        Self {
            urls: Vec::new(),
            seen: HashSet::new(),
            rejected: 0,
            max_pages,
        }
    }

    fn is_full(&self) -> bool {
        self.urls.len() >= self.max_pages
    }

    fn offer(&mut self, url: &str, policy: &PolicyContext) {
        let url = normalize(url);
        if !policy.is_crawlable(&url) {
            tracing::debug!("Sitemap URL {} rejected: {:?}", url, policy.verdict(&url));
            self.rejected += 1;
            return;
        }
        if self.seen.insert(url.clone()) {
            self.urls.push(url);
        }
    }
}
