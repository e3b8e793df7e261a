//! Crawl policy: domain scoping, robots.txt exclusions and ignored extensions
//!
//! A [`PolicyContext`] is built once per run (after robots.txt has been
//! fetched) and then shared read-only by the sitemap walker, the frontier
//! crawler and the orchestrator.

use crate::config::Config;
use crate::robots::RobotsRules;
use crate::url::{extract_host, same_registrable_domain, site_key};
use crate::UrlError;
use std::collections::BTreeSet;
use url::Url;

/// Why a URL was accepted or rejected by the policy filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyVerdict {
    Allowed,
    /// Path ends with an ignored extension (images, archives, ...)
    IgnoredExtension,
    /// Blocked by the robots.txt wildcard group
    RobotsDisallowed,
    /// Host is not the surveyed site
    ExternalHost,
    /// Not an absolute http(s) URL
    Invalid,
}

impl PolicyVerdict {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }
}

/// Immutable crawl policy for one run
#[derive(Debug, Clone)]
pub struct PolicyContext {
    base_host: String,
    robots: RobotsRules,
    ignored_extensions: BTreeSet<String>,
    max_pages: usize,
    max_depth: u32,
}

impl PolicyContext {
    /// Creates a policy context
    ///
    /// Extensions are matched case-insensitively.
    pub fn new<E>(
        base_host: &str,
        robots: RobotsRules,
        ignored_extensions: E,
        max_pages: usize,
        max_depth: u32,
    ) -> Self
    where
        E: IntoIterator,
        E::Item: AsRef<str>,
    {
        let ignored_extensions = ignored_extensions
            .into_iter()
            .map(|ext| ext.as_ref().trim().to_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();

        Self {
            base_host: site_key(base_host),
            robots,
            ignored_extensions,
            max_pages,
            max_depth,
        }
    }

    /// Builds the policy for a run from the configuration and the site's robots.txt
    pub fn from_config(config: &Config, robots: RobotsRules) -> Result<Self, UrlError> {
        let base = Url::parse(&config.site.base_url).map_err(|e| UrlError::Parse(e.to_string()))?;
        let host = extract_host(&base).ok_or(UrlError::MissingDomain)?;

        Ok(Self::new(
            &host,
            robots,
            &config.analysis.ignored_extensions,
            config.crawler.max_pages as usize,
            config.crawler.max_depth,
        ))
    }

    pub fn base_host(&self) -> &str {
        &self.base_host
    }

    pub fn robots(&self) -> &RobotsRules {
        &self.robots
    }

    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Evaluates every rule and reports the first one that rejects `url`
    pub fn verdict(&self, url: &str) -> PolicyVerdict {
        let Ok(parsed) = Url::parse(url.trim()) else {
            return PolicyVerdict::Invalid;
        };
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return PolicyVerdict::Invalid;
        }

        let lower_path = parsed.path().to_lowercase();
        if self
            .ignored_extensions
            .iter()
            .any(|ext| lower_path.ends_with(ext.as_str()))
        {
            return PolicyVerdict::IgnoredExtension;
        }

        if !self.robots.is_allowed(parsed.as_str()) {
            return PolicyVerdict::RobotsDisallowed;
        }

        if !same_registrable_domain(url, &self.base_host) {
            return PolicyVerdict::ExternalHost;
        }

        PolicyVerdict::Allowed
    }

    /// The single crawlability predicate used by every discovery strategy
    pub fn is_crawlable(&self, url: &str) -> bool {
        self.verdict(url).is_allowed()
    }
}
