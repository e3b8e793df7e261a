//! Output module for the survey result set
//!
//! This module handles:
//! - The per-page report rows and the synthetic site-wide row
//! - The final [`SiteReport`] handed to an external report writer
//! - A plain-text summary for the command line

mod summary;

pub use summary::{format_summary, print_summary, RunSummary};

use crate::analysis::{KeywordCounter, PageFeatures};
use crate::scoring::ScoreReport;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// URL used for the site-wide summary row
pub const SITEWIDE_URL: &str = "SITEWIDE";

/// How the surveyed URLs were discovered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscoverySource {
    Sitemap,
    Crawl,
}

impl fmt::Display for DiscoverySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sitemap => f.write_str("sitemap"),
            Self::Crawl => f.write_str("crawl"),
        }
    }
}

/// One row of the result set
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageReport {
    #[serde(flatten)]
    pub features: PageFeatures,
    #[serde(flatten)]
    pub score: ScoreReport,
}

impl PageReport {
    /// The keywords column, `stem(count), stem(count)`
    pub fn keywords_text(&self) -> String {
        format_keywords(&self.features.keywords)
    }
}

/// The complete result of a survey run
#[derive(Debug, Clone, Serialize)]
pub struct SiteReport {
    pub base_url: String,
    pub discovery: DiscoverySource,

    /// Page rows sorted by URL
    pub rows: Vec<PageReport>,

    /// Aggregate row over every successfully analyzed page
    pub sitewide: PageReport,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl SiteReport {
    /// Number of rows whose page could not be analyzed
    pub fn failed_count(&self) -> usize {
        self.rows.iter().filter(|row| row.features.is_failed()).count()
    }

    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }

    /// Mean score over successfully analyzed pages, if any
    pub fn average_score(&self) -> Option<f64> {
        let scores: Vec<u8> = self
            .rows
            .iter()
            .filter(|row| !row.features.is_failed())
            .map(|row| row.score.score)
            .collect();
        if scores.is_empty() {
            return None;
        }
        let sum: u64 = scores.iter().map(|&s| u64::from(s)).sum();
        Some(sum as f64 / scores.len() as f64)
    }
}

/// Builds the synthetic site-wide row
///
/// Only the word count and keywords are populated; every per-page field is
/// zeroed and the row carries no score.
///
/// # Arguments
///
/// * `aggregate` - The merged keyword counter of the run
/// * `top_n` - How many keywords to keep
pub fn sitewide_row(aggregate: &KeywordCounter, top_n: usize) -> PageReport {
    PageReport {
        features: PageFeatures {
            url: SITEWIDE_URL.to_string(),
            word_count: aggregate.total(),
            keywords: aggregate.most_common(top_n),
            ..PageFeatures::default()
        },
        score: ScoreReport::unscored(),
    }
}

/// Formats keyword pairs as `stem(count), stem(count)`
///
/// # Examples
///
/// ```
/// use seo_survey::output::format_keywords;
///
/// let pairs = vec![("garden".to_string(), 4), ("soil".to_string(), 2)];
/// assert_eq!(format_keywords(&pairs), "garden(4), soil(2)");
/// ```
pub fn format_keywords(keywords: &[(String, u64)]) -> String {
    keywords
        .iter()
        .map(|(word, count)| format!("{}({})", word, count))
        .collect::<Vec<_>>()
        .join(", ")
}
