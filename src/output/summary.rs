//! Plain-text run summary
//!
//! Condenses a [`SiteReport`] into headline numbers and renders them for the
//! terminal. Full CSV/HTML reports are produced elsewhere.

use crate::output::{format_keywords, SiteReport};

/// Headline numbers of a survey run
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub base_url: String,
    pub discovery: String,
    pub started_at: String,
    pub finished_at: String,
    pub duration_seconds: i64,

    pub total_pages: usize,
    pub pages_failed: usize,
    pub fully_optimized: usize,
    pub average_score: Option<f64>,

    /// Site-wide word count after stop-word filtering
    pub sitewide_words: u64,
    pub sitewide_keywords: String,

    /// `(url, score)` of the lowest scoring analyzed pages, worst first
    pub lowest_scoring: Vec<(String, u8)>,
}

impl RunSummary {
    /// Summarizes a report, keeping the `worst` lowest scoring pages
    pub fn from_report(report: &SiteReport, worst: usize) -> Self {
        let mut analyzed: Vec<(String, u8)> = report
            .rows
            .iter()
            .filter(|row| !row.features.is_failed())
            .map(|row| (row.features.url.clone(), row.score.score))
            .collect();
        // Stable: equal scores stay in URL order
        analyzed.sort_by_key(|(_, score)| *score);
        analyzed.truncate(worst);

        Self {
            base_url: report.base_url.clone(),
            discovery: report.discovery.to_string(),
            started_at: report.started_at.to_rfc3339(),
            finished_at: report.finished_at.to_rfc3339(),
            duration_seconds: report.duration_seconds(),
            total_pages: report.rows.len(),
            pages_failed: report.failed_count(),
            fully_optimized: report
                .rows
                .iter()
                .filter(|row| row.score.is_fully_optimized())
                .count(),
            average_score: report.average_score(),
            sitewide_words: report.sitewide.features.word_count,
            sitewide_keywords: format_keywords(&report.sitewide.features.keywords),
            lowest_scoring: analyzed,
        }
    }

    /// Share of pages analyzed without error, as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total_pages == 0 {
            return 0.0;
        }
        let analyzed = self.total_pages - self.pages_failed;
        (analyzed as f64 / self.total_pages as f64) * 100.0
    }
}

/// Formats a run summary for the terminal
///
/// # Arguments
///
/// * `summary` - The summary to render
///
/// # Returns
///
/// A multi-line string ending in a newline
pub fn format_summary(summary: &RunSummary) -> String {
    let mut out = String::new();

    out.push_str("=== SEO Survey ===\n\n");

    out.push_str("Run:\n");
    out.push_str(&format!("  Site: {}\n", summary.base_url));
    out.push_str(&format!("  Discovery: {}\n", summary.discovery));
    out.push_str(&format!("  Started: {}\n", summary.started_at));
    out.push_str(&format!("  Finished: {}\n", summary.finished_at));
    out.push_str(&format!("  Duration: {} seconds\n\n", summary.duration_seconds));

    out.push_str("Pages:\n");
    out.push_str(&format!("  Surveyed: {}\n", summary.total_pages));
    out.push_str(&format!("  Failed: {}\n", summary.pages_failed));
    out.push_str(&format!("  Fully optimized: {}\n", summary.fully_optimized));
    match summary.average_score {
        Some(average) => out.push_str(&format!("  Average score: {:.1}\n", average)),
        None => out.push_str("  Average score: n/a\n"),
    }
    out.push('\n');

    out.push_str("Site-wide keywords:\n");
    out.push_str(&format!("  Words: {}\n", summary.sitewide_words));
    if summary.sitewide_keywords.is_empty() {
        out.push_str("  Top: (none)\n");
    } else {
        out.push_str(&format!("  Top: {}\n", summary.sitewide_keywords));
    }
    out.push('\n');

    if !summary.lowest_scoring.is_empty() {
        out.push_str("Lowest scoring pages:\n");
        for (url, score) in &summary.lowest_scoring {
            out.push_str(&format!("  {:>3}  {}\n", score, url));
        }
        out.push('\n');
    }

    out.push_str(&format!(
        "Success Rate: {:.1}% ({} / {} pages analyzed)\n",
        summary.success_rate(),
        summary.total_pages - summary.pages_failed,
        summary.total_pages
    ));

    out
}

/// Prints a run summary to stdout
pub fn print_summary(summary: &RunSummary) {
    print!("{}", format_summary(summary));
}
