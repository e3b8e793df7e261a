//! Deterministic on-page SEO scoring
//!
//! [`score`] is a pure function of a [`PageFeatures`] record and the stop-word
//! list. The rubric is additive; every unmet row appends one recommendation,
//! in rubric order.
//!
//! | Signal | Condition | Points |
//! |--------|-----------|--------|
//! | Title length | 50–60 chars | +10 |
//! | Meta description length | 120–160 chars | +10 |
//! | H1 present | count > 0 | +10 |
//! | H2 present | count ≥ 1 | +5 |
//! | Word count | ≥ 300 | +10 |
//! | Image alt coverage | ≥ 80% of images have alt text | +10 |
//! | Canonical present | non-empty (−5 if slug is > 50% stop words) | +5 |
//! | Not noindex | | +10 |
//! | Structured data or microdata | either count > 0 | +5 |
//! | Mobile performance | ≥ 90 → +5, ≥ 70 → +3 | up to +5 |
//! | Desktop performance | same thresholds | up to +5 |
//! | Synergy | title and meta description present, not noindex | +10 |
//!
//! The attainable maximum is 95 and is reported as 100. A page that triggers
//! no recommendation gets the single recommendation "Fully optimized!" but
//! keeps its summed score, so a page with mid-range performance scores 91.

use crate::analysis::{PageFeatures, StopWords};
use serde::Serialize;
use url::Url;

pub const FULLY_OPTIMIZED: &str = "Fully optimized!";

/// Sum of every rubric row at its best
const MAX_POINTS: i32 = 95;

const REC_TITLE: &str = "Adjust Title length to ~50-60 chars.";
const REC_META: &str = "Adjust Meta Description to ~120-160 chars.";
const REC_H1: &str = "Include at least 1 H1 tag.";
const REC_H2: &str = "Add H2 tags for subtopics.";
const REC_WORDS: &str = "Add more textual content (300+ words).";
const REC_ALT: &str = "Add alt text to most images.";
const REC_NO_IMAGES: &str = "Consider adding relevant images with alt text.";
const REC_CANONICAL: &str = "Include a canonical link if possible.";
const REC_CANONICAL_SLUG: &str = "Reduce meaningless/stop words in canonical slug.";
const REC_NOINDEX: &str = "Remove 'noindex' unless intentionally blocking search engines.";
const REC_STRUCTURED: &str = "Add structured data (JSON-LD or microdata).";
const REC_MOBILE_SLOW: &str = "Improve mobile performance per PageSpeed.";
const REC_MOBILE_MISSING: &str = "Consider PageSpeed analysis (mobile).";
const REC_DESKTOP_SLOW: &str = "Improve desktop performance per PageSpeed.";
const REC_DESKTOP_MISSING: &str = "Consider PageSpeed analysis (desktop).";

/// Score and recommendations for one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreReport {
    /// 0..=100
    pub score: u8,
    pub recommendations: Vec<String>,
}

impl ScoreReport {
    /// The report attached to a page that could not be analyzed
    pub fn unscored() -> Self {
        Self {
            score: 0,
            recommendations: Vec::new(),
        }
    }

    pub fn is_fully_optimized(&self) -> bool {
        self.recommendations.len() == 1 && self.recommendations[0] == FULLY_OPTIMIZED
    }

    /// Recommendations joined with `"; "`
    pub fn recommendations_text(&self) -> String {
        self.recommendations.join("; ")
    }
}

/// Scores a page
///
/// # Arguments
///
/// * `features` - The extracted page record
/// * `stop_words` - Used by the canonical-slug heuristic
///
/// # Example
///
/// ```
/// use seo_survey::analysis::{PageFeatures, StopWords};
/// use seo_survey::scoring::score;
///
/// let report = score(&PageFeatures::default(), &StopWords::english());
/// assert_eq!(report.score, 10);
/// assert_eq!(report.recommendations[0], "Adjust Title length to ~50-60 chars.");
/// ```
pub fn score(features: &PageFeatures, stop_words: &StopWords) -> ScoreReport {
    let mut tally = Tally::default();

    tally.row((50..=60).contains(&features.title_length), 10, REC_TITLE);
    tally.row(
        (120..=160).contains(&features.meta_description_length),
        10,
        REC_META,
    );
    tally.row(features.h1_count > 0, 10, REC_H1);
    tally.row(features.h2_count >= 1, 5, REC_H2);
    tally.row(features.word_count >= 300, 10, REC_WORDS);

    if features.image_count > 0 {
        let with_alt = features
            .image_count
            .saturating_sub(features.images_without_alt);
        let coverage = with_alt as f64 / features.image_count as f64;
        tally.row(coverage >= 0.8, 10, REC_ALT);
    } else {
        tally.recommend(REC_NO_IMAGES);
    }

    if features.canonical_url.is_empty() {
        tally.recommend(REC_CANONICAL);
    } else {
        tally.points += 5;
        if slug_stop_word_ratio(&features.canonical_url, stop_words) > 0.5 {
            tally.points -= 5;
            tally.recommend(REC_CANONICAL_SLUG);
        }
    }

    tally.row(!features.noindex, 10, REC_NOINDEX);
    tally.row(features.has_structured_data(), 5, REC_STRUCTURED);

    tally.performance(
        features.performance_score_mobile,
        REC_MOBILE_SLOW,
        REC_MOBILE_MISSING,
    );
    tally.performance(
        features.performance_score_desktop,
        REC_DESKTOP_SLOW,
        REC_DESKTOP_MISSING,
    );

    if features.title_length > 0 && features.meta_description_length > 0 && !features.noindex {
        tally.points += 10;
    }

    tally.finish()
}

#[derive(Default)]
struct Tally {
    points: i32,
    recs: Vec<&'static str>,
}

impl Tally {
    fn row(&mut self, ok: bool, value: i32, rec: &'static str) {
        if ok {
            self.points += value;
        } else {
            self.recommend(rec);
        }
    }

    fn recommend(&mut self, rec: &'static str) {
        self.recs.push(rec);
    }

    /// >= 90 earns 5, >= 70 earns 3, anything lower earns a recommendation
    fn performance(&mut self, score: Option<u32>, slow: &'static str, missing: &'static str) {
        match score {
            Some(s) if s >= 90 => self.points += 5,
            Some(s) if s >= 70 => self.points += 3,
            Some(_) => self.recommend(slow),
            None => self.recommend(missing),
        }
    }

    fn finish(self) -> ScoreReport {
        let score = if self.points >= MAX_POINTS {
            100
        } else {
            self.points.clamp(0, 100) as u8
        };

        let recommendations = if self.recs.is_empty() {
            vec![FULLY_OPTIMIZED.to_string()]
        } else {
            self.recs.into_iter().map(str::to_string).collect()
        };

        ScoreReport {
            score,
            recommendations,
        }
    }
}

/// Share of the canonical URL's path words that are stop words
///
/// The path is lower-cased, stripped of surrounding slashes and split into
/// `[a-z0-9]+` runs. An empty or unparseable path yields 0.
fn slug_stop_word_ratio(canonical: &str, stop_words: &StopWords) -> f64 {
    let path = match Url::parse(canonical) {
        Ok(url) => url.path().to_lowercase(),
        Err(_) => canonical
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_lowercase(),
    };

    let words: Vec<&str> = path
        .trim_matches('/')
        .split(|c: char| !(c.is_ascii_lowercase() || c.is_ascii_digit()))
        .filter(|w| !w.is_empty())
        .collect();
    if words.is_empty() {
        return 0.0;
    }

    let stop = words.iter().filter(|w| stop_words.contains(w)).count();
    stop as f64 / words.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop_words() -> StopWords {
        StopWords::english()
    }

    /// Satisfies every rubric row
    fn optimized_page() -> PageFeatures {
        PageFeatures {
            url: "https://example.com/organic-gardening".to_string(),
            title: "t".repeat(55),
            title_length: 55,
            meta_description_length: 140,
            h1_count: 1,
            h2_count: 2,
            word_count: 350,
            canonical_url: "https://example.com/organic-gardening".to_string(),
            noindex: false,
            image_count: 4,
            images_without_alt: 0,
            structured_data_count: 1,
            performance_score_mobile: Some(95),
            performance_score_desktop: Some(92),
            ..PageFeatures::default()
        }
    }

    #[test]
    fn test_fully_optimized_page() {
        let report = score(&optimized_page(), &stop_words());

        assert_eq!(report.score, 100);
        assert_eq!(report.recommendations, vec!["Fully optimized!"]);
        assert!(report.is_fully_optimized());
    }

    #[test]
    fn test_mid_range_performance_keeps_summed_score() {
        let mut features = optimized_page();
        features.performance_score_mobile = Some(70);
        features.performance_score_desktop = Some(70);

        let report = score(&features, &stop_words());

        // 95 - 2 (mobile +3) - 2 (desktop +3)
        assert_eq!(report.score, 91);
        assert_eq!(report.recommendations, vec![FULLY_OPTIMIZED]);
        assert!(report.is_fully_optimized());

        features.performance_score_mobile = Some(95);
        assert_eq!(score(&features, &stop_words()).score, 93);
    }

    #[test]
    fn test_empty_page_recommendations_in_rubric_order() {
        let report = score(&PageFeatures::default(), &stop_words());

        // Only "not noindex" is satisfied; no synergy without title/meta
        assert_eq!(report.score, 10);
        assert_eq!(
            report.recommendations,
            vec![
                REC_TITLE,
                REC_META,
                REC_H1,
                REC_H2,
                REC_WORDS,
                REC_NO_IMAGES,
                REC_CANONICAL,
                REC_STRUCTURED,
                REC_MOBILE_MISSING,
                REC_DESKTOP_MISSING,
            ]
        );
    }

    #[test]
    fn test_score_is_deterministic() {
        let features = PageFeatures {
            title_length: 20,
            h1_count: 2,
            image_count: 10,
            images_without_alt: 3,
            ..optimized_page()
        };
        let first = score(&features, &stop_words());
        let second = score(&features, &stop_words());

        assert_eq!(first, second);
        assert_eq!(first.recommendations, vec![REC_TITLE, REC_ALT]);
        // 95 - 10 (title) - 10 (alt coverage 70%)
        assert_eq!(first.score, 75);
    }

    #[test]
    fn test_alt_coverage_threshold() {
        let mut features = optimized_page();
        features.image_count = 5;
        features.images_without_alt = 1;
        assert!(score(&features, &stop_words()).is_fully_optimized());

        features.images_without_alt = 2;
        assert_eq!(
            score(&features, &stop_words()).recommendations,
            vec![REC_ALT]
        );
    }

    #[test]
    fn test_canonical_slug_penalty() {
        let mut features = optimized_page();
        features.canonical_url = "https://example.com/how-to-do-it".to_string();

        let report = score(&features, &stop_words());

        assert_eq!(report.recommendations, vec![REC_CANONICAL_SLUG]);
        assert_eq!(report.score, 90);
    }

    #[test]
    fn test_canonical_slug_at_half_is_not_penalized() {
        assert_eq!(
            slug_stop_word_ratio("https://example.com/the-garden", &stop_words()),
            0.5
        );
        assert_eq!(slug_stop_word_ratio("https://example.com/", &stop_words()), 0.0);
        assert_eq!(
            slug_stop_word_ratio("/blog/of-the/2024", &stop_words()),
            0.5
        );
    }

    #[test]
    fn test_noindex_loses_points_and_synergy() {
        let mut features = optimized_page();
        features.noindex = true;

        let report = score(&features, &stop_words());

        assert_eq!(report.recommendations, vec![REC_NOINDEX]);
        assert_eq!(report.score, 75);
    }

    #[test]
    fn test_performance_thresholds() {
        let mut features = optimized_page();
        features.performance_score_mobile = Some(75);
        features.performance_score_desktop = Some(40);

        let report = score(&features, &stop_words());

        assert_eq!(report.recommendations, vec![REC_DESKTOP_SLOW]);
        assert_eq!(report.score, 88);

        features.performance_score_mobile = None;
        features.performance_score_desktop = None;
        assert_eq!(
            score(&features, &stop_words()).recommendations,
            vec![REC_MOBILE_MISSING, REC_DESKTOP_MISSING]
        );
    }

    #[test]
    fn test_microdata_counts_as_structured_data() {
        let mut features = optimized_page();
        features.structured_data_count = 0;
        features.microdata_count = 2;

        assert!(score(&features, &stop_words()).is_fully_optimized());
    }

    #[test]
    fn test_score_bounds() {
        let pages = [
            PageFeatures::default(),
            optimized_page(),
            PageFeatures {
                noindex: true,
                canonical_url: "https://example.com/a-the-of".to_string(),
                ..PageFeatures::default()
            },
        ];
        for page in &pages {
            assert!(score(page, &stop_words()).score <= 100);
        }
    }

    #[test]
    fn test_recommendations_text() {
        let report = ScoreReport {
            score: 50,
            recommendations: vec![REC_H1.to_string(), REC_H2.to_string()],
        };
        assert_eq!(
            report.recommendations_text(),
            "Include at least 1 H1 tag.; Add H2 tags for subtopics."
        );
    }
}
