//! Page feature extraction
//!
//! Pure and synchronous: takes an HTML string, performs no network calls.
//! Every field is extracted independently, except that the word count is the
//! total of the same keyword counter that produces the top keywords.

use crate::analysis::counter::KeywordCounter;
use crate::analysis::features::PageFeatures;
use crate::analysis::tokenizer::Tokenizer;
use scraper::{ElementRef, Html, Selector};

/// Elements whose text is never visible page content
const HIDDEN_TEXT_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Extracts [`PageFeatures`] from HTML
pub struct FeatureExtractor {
    tokenizer: Tokenizer,
    top_keywords: usize,
}

impl FeatureExtractor {
    pub fn new(tokenizer: Tokenizer, top_keywords: usize) -> Self {
        Self {
            tokenizer,
            top_keywords,
        }
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// Extracts features and the page's full keyword counter
    ///
    /// # Arguments
    ///
    /// * `url` - The page URL (copied into the record)
    /// * `html` - The page body
    ///
    /// # Returns
    ///
    /// The feature record (performance scores unset) and the counter that
    /// feeds the site-wide aggregate
    pub fn extract(&self, url: &str, html: &str) -> (PageFeatures, KeywordCounter) {
        let document = Html::parse_document(html);

        let title = first_text(&document, "title").unwrap_or_default();
        let meta_description = meta_content(&document, "description").unwrap_or_default();
        let noindex = meta_content(&document, "robots")
            .map(|content| content.to_lowercase().contains("noindex"))
            .unwrap_or(false);

        let images = select_all(&document, "img");
        let images_without_alt = images
            .iter()
            .filter(|img| img.value().attr("alt").map_or(true, |alt| alt.trim().is_empty()))
            .count();

        let structured_data_count = select_all(&document, "script[type]")
            .iter()
            .filter(|script| {
                script
                    .value()
                    .attr("type")
                    .map_or(false, |t| t.trim().eq_ignore_ascii_case("application/ld+json"))
            })
            .count();

        let counter = self.tokenizer.tokenize(&visible_text(&document));

        let features = PageFeatures {
            url: url.to_string(),
            title_length: title.chars().count(),
            title,
            meta_description_length: meta_description.chars().count(),
            h1_count: select_all(&document, "h1").len(),
            h2_count: select_all(&document, "h2").len(),
            word_count: counter.total(),
            keywords: counter.most_common(self.top_keywords),
            canonical_url: canonical_href(&document).unwrap_or_default(),
            noindex,
            image_count: images.len(),
            images_without_alt,
            structured_data_count,
            microdata_count: select_all(&document, "[itemtype]").len(),
            performance_score_mobile: None,
            performance_score_desktop: None,
            error: None,
        };

        (features, counter)
    }
}

fn select_all<'a>(document: &'a Html, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => document.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

fn first_text(document: &Html, css: &str) -> Option<String> {
    select_all(document, css)
        .first()
        .map(|element| element.text().collect::<String>().trim().to_string())
}

/// Content of the first `<meta name=...>` matching `name` case-insensitively
fn meta_content(document: &Html, name: &str) -> Option<String> {
    select_all(document, "meta[name]")
        .into_iter()
        .find(|meta| {
            meta.value()
                .attr("name")
                .map_or(false, |n| n.trim().eq_ignore_ascii_case(name))
        })
        .and_then(|meta| meta.value().attr("content"))
        .map(|content| content.trim().to_string())
}

fn canonical_href(document: &Html) -> Option<String> {
    select_all(document, "link[rel][href]")
        .into_iter()
        .find(|link| {
            link.value().attr("rel").map_or(false, |rel| {
                rel.split_whitespace()
                    .any(|r| r.eq_ignore_ascii_case("canonical"))
            })
        })
        .and_then(|link| link.value().attr("href"))
        .map(|href| href.trim().to_string())
}

/// All text nodes outside script-like elements, space-separated
fn visible_text(document: &Html) -> String {
    let mut text = String::new();

    for node in document.root_element().descendants() {
        let Some(fragment) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .map_or(false, |el| HIDDEN_TEXT_ELEMENTS.contains(&el.name()))
        });
        if hidden {
            continue;
        }

        let fragment = fragment.trim();
        if !fragment.is_empty() {
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(fragment);
        }
    }

    text
}
