use serde::Serialize;

/// SEO signals extracted from one page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageFeatures {
    pub url: String,
    pub title: String,
    /// Length of the trimmed title in characters
    pub title_length: usize,
    pub meta_description_length: usize,
    pub h1_count: usize,
    pub h2_count: usize,
    /// Sum of the page's keyword counts after stop-word filtering
    pub word_count: u64,
    /// Top-N `(stem, count)` pairs, most frequent first
    pub keywords: Vec<(String, u64)>,
    /// First `<link rel="canonical">` href, or empty
    pub canonical_url: String,
    pub noindex: bool,
    pub image_count: usize,
    pub images_without_alt: usize,
    /// `<script type="application/ld+json">` blocks
    pub structured_data_count: usize,
    /// Elements carrying `itemtype`
    pub microdata_count: usize,
    pub performance_score_mobile: Option<u32>,
    pub performance_score_desktop: Option<u32>,
    /// Set when the page could not be fetched or analyzed
    pub error: Option<String>,
}

impl PageFeatures {
    /// A record for a page that could not be analyzed
    pub fn failed(url: &str, error: impl Into<String>) -> Self {
        Self {
            url: url.to_string(),
            error: Some(error.into()),
            ..Self::default()
        }
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }

    pub fn has_structured_data(&self) -> bool {
        self.structured_data_count > 0 || self.microdata_count > 0
    }
}
