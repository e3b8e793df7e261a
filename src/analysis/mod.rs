//! Page analysis module
//!
//! This module handles:
//! - Tokenizing visible text into stemmed keyword counts
//! - Extracting SEO features from a page's HTML
//! - Merging per-page keyword counters into the site-wide aggregate
//! - Running the concurrent page analysis workers

mod counter;
mod extractor;
mod features;
mod pipeline;
mod stopwords;
mod tokenizer;

pub use counter::{KeywordAggregate, KeywordCounter};
pub use extractor::FeatureExtractor;
pub use features::PageFeatures;
pub use pipeline::{AnalysisOutcome, AnalysisPipeline};
pub use stopwords::StopWords;
pub use tokenizer::Tokenizer;
