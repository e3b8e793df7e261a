//! Crawler module for page fetching and the fallback crawl
//!
//! This module contains:
//! - HTTP fetching and the [`PageFetcher`] seam
//! - Exponential backoff for robots.txt and sitemap requests
//! - Anchor extraction
//! - The shared frontier and the breadth-first worker pool

mod coordinator;
mod fetcher;
mod frontier;
mod parser;
mod retry;

pub use coordinator::{CrawlOutcome, FrontierCrawler};
pub use fetcher::{build_http_client, fetch_text, FetchedPage, HttpPageFetcher, PageFetcher};
pub use frontier::{Claim, CrawlTarget, Frontier};
pub use parser::extract_anchors;
pub use retry::{retry_with_backoff, RetryPolicy};
