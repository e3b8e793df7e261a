//! Sitemap discovery
//!
//! The primary discovery strategy. When it fails, the orchestrator falls back
//! to the frontier crawl in [`crate::crawler`].

mod parser;
mod walker;

pub use parser::{parse_sitemap, SitemapDocument};
pub use walker::{SitemapWalker, SITEMAP_CANDIDATES};
