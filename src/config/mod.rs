//! Configuration module for SEO Survey
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use seo_survey::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("survey.toml")).unwrap();
//! println!("Surveying {} (max {} pages)", config.site.base_url, config.crawler.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    default_worker_count, AnalysisConfig, Config, CrawlerConfig, PageSpeedConfig, RetryConfig,
    SiteConfig, UserAgentConfig, DEFAULT_IGNORED_EXTENSIONS, MAX_PAGES_CEILING,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
