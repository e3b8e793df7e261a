//! SEO Survey main entry point
//!
//! This is the command-line interface for the SEO site survey.

use clap::Parser;
use seo_survey::config::{load_config_with_hash, validate, Config};
use seo_survey::output::{print_summary, RunSummary};
use seo_survey::pipeline::{EventSink, Phase, Pipeline, PipelineEvent};
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use tracing_subscriber::EnvFilter;

/// How many of the worst pages the summary lists
const SUMMARY_WORST_PAGES: usize = 5;

/// SEO Survey: sitemap-first site discovery and on-page SEO scoring
///
/// Reads the site's sitemap (or crawls it when there is none), analyzes every
/// page concurrently and prints a summary of the scored result set.
#[derive(Parser, Debug)]
#[command(name = "seo-survey")]
#[command(version)]
#[command(about = "Survey a site's on-page SEO", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be surveyed without fetching anything
    #[arg(long)]
    dry_run: bool,

    /// Override the site's base URL
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// Override the maximum number of pages
    #[arg(long, value_name = "N")]
    max_pages: Option<u32>,

    /// Override the maximum crawl depth
    #[arg(long, value_name = "D")]
    max_depth: Option<u32>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    apply_overrides(&mut config, &cli);
    validate(&config)?;

    if cli.dry_run {
        handle_dry_run(&config, &config_hash);
        return Ok(());
    }

    handle_survey(config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("seo_survey=info,warn"),
            1 => EnvFilter::new("seo_survey=debug,info"),
            2 => EnvFilter::new("seo_survey=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(url) = &cli.url {
        tracing::info!("Overriding base-url with {}", url);
        config.site.base_url = url.clone();
    }
    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = max_pages;
    }
    if let Some(max_depth) = cli.max_depth {
        config.crawler.max_depth = max_depth;
    }
}

/// Handles the --dry-run mode: shows the resolved configuration
fn handle_dry_run(config: &Config, config_hash: &str) {
    println!("=== SEO Survey Dry Run ===\n");

    println!("Site:");
    println!("  Base URL: {}", config.site.base_url);

    println!("\nCrawler:");
    println!("  Max pages: {}", config.crawler.max_pages);
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Workers: {}", config.crawler.worker_count());
    println!("  Fetch timeout: {}s", config.crawler.fetch_timeout_secs);

    println!("\nRetry:");
    println!("  Attempts: {}", config.retry.attempts);
    println!(
        "  Delay: {}ms doubling up to {}ms",
        config.retry.base_delay_ms, config.retry.max_delay_ms
    );

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nAnalysis:");
    println!("  Keywords per page: {}", config.analysis.top_keywords);
    println!(
        "  Site-wide keywords: {}",
        config.analysis.sitewide_top_keywords
    );
    println!(
        "  Ignored extensions ({}): {}",
        config.analysis.ignored_extensions.len(),
        config.analysis.ignored_extensions.join(" ")
    );
    if !config.analysis.extra_stop_words.is_empty() {
        println!(
            "  Extra stop words: {}",
            config.analysis.extra_stop_words.join(", ")
        );
    }

    println!("\nPageSpeed:");
    if config.pagespeed.api_key.is_some() {
        println!("  Enabled");
    } else {
        println!("  Disabled (no api-key)");
    }

    println!("\n✓ Configuration is valid (hash: {})", config_hash);
}

/// Runs the survey and prints the summary
async fn handle_survey(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let (events, mut receiver) = EventSink::channel();
    let pipeline = Pipeline::new(config)?.with_events(events);

    let stop = pipeline.stop_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping after in-flight pages");
            stop.store(true, Ordering::SeqCst);
        }
    });

    let relay = tokio::spawn(async move {
        while let Some(event) = receiver.recv().await {
            match event {
                PipelineEvent::Status(message) => tracing::info!("{}", message),
                PipelineEvent::Progress {
                    phase,
                    current,
                    total,
                } => {
                    let label = match phase {
                        Phase::Discovery => "Discovered",
                        Phase::Analysis => "Analyzed",
                    };
                    tracing::debug!("{} {}/{}", label, current, total);
                }
            }
        }
    });

    let result = pipeline.run().await;
    drop(pipeline);
    let _ = relay.await;

    match result {
        Ok(report) => {
            tracing::info!("Survey completed successfully");
            print_summary(&RunSummary::from_report(&report, SUMMARY_WORST_PAGES));
            Ok(())
        }
        Err(e) => {
            tracing::error!("Survey failed: {}", e);
            Err(e.into())
        }
    }
}
