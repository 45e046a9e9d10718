//! SEO crawler main entry point
//!
//! This is the command-line interface for the SEO crawler.

use anyhow::Context;
use clap::Parser;
use seo_crawler::config::{load_config_with_hash, Config};
use seo_crawler::crawler::crawl;
use seo_crawler::output::{print_statistics, write_report, CrawlStatistics};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// SEO crawler: a polite same-site auditor
///
/// Crawls a website from a base URL, following same-origin links up to a
/// bounded depth while respecting robots.txt, and writes SEO, performance and
/// content metrics for every page to a JSON report.
#[derive(Parser, Debug)]
#[command(name = "seo-crawler")]
#[command(version)]
#[command(about = "A polite same-site SEO auditor", long_about = None)]
struct Cli {
    /// Base URL to start crawling from
    #[arg(long)]
    url: String,

    /// Maximum link depth from the base URL [default: 3]
    #[arg(long)]
    depth: Option<u32>,

    /// Path of the JSON report [default: seo_report.json]
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Per-request timeout in seconds [default: 30]
    #[arg(long, value_name = "SECONDS")]
    timeout: Option<u64>,

    /// Crawl pages even when robots.txt disallows them
    #[arg(long)]
    ignore_robots: bool,

    /// Path to TOML configuration file
    #[arg(long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    /// Overlays command-line flags on the loaded configuration
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(depth) = self.depth {
            config.crawler.max_depth = depth;
        }
        if let Some(timeout) = self.timeout {
            config.crawler.timeout_secs = timeout;
        }
        if let Some(ref output) = self.output {
            config.output.report_path = output.display().to_string();
        }
        if self.ignore_robots {
            config.crawler.ignore_robots = true;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = match cli.config {
        Some(ref path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };
    cli.apply_overrides(&mut config);

    let report_path = PathBuf::from(&config.output.report_path);

    let result = crawl(config, &cli.url)
        .await
        .context("Crawl could not start")?;

    write_report(&result, &report_path)
        .with_context(|| format!("Failed to write report to {}", report_path.display()))?;

    let stats = CrawlStatistics::from_result(&result);
    tracing::info!(
        "Crawl completed: {} analyzed, {} failed, {} skipped by robots.txt",
        stats.pages_analyzed,
        stats.pages_failed,
        stats.robots_denied
    );
    if !cli.quiet {
        print_statistics(&stats);
        println!("\n✓ Report written to: {}", report_path.display());
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("seo_crawler=info,warn"),
            1 => EnvFilter::new("seo_crawler=debug,info"),
            2 => EnvFilter::new("seo_crawler=trace,debug"),
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
