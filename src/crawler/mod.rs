//! Crawler module for page fetching and traversal
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with user-agent rotation
//! - Same-origin link extraction
//! - Concurrency limiting and crawl-delay pacing
//! - Overall crawl coordination and result tree assembly

mod coordinator;
mod fetcher;
mod parser;
mod record;
mod scheduler;
mod visited;

pub use coordinator::Coordinator;
pub use fetcher::{build_http_client, FetchedPage, PageFetcher};
pub use parser::{extract_links, extract_links_simple};
pub use record::{CrawlNode, CrawlResult, CrawlTarget, PageRecord, PageReport, SkipReason};
pub use scheduler::{ScheduledFetch, Scheduler};
pub use visited::VisitedSet;

use crate::config::Config;
use crate::CrawlError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Validate the configuration and base URL
/// 2. Build the HTTP client
/// 3. Analyze the base URL and every reachable same-origin page up to
///    `config.crawler.max_depth`
/// 4. Return the assembled result tree
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `base_url` - Where the crawl starts
///
/// # Returns
///
/// * `Ok(CrawlResult)` - Crawl completed, possibly with per-page errors
/// * `Err(CrawlError)` - Startup failed before any page was fetched
pub async fn crawl(config: Config, base_url: &str) -> Result<CrawlResult, CrawlError> {
    let coordinator = Coordinator::new(config, base_url)?;
    Ok(coordinator.run().await)
}
