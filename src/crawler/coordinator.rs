//! Crawler coordinator - main crawl orchestration logic
//!
//! This module drives the traversal of a site:
//! - Gating each target on depth, the visited set and robots.txt
//! - Fetching under the global concurrency budget and crawl-delay pacing
//! - Running the metrics pipeline and link extraction on each page
//! - Recursing into discovered links and merging children into the tree

use crate::analysis::{run_all, PageMetrics};
use crate::config::{validate, Config};
use crate::crawler::fetcher::{build_http_client, FetchedPage, PageFetcher};
use crate::crawler::parser::extract_links;
use crate::crawler::record::{
    CrawlNode, CrawlResult, CrawlTarget, PageRecord, PageReport, SkipReason,
};
use crate::crawler::scheduler::Scheduler;
use crate::crawler::visited::VisitedSet;
use crate::robots::RobotsGate;
use crate::state::PageState;
use crate::url::{origin_key, parse_base_url};
use crate::{ConfigError, CrawlError};
use futures::future::{self, BoxFuture, FutureExt};
use futures::stream::{self, StreamExt};
use scraper::Html;
use std::collections::{BTreeSet, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use url::Url;

/// Pages fetched between progress log lines
const PROGRESS_INTERVAL: usize = 10;

/// Main crawler coordinator structure
///
/// Owns every piece of shared crawl state. All branches of the traversal
/// borrow the same coordinator, so the visited set and robots cache have a
/// single owner for the lifetime of the run.
pub struct Coordinator {
    config: Config,
    base_url: Url,
    fetcher: PageFetcher,
    robots: RobotsGate,
    scheduler: Scheduler,
    visited: VisitedSet,
    robots_denied: Mutex<BTreeSet<String>>,
    fetched: AtomicUsize,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `base_url` - Where the crawl starts
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(CrawlError)` - Invalid configuration or base URL, or the HTTP
    ///   client could not be built
    pub fn new(config: Config, base_url: &str) -> Result<Self, CrawlError> {
        validate(&config)?;

        let base_url = parse_base_url(base_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        let client = build_http_client(&config.user_agent)?;
        let timeout = Duration::from_secs(config.crawler.timeout_secs);

        Ok(Self {
            fetcher: PageFetcher::new(client.clone(), &config.user_agent),
            robots: RobotsGate::new(client, timeout),
            scheduler: Scheduler::new(config.crawler.max_concurrent),
            visited: VisitedSet::new(),
            robots_denied: Mutex::new(BTreeSet::new()),
            fetched: AtomicUsize::new(0),
            base_url,
            config,
        })
    }

    /// Runs the crawl to completion
    ///
    /// Every page failure is recorded in the tree; nothing here aborts the run.
    pub async fn run(self) -> CrawlResult {
        let start = Instant::now();
        tracing::info!(
            "Starting crawl of {} (max depth {}, {} concurrent)",
            self.base_url,
            self.config.crawler.max_depth,
            self.config.crawler.max_concurrent
        );
        if self.config.crawler.ignore_robots {
            tracing::info!("Ignoring robots.txt");
        }

        let root = self
            .analyze_page(CrawlTarget::root(self.base_url.as_str()))
            .await;
        let root = if root.record.is_skipped() {
            tracing::warn!("Base URL {} was not crawled", self.base_url);
            None
        } else {
            Some(root)
        };

        let elapsed = start.elapsed();
        let visited = self.visited.snapshot();
        tracing::info!(
            "Crawl finished: {} pages fetched in {:.2}s ({} robots.txt lookups)",
            visited.len(),
            elapsed.as_secs_f64(),
            self.robots.cached_origins()
        );

        let robots_denied = self
            .robots_denied
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .into_iter()
            .collect();

        CrawlResult {
            root,
            visited,
            robots_denied,
            elapsed,
        }
    }

    /// Analyzes one target and, recursively, the links it leads to
    ///
    /// Boxed so the traversal can recurse.
    pub fn analyze_page(&self, target: CrawlTarget) -> BoxFuture<'_, CrawlNode> {
        async move {
            let url = target.url.clone();
            let depth = target.depth;
            match self.process(target).await {
                Ok(node) => node,
                Err(e) => {
                    tracing::error!("Error processing {}: {}", url, e);
                    CrawlNode::leaf(PageRecord::Failed {
                        url,
                        depth,
                        error: e.to_string(),
                    })
                }
            }
        }
        .boxed()
    }

    async fn process(&self, target: CrawlTarget) -> Result<CrawlNode, CrawlError> {
        let state = advance(PageState::Pending, PageState::Gated, &target)?;

        let url = match self.gate(&target).await {
            Ok(url) => url,
            Err(reason) => {
                advance(state, PageState::Skipped, &target)?;
                tracing::debug!("Skipping {} at depth {}: {}", target.url, target.depth, reason);
                return Ok(CrawlNode::leaf(PageRecord::Skipped {
                    url: target.url,
                    depth: target.depth,
                    reason,
                }));
            }
        };

        let state = advance(state, PageState::Fetching, &target)?;
        let page = match self.fetch(&url).await {
            Ok(page) => page,
            Err(e) => {
                advance(state, PageState::Failed, &target)?;
                tracing::warn!("Failed to fetch {}: {}", target.url, e);
                return Ok(CrawlNode::leaf(PageRecord::Failed {
                    url: target.url,
                    depth: target.depth,
                    error: e.to_string(),
                }));
            }
        };

        let state = advance(state, PageState::Fetched, &target)?;
        self.record_progress();

        let (metrics, links) = self.analyze_document(&url, &page);
        let report = PageReport::new(&target, metrics, links);
        let state = advance(state, PageState::Analyzed, &target)?;

        let children = if target.depth < self.config.crawler.max_depth {
            self.dispatch_children(&target, &report.links).await
        } else {
            Vec::new()
        };
        advance(state, PageState::Dispatched, &target)?;

        Ok(CrawlNode {
            record: PageRecord::Success(report),
            children,
        })
    }

    /// Decides whether a target may be fetched and claims it if so
    async fn gate(&self, target: &CrawlTarget) -> Result<Url, SkipReason> {
        if target.depth > self.config.crawler.max_depth {
            return Err(SkipReason::DepthExceeded);
        }

        if self.visited.contains(&target.url) {
            return Err(SkipReason::AlreadyVisited);
        }

        let url = Url::parse(&target.url).map_err(|_| SkipReason::InvalidUrl)?;

        if !self.config.crawler.ignore_robots
            && !self
                .robots
                .permits(&url, &self.config.user_agent.robots_agent)
                .await
        {
            tracing::info!("URL {} disallowed by robots.txt", url);
            self.robots_denied
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .insert(target.url.clone());
            return Err(SkipReason::RobotsDisallowed);
        }

        // Another branch may have claimed the URL while robots.txt was loading.
        if !self.visited.insert(&target.url) {
            return Err(SkipReason::AlreadyVisited);
        }

        Ok(url)
    }

    async fn fetch(&self, url: &Url) -> Result<FetchedPage, CrawlError> {
        let crawler = &self.config.crawler;
        let crawl_delay = if crawler.respect_crawl_delay && !crawler.ignore_robots {
            self.robots
                .crawl_delay(url, &self.config.user_agent.robots_agent)
                .await
        } else {
            None
        };

        let slot = self.scheduler.schedule(&origin_key(url), crawl_delay).await?;
        let page = self
            .fetcher
            .fetch(url.as_str(), Duration::from_secs(crawler.timeout_secs))
            .await?;
        drop(slot);

        if page.final_url != page.url {
            tracing::debug!("{} redirected to {}", page.url, page.final_url);
        }
        tracing::debug!(
            "Fetched {} ({} bytes, {:.3}s)",
            page.url,
            page.body.len(),
            page.elapsed_seconds()
        );
        Ok(page)
    }

    /// Parses the body once and feeds it to both consumers
    ///
    /// The parsed document is not `Send`, so it must not outlive this call.
    fn analyze_document(&self, url: &Url, page: &FetchedPage) -> (PageMetrics, Vec<String>) {
        let document = Html::parse_document(&page.body);
        let metrics = run_all(&document, url, page.elapsed_seconds(), &page.body);
        let links = extract_links(&document, url, &self.base_url);
        (metrics, links)
    }

    /// Analyzes the unvisited links of a page, at most `max_concurrent` at a time
    ///
    /// Children come back in the order their links first appear on the page.
    /// Excluded targets are dropped from the tree.
    async fn dispatch_children(&self, parent: &CrawlTarget, links: &[String]) -> Vec<CrawlNode> {
        let mut seen = HashSet::new();
        let targets: Vec<CrawlTarget> = links
            .iter()
            .filter(|link| seen.insert(link.as_str()))
            .filter(|link| !self.visited.contains(link))
            .map(|link| parent.child(link.as_str()))
            .collect();

        if targets.is_empty() {
            return Vec::new();
        }

        tracing::debug!(
            "Dispatching {} children of {} at depth {}",
            targets.len(),
            parent.url,
            parent.depth + 1
        );

        stream::iter(targets)
            .map(|target| self.analyze_page(target))
            .buffered(self.config.crawler.max_concurrent)
            .filter(|node| future::ready(!node.record.is_skipped()))
            .collect()
            .await
    }

    fn record_progress(&self) {
        let fetched = self.fetched.fetch_add(1, Ordering::Relaxed) + 1;
        if fetched % PROGRESS_INTERVAL == 0 {
            tracing::info!("Progress: {} pages fetched", fetched);
        }
    }
}

fn advance(state: PageState, next: PageState, target: &CrawlTarget) -> Result<PageState, CrawlError> {
    let next = state.transition(next)?;
    tracing::trace!("{} (depth {}): {} -> {}", target.url, target.depth, state, next);
    Ok(next)
}
