//! Robots.txt handling module
//!
//! The [`RobotsGate`] answers two questions for the crawler: may this URL be
//! fetched, and how long should requests to its origin be spaced. Each origin's
//! robots.txt is fetched once, on first use, and kept for the gate's lifetime.
//! A robots.txt that cannot be loaded never blocks the crawl: the origin is
//! treated as allowing everything.

mod cache;
mod parser;

pub use cache::{CachedRobots, RobotsCache};
pub use parser::{ParsedRobots, MAX_CRAWL_DELAY};

use crate::url::{origin_key, robots_url};
use crate::RobotsError;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;
use url::Url;

/// Fetches and parses the robots.txt governing `url`
///
/// # Returns
///
/// * `Ok(ParsedRobots)` - robots.txt answered with a success status
/// * `Err(RobotsError)` - Network failure or non-success status
pub async fn fetch_robots(
    client: &Client,
    url: &Url,
    timeout: Duration,
) -> Result<ParsedRobots, RobotsError> {
    let location = robots_url(url)?;

    let response = client
        .get(location.as_str())
        .timeout(timeout)
        .send()
        .await
        .map_err(|source| RobotsError::Request {
            url: location.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(RobotsError::Status {
            url: location.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response
        .text()
        .await
        .map_err(|source| RobotsError::Request {
            url: location.to_string(),
            source,
        })?;

    Ok(ParsedRobots::from_content(&body))
}

/// Permission and politeness oracle backed by per-origin robots.txt files
pub struct RobotsGate {
    client: Client,
    timeout: Duration,
    cache: RobotsCache,
}

impl RobotsGate {
    /// Creates a gate that fetches robots.txt files with `client`
    pub fn new(client: Client, timeout: Duration) -> Self {
        Self {
            client,
            timeout,
            cache: RobotsCache::new(),
        }
    }

    /// Returns true unless a successfully loaded robots.txt disallows `url` for `agent`
    pub async fn permits(&self, url: &Url, agent: &str) -> bool {
        let slot = self.policy_for(url).await;
        slot.get()
            .map_or(true, |cached| cached.is_allowed(url.as_str(), agent))
    }

    /// Crawl delay declared for `agent` by the robots.txt governing `url`
    pub async fn crawl_delay(&self, url: &Url, agent: &str) -> Option<Duration> {
        let slot = self.policy_for(url).await;
        slot.get().and_then(|cached| cached.crawl_delay(agent))
    }

    /// Number of origins whose robots.txt has been looked up
    pub fn cached_origins(&self) -> usize {
        self.cache.len()
    }

    async fn policy_for(&self, url: &Url) -> Arc<OnceCell<CachedRobots>> {
        let slot = self.cache.entry(&origin_key(url));
        slot.get_or_init(|| self.load(url)).await;
        slot
    }

    async fn load(&self, url: &Url) -> CachedRobots {
        match fetch_robots(&self.client, url, self.timeout).await {
            Ok(robots) => {
                tracing::debug!("Loaded robots.txt for {}", origin_key(url));
                CachedRobots::loaded(robots)
            }
            Err(RobotsError::Status { url, status }) if status == 404 || status == 410 => {
                tracing::debug!("No robots.txt at {} (HTTP {}), allowing all", url, status);
                CachedRobots::unavailable()
            }
            Err(e) => {
                tracing::warn!("Could not fetch robots.txt, allowing all: {}", e);
                CachedRobots::unavailable()
            }
        }
    }
}
