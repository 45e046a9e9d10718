//! Robots.txt caching implementation
//!
//! One entry per origin, loaded at most once for the lifetime of the cache. The
//! map lock is held only to find or create an entry; concurrent first lookups for
//! the same origin wait on the entry's `OnceCell` rather than issuing a second fetch.

use crate::robots::ParsedRobots;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::OnceCell;

/// Cached robots.txt data for an origin
#[derive(Debug, Clone)]
pub struct CachedRobots {
    /// The parsed robots.txt content, or None when it could not be loaded
    pub content: Option<ParsedRobots>,
}

impl CachedRobots {
    /// Entry for a successfully loaded robots.txt
    pub fn loaded(content: ParsedRobots) -> Self {
        Self {
            content: Some(content),
        }
    }

    /// Entry for an origin whose robots.txt could not be loaded
    pub fn unavailable() -> Self {
        Self { content: None }
    }

    /// Checks if a URL is allowed; an unavailable policy allows everything
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        self.content
            .as_ref()
            .map_or(true, |robots| robots.is_allowed(url, user_agent))
    }

    /// Gets the crawl delay from the cached robots.txt
    pub fn crawl_delay(&self, user_agent: &str) -> Option<Duration> {
        self.content
            .as_ref()
            .and_then(|robots| robots.crawl_delay(user_agent))
    }
}

/// Per-origin robots.txt cache
#[derive(Debug, Default)]
pub struct RobotsCache {
    entries: Mutex<HashMap<String, Arc<OnceCell<CachedRobots>>>>,
}

impl RobotsCache {
    /// Creates an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the slot for `origin`, creating an empty one on first use
    pub fn entry(&self, origin: &str) -> Arc<OnceCell<CachedRobots>> {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        entries
            .entry(origin.to_string())
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .clone()
    }

    /// Number of origins with a slot
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    /// Returns true if no origin has been looked up yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
