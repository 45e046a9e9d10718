//! Crawl targets, per-page records and the result tree

use crate::analysis::{ContentMetrics, PageMetrics, PerformanceMetrics, SeoMetrics};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// A URL waiting to be analyzed at a given link distance from the base URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTarget {
    pub url: String,
    pub depth: u32,
}

impl CrawlTarget {
    /// The base URL at depth 0
    pub fn root(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            depth: 0,
        }
    }

    /// A link discovered on this target's page
    pub fn child(&self, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            depth: self.depth + 1,
        }
    }
}

/// Why a target was excluded from the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    DepthExceeded,
    AlreadyVisited,
    RobotsDisallowed,
    InvalidUrl,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DepthExceeded => "depth_exceeded",
            Self::AlreadyVisited => "already_visited",
            Self::RobotsDisallowed => "robots_disallowed",
            Self::InvalidUrl => "invalid_url",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Everything learned about a successfully fetched page
#[derive(Debug, Clone, PartialEq)]
pub struct PageReport {
    pub url: String,
    pub depth: u32,
    pub seo_metrics: SeoMetrics,
    pub performance_metrics: PerformanceMetrics,
    pub content_metrics: ContentMetrics,
    /// Every same-origin link on the page, in document order, duplicates included
    pub links: Vec<String>,
}

impl PageReport {
    pub fn new(target: &CrawlTarget, metrics: PageMetrics, links: Vec<String>) -> Self {
        Self {
            url: target.url.clone(),
            depth: target.depth,
            seo_metrics: metrics.seo,
            performance_metrics: metrics.performance,
            content_metrics: metrics.content,
            links,
        }
    }
}

/// Outcome of analyzing one target
#[derive(Debug, Clone, PartialEq)]
pub enum PageRecord {
    Success(PageReport),
    Failed {
        url: String,
        depth: u32,
        error: String,
    },
    Skipped {
        url: String,
        depth: u32,
        reason: SkipReason,
    },
}

impl PageRecord {
    pub fn url(&self) -> &str {
        match self {
            Self::Success(report) => &report.url,
            Self::Failed { url, .. } | Self::Skipped { url, .. } => url,
        }
    }

    pub fn depth(&self) -> u32 {
        match self {
            Self::Success(report) => report.depth,
            Self::Failed { depth, .. } | Self::Skipped { depth, .. } => *depth,
        }
    }

    pub fn report(&self) -> Option<&PageReport> {
        match self {
            Self::Success(report) => Some(report),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }
}

/// One page in the result tree with the children it dispatched
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlNode {
    pub record: PageRecord,
    /// Analyzed or failed children in the order their links appear on the page
    pub children: Vec<CrawlNode>,
}

impl CrawlNode {
    pub fn leaf(record: PageRecord) -> Self {
        Self {
            record,
            children: Vec::new(),
        }
    }

    /// This node and all descendants, parents before children
    pub fn pages(&self) -> Vec<&CrawlNode> {
        let mut pages = vec![self];
        for child in &self.children {
            pages.extend(child.pages());
        }
        pages
    }
}

// Keys are written in a fixed order, so this cannot be derived from an enum.
impl Serialize for CrawlNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;

        match &self.record {
            PageRecord::Success(report) => {
                map.serialize_entry("url", &report.url)?;
                map.serialize_entry("depth", &report.depth)?;
                map.serialize_entry("seo_metrics", &report.seo_metrics)?;
                map.serialize_entry("performance_metrics", &report.performance_metrics)?;
                map.serialize_entry("content_metrics", &report.content_metrics)?;
                map.serialize_entry("links", &report.links)?;
            }
            PageRecord::Failed { url, depth, error } => {
                map.serialize_entry("url", url)?;
                map.serialize_entry("depth", depth)?;
                map.serialize_entry("error", error)?;
            }
            PageRecord::Skipped { url, depth, reason } => {
                map.serialize_entry("url", url)?;
                map.serialize_entry("depth", depth)?;
                map.serialize_entry("skipped", reason)?;
            }
        }

        if !self.children.is_empty() {
            map.serialize_entry("children", &self.children)?;
        }

        map.end()
    }
}

/// Snapshot handed back when a crawl finishes
#[derive(Debug, Clone)]
pub struct CrawlResult {
    /// None when the base URL itself was excluded
    pub root: Option<CrawlNode>,
    /// Every URL claimed for fetching, sorted
    pub visited: Vec<String>,
    /// URLs robots.txt kept out of the tree, sorted
    pub robots_denied: Vec<String>,
    pub elapsed: Duration,
}

impl CrawlResult {
    /// Every node in the tree, parents before children
    pub fn pages(&self) -> Vec<&CrawlNode> {
        self.root.as_ref().map(CrawlNode::pages).unwrap_or_default()
    }
}

impl Serialize for CrawlResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.root {
            Some(root) => root.serialize(serializer),
            None => serializer.serialize_map(Some(0))?.end(),
        }
    }
}
