//! SEO crawler: a polite same-site auditor
//!
//! This crate crawls a website from a base URL, follows same-origin links up to a
//! bounded depth while respecting robots.txt, and computes SEO, performance and
//! content metrics for every page it fetches.

pub mod analysis;
pub mod config;
pub mod crawler;
pub mod output;
pub mod robots;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for crawl operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::PageState,
        to: state::PageState,
    },

    #[error("Scheduler closed: {0}")]
    Scheduler(#[from] tokio::sync::AcquireError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Report serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Failure to retrieve a single page
///
/// These never abort a crawl; the orchestrator records them on the page's node.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error for {url}: {source}")]
    Network { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Expected HTML from {url}, got {content_type}")]
    ContentMismatch { url: String, content_type: String },

    #[error("Failed to read body of {url}: {source}")]
    Body { url: String, source: reqwest::Error },
}

/// Failure to load a robots.txt file
///
/// The robots gate degrades these to an allow-everything policy.
#[derive(Debug, Error)]
pub enum RobotsError {
    #[error("robots.txt request to {url} failed: {source}")]
    Request { url: String, source: reqwest::Error },

    #[error("robots.txt at {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Invalid robots.txt location: {0}")]
    Location(#[from] UrlError),
}

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl, CrawlNode, CrawlResult, PageRecord};
pub use state::PageState;
