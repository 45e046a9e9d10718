//! HTTP fetcher implementation
//!
//! This module handles page requests for the crawler:
//! - Building the shared HTTP client
//! - Rotating browser-like user agents per request
//! - Timing each fetch from request start to last body byte
//! - Classifying failures into [`FetchError`]

use crate::config::UserAgentConfig;
use crate::FetchError;
use rand::seq::SliceRandom;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::{redirect::Policy, Client};
use std::time::{Duration, Instant};

/// A successfully fetched page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL that was requested
    pub url: String,
    /// Final URL after redirects
    pub final_url: String,
    /// HTTP status code
    pub status_code: u16,
    /// Content-Type header value, if any
    pub content_type: Option<String>,
    /// Page body content
    pub body: String,
    /// Time from sending the request to receiving the full body
    pub elapsed: Duration,
}

impl FetchedPage {
    /// Load time in seconds
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

/// Builds the HTTP client shared by the page fetcher and the robots gate
///
/// The client's default user agent is the crawler identity; page requests
/// override it per request.
///
/// # Example
///
/// ```no_run
/// use seo_crawler::config::UserAgentConfig;
/// use seo_crawler::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.identity.clone())
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Performs page GETs with a rotating user agent
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
    user_agents: Vec<String>,
    fallback_agent: String,
}

impl PageFetcher {
    /// Creates a fetcher drawing user agents from `config.pool`
    pub fn new(client: Client, config: &UserAgentConfig) -> Self {
        Self {
            client,
            user_agents: config.pool.clone(),
            fallback_agent: config.identity.clone(),
        }
    }

    /// Picks a user agent for the next request
    ///
    /// Falls back to the crawler identity when the pool is empty.
    pub fn random_user_agent(&self) -> &str {
        self.user_agents
            .choose(&mut rand::thread_rng())
            .map(String::as_str)
            .unwrap_or(&self.fallback_agent)
    }

    /// Fetches `url`, failing on network errors, timeouts, non-success statuses
    /// and non-HTML bodies
    ///
    /// # Error Mapping
    ///
    /// | Condition | Error |
    /// |-----------|-------|
    /// | Request exceeds `timeout` | `Timeout` |
    /// | Connection refused, DNS, TLS | `Network` |
    /// | Status outside 2xx | `Status` |
    /// | Content-Type present and not HTML | `ContentMismatch` |
    /// | Body cannot be read or decoded | `Body` |
    pub async fn fetch(&self, url: &str, timeout: Duration) -> Result<FetchedPage, FetchError> {
        let user_agent = self.random_user_agent().to_string();
        let start = Instant::now();

        let response = self
            .client
            .get(url)
            .header(USER_AGENT, user_agent)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        let final_url = response.url().to_string();

        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());

        if let Some(ref content_type) = content_type {
            if !content_type.to_ascii_lowercase().contains("html") {
                return Err(FetchError::ContentMismatch {
                    url: url.to_string(),
                    content_type: content_type.clone(),
                });
            }
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                }
            } else {
                FetchError::Body {
                    url: url.to_string(),
                    source: e,
                }
            }
        })?;

        Ok(FetchedPage {
            url: url.to_string(),
            final_url,
            status_code: status.as_u16(),
            content_type,
            body,
            elapsed: start.elapsed(),
        })
    }
}

fn classify_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Network {
            url: url.to_string(),
            source: error,
        }
    }
}
