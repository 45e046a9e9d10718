//! Load-time scoring and page-weight estimates
//!
//! Subresources are never fetched; their weight is a flat per-type guess.

use crate::analysis::select_all;
use scraper::Html;
use serde::Serialize;

/// Largest acceptable HTML document, in bytes
pub const HTML_SIZE_LIMIT: usize = 100 * 1024;

/// Largest acceptable estimated page weight, in bytes
pub const TOTAL_SIZE_LIMIT: usize = 3 * 1024 * 1024;

/// Load time below which a page is acceptable, in seconds
pub const ACCEPTABLE_LOAD_TIME: f64 = 3.0;

const IMAGE_ESTIMATE: usize = 100 * 1024;
const SCRIPT_ESTIMATE: usize = 50 * 1024;
const STYLESHEET_ESTIMATE: usize = 30 * 1024;

/// Upper load-time bound (inclusive) and the score awarded under it
const SCORE_LADDER: &[(f64, f64)] = &[(1.0, 1.0), (2.5, 0.8), (4.0, 0.6), (6.0, 0.4)];
const SLOWEST_SCORE: f64 = 0.2;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceMetrics {
    pub load_time: LoadTimeReport,
    pub page_size: PageSizeReport,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadTimeReport {
    pub load_time_seconds: f64,
    pub load_time_acceptable: bool,
    pub performance_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageSizeReport {
    pub html_size_bytes: usize,
    pub html_size_acceptable: bool,
    pub estimated_total_size: TotalSizeEstimate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TotalSizeEstimate {
    pub total_size_bytes: usize,
    pub resource_breakdown: ResourceBreakdown,
    pub total_size_acceptable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceBreakdown {
    pub images: ResourceEstimate,
    pub scripts: ResourceEstimate,
    pub styles: ResourceEstimate,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResourceEstimate {
    pub count: usize,
    pub estimated_bytes: usize,
}

impl ResourceEstimate {
    fn new(count: usize, bytes_each: usize) -> Self {
        Self {
            count,
            estimated_bytes: count * bytes_each,
        }
    }
}

/// Runs the load-time and page-size checks
pub fn analyze(document: &Html, load_time: f64, raw_body: &str) -> PerformanceMetrics {
    PerformanceMetrics {
        load_time: analyze_load_time(load_time),
        page_size: analyze_page_size(document, raw_body),
    }
}

/// Classifies a load time in seconds
pub fn analyze_load_time(load_time: f64) -> LoadTimeReport {
    LoadTimeReport {
        load_time_seconds: load_time,
        load_time_acceptable: load_time < ACCEPTABLE_LOAD_TIME,
        performance_score: performance_score(load_time),
    }
}

/// Score for a load time: 1.0 up to 1 s, stepping down to 0.2 beyond 6 s
pub fn performance_score(load_time: f64) -> f64 {
    SCORE_LADDER
        .iter()
        .find(|(limit, _)| load_time <= *limit)
        .map_or(SLOWEST_SCORE, |(_, score)| *score)
}

/// Measures the HTML and estimates the weight of referenced resources
pub fn analyze_page_size(document: &Html, raw_body: &str) -> PageSizeReport {
    let html_size = raw_body.len();

    let breakdown = ResourceBreakdown {
        images: ResourceEstimate::new(select_all(document, "img").len(), IMAGE_ESTIMATE),
        scripts: ResourceEstimate::new(select_all(document, "script[src]").len(), SCRIPT_ESTIMATE),
        styles: ResourceEstimate::new(
            select_all(document, r#"link[rel~="stylesheet"]"#).len(),
            STYLESHEET_ESTIMATE,
        ),
    };

    let total_size = html_size
        + breakdown.images.estimated_bytes
        + breakdown.scripts.estimated_bytes
        + breakdown.styles.estimated_bytes;

    PageSizeReport {
        html_size_bytes: html_size,
        html_size_acceptable: html_size <= HTML_SIZE_LIMIT,
        estimated_total_size: TotalSizeEstimate {
            total_size_bytes: total_size,
            resource_breakdown: breakdown,
            total_size_acceptable: total_size <= TOTAL_SIZE_LIMIT,
        },
    }
}
