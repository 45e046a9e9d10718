//! Metrics pipeline
//!
//! Three independent analyzers run over a parsed page:
//! - `seo`: meta tags, heading structure, image alt text, link census, title
//! - `performance`: load-time score and page-weight estimate
//! - `content`: readability, keyword density, structure, word count
//!
//! Every analyzer is a pure function of its inputs. Thresholds are constants, so
//! running the pipeline twice on the same page yields identical metrics.

pub mod content;
pub mod performance;
pub mod seo;

pub use content::ContentMetrics;
pub use performance::PerformanceMetrics;
pub use seo::SeoMetrics;

use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use url::Url;

/// Metrics computed for one fetched page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageMetrics {
    pub seo: SeoMetrics,
    pub performance: PerformanceMetrics,
    pub content: ContentMetrics,
}

/// Runs all three analyzers over a parsed page
///
/// # Arguments
///
/// * `document` - The parsed page
/// * `url` - The page's URL, used to split internal from external links
/// * `load_time` - Seconds the fetch took
/// * `raw_body` - The HTML exactly as received, used for size estimates
pub fn run_all(document: &Html, url: &Url, load_time: f64, raw_body: &str) -> PageMetrics {
    PageMetrics {
        seo: seo::analyze(document, url),
        performance: performance::analyze(document, load_time, raw_body),
        content: content::analyze(document),
    }
}

/// Selects every element matching `css`
///
/// Selectors used here are static; an unparsable one simply matches nothing.
pub(crate) fn select_all<'a>(document: &'a Html, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => document.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

/// Rounds to two decimal places
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
