//! Output module for crawl reports
//!
//! This module handles:
//! - Writing the result tree as a JSON report
//! - Summarizing crawl statistics

mod report;
pub mod stats;

pub use report::{render_report, write_report};
pub use stats::{print_statistics, CrawlStatistics};
