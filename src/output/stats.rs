//! Statistics derived from a finished crawl
//!
//! This module summarizes the result tree for the end-of-run report printed
//! by the CLI.

use crate::crawler::{CrawlResult, PageRecord};
use std::collections::BTreeMap;
use std::time::Duration;

/// Crawl statistics summary
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlStatistics {
    /// Pages fetched and analyzed
    pub pages_analyzed: usize,

    /// Pages whose fetch failed
    pub pages_failed: usize,

    /// URLs kept out of the tree by robots.txt
    pub robots_denied: usize,

    /// Deepest level that produced a record
    pub max_depth_reached: u32,

    /// Records per depth
    pub pages_by_depth: BTreeMap<u32, usize>,

    /// Mean load time over analyzed pages, in seconds
    pub average_load_time: f64,

    /// Mean performance score over analyzed pages
    pub average_performance_score: f64,

    /// Analyzed pages reporting at least one heading structure issue
    pub pages_with_heading_issues: usize,

    /// Analyzed pages under the minimum word count
    pub pages_with_thin_content: usize,

    /// Wall-clock duration of the crawl
    pub elapsed: Duration,
}

impl CrawlStatistics {
    /// Walks the result tree once and tallies every record
    pub fn from_result(result: &CrawlResult) -> Self {
        let mut stats = Self {
            pages_analyzed: 0,
            pages_failed: 0,
            robots_denied: result.robots_denied.len(),
            max_depth_reached: 0,
            pages_by_depth: BTreeMap::new(),
            average_load_time: 0.0,
            average_performance_score: 0.0,
            pages_with_heading_issues: 0,
            pages_with_thin_content: 0,
            elapsed: result.elapsed,
        };

        let mut total_load_time = 0.0;
        let mut total_score = 0.0;

        for node in result.pages() {
            let depth = node.record.depth();
            *stats.pages_by_depth.entry(depth).or_insert(0) += 1;
            stats.max_depth_reached = stats.max_depth_reached.max(depth);

            match &node.record {
                PageRecord::Success(report) => {
                    stats.pages_analyzed += 1;

                    let load_time = &report.performance_metrics.load_time;
                    total_load_time += load_time.load_time_seconds;
                    total_score += load_time.performance_score;

                    if !report.seo_metrics.headings.heading_structure_issues.is_empty() {
                        stats.pages_with_heading_issues += 1;
                    }
                    if !report.content_metrics.sufficient_content {
                        stats.pages_with_thin_content += 1;
                    }
                }
                PageRecord::Failed { .. } => stats.pages_failed += 1,
                PageRecord::Skipped { .. } => {}
            }
        }

        if stats.pages_analyzed > 0 {
            stats.average_load_time = total_load_time / stats.pages_analyzed as f64;
            stats.average_performance_score = total_score / stats.pages_analyzed as f64;
        }

        stats
    }

    /// Records in the tree, analyzed or failed
    pub fn total_pages(&self) -> usize {
        self.pages_analyzed + self.pages_failed
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Pages in report: {}", stats.total_pages());
    println!("  Pages analyzed: {}", stats.pages_analyzed);
    println!("  Pages failed: {}", stats.pages_failed);
    println!("  Skipped by robots.txt: {}", stats.robots_denied);
    println!("  Deepest level: {}", stats.max_depth_reached);
    println!("  Duration: {:.2}s", stats.elapsed.as_secs_f64());
    println!();

    if !stats.pages_by_depth.is_empty() {
        println!("Pages by Depth:");
        for (depth, count) in &stats.pages_by_depth {
            println!("  {}: {}", depth, count);
        }
        println!();
    }

    if stats.pages_analyzed > 0 {
        println!("Quality:");
        println!("  Average load time: {:.3}s", stats.average_load_time);
        println!(
            "  Average performance score: {:.2}",
            stats.average_performance_score
        );
        println!(
            "  Pages with heading issues: {}",
            stats.pages_with_heading_issues
        );
        println!(
            "  Pages with thin content: {}",
            stats.pages_with_thin_content
        );
        println!();
    }

    let success_rate = if stats.total_pages() > 0 {
        (stats.pages_analyzed as f64 / stats.total_pages() as f64) * 100.0
    } else {
        0.0
    };
    println!("Success Rate: {:.1}%", success_rate);
}
