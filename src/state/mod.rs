//! State module for tracking crawl progress
//!
//! `PageState` is the per-target lifecycle the orchestrator walks through; illegal
//! transitions surface as `CrawlError::InvalidTransition`.

mod page_state;

pub use page_state::PageState;
