//! Configuration module for the crawler
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every setting has a default, so a config file is optional; command-line flags
//! override whatever the file provides.
//!
//! # Example
//!
//! ```no_run
//! use seo_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawler.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig, DEFAULT_REPORT_PATH};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
