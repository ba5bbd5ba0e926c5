//! Configuration module for Product-Trawler
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! A configuration file is optional: [`Config::default`] describes a full crawl
//! with the stock heuristics, and command-line flags are layered on top.
//!
//! # Example
//!
//! ```no_run
//! use product_trawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("trawler.toml")).unwrap();
//! println!("Crawling {} sites, {} at a time", config.seeds.len(), config.crawler.concurrency);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    ClassifierConfig, Config, CrawlerConfig, RenderConfig, UserAgentConfig, DEFAULT_USER_AGENT,
};

// Re-export parser and validation functions
pub use parser::{load_config, parse_config};
pub use validation::{validate, validate_seeds};
