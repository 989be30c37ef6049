//! Configuration module for Pulse Extractor
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key is optional; missing keys fall back to the defaults below.
//!
//! # Example
//!
//! ```no_run
//! use pulse_extractor::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("pulse.toml")).unwrap();
//! println!("Crawler will fetch at most {} pages", config.crawler.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{CacheConfig, Config, CrawlerConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::{validate, MAX_DELAY_SECONDS};
