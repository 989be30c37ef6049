//! Pulse Extractor: documentation crawler and module inference
//!
//! This crate crawls documentation and help-center sites with per-domain
//! fair-share scheduling, segments the fetched pages into heading-anchored
//! sections, and infers a module → submodule hierarchy with confidence scores.

pub mod cache;
pub mod config;
pub mod crawler;
pub mod extract;
pub mod infer;
pub mod output;
pub mod pipeline;
pub mod robots;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Pulse Extractor operations
///
/// Nothing inside the crawl-and-structure core produces one of these; they
/// come from setting up collaborators (HTTP client, cache, config) or from
/// writing results.
#[derive(Debug, Error)]
pub enum PulseError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Cache error: {0}")]
    Cache(#[from] cache::CacheError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
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
}

/// Result type alias for Pulse Extractor operations
pub type Result<T> = std::result::Result<T, PulseError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlReport, Crawler, Page};
pub use extract::{extract_page_content, PageContent, Section};
pub use infer::{infer_structure, Module, ModuleSet};
pub use output::{to_output_list, ModuleRecord};
pub use pipeline::{run_pipeline, Pipeline};
pub use url::{normalize_url, DomainKey};
