//! Output module for exporting results
//!
//! This module handles:
//! - Projecting inferred modules into stable [`ModuleRecord`]s
//! - Serializing records as JSON, YAML, CSV or a markdown report
//! - Recording and printing crawl statistics

mod format;
mod markdown;
mod record;
pub mod stats;

pub use format::{render, OutputFormat};
pub use markdown::format_markdown_report;
pub use record::{round_confidence, to_output_list, ModuleRecord};
pub use stats::{print_statistics, write_statistics, CrawlStats};

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while writing results
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("CSV serialization failed: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Writes records to `path`, or to stdout when no path is given
pub fn write_output(
    records: &[ModuleRecord],
    format: OutputFormat,
    path: Option<&Path>,
) -> OutputResult<()> {
    let rendered = render(records, format)?;

    match path {
        Some(path) => {
            let mut file = File::create(path)?;
            file.write_all(rendered.as_bytes())?;
            tracing::info!("Wrote {} modules to {}", records.len(), path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(rendered.as_bytes())?;
            handle.flush()?;
        }
    }

    Ok(())
}
