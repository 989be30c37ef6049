//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - The transport seam and its HTTP, cached and in-memory implementations
//! - Fetching with retry and Content-Type filtering
//! - Link discovery
//! - Fair-share round-robin scheduling
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod parser;
mod scheduler;
mod transport;

pub use coordinator::{CrawlReport, Crawler};
pub use fetcher::{is_accepted_content_type, FetchOutcome, FetchPolicy, Fetcher};
pub use parser::discover_links;
pub use scheduler::{Candidate, CrawlLimits, Phase, Scheduler, SkipReason};
pub use transport::{
    build_http_client, HttpResponse, HttpTransport, MemoryTransport, Transport, TransportError,
};

use serde::Serialize;

/// A successfully fetched document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    /// The URL that was requested
    pub url: String,

    /// The response body (HTML, plain text or Markdown)
    pub html: String,

    /// Content-Type header, if the server sent one
    pub content_type: Option<String>,
}
