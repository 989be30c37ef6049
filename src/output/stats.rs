//! Crawl statistics
//!
//! Counters gathered while the crawl runs, and a human-readable dump of them
//! for `--stats`.

use crate::crawler::{FetchOutcome, SkipReason};
use crate::url::DomainKey;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{self, Write};

/// Counters for one crawl
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrawlStats {
    /// Pages fetched, per domain
    pub pages_by_domain: BTreeMap<String, usize>,

    /// Popped URLs that had already been tried
    pub skipped_visited: usize,

    /// Popped URLs dropped because their domain hit the per-domain limit
    pub skipped_domain_limit: usize,

    /// URLs disallowed by robots.txt
    pub skipped_robots: usize,

    /// Responses with an unreadable Content-Type
    pub skipped_content_type: usize,

    /// URLs that failed after every retry
    pub skipped_transient: usize,

    /// Discovered links added to a queue
    pub links_enqueued: usize,

    /// Whether the crawl stopped early on cancellation or deadline
    pub interrupted: bool,
}

impl CrawlStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total pages fetched across all domains
    pub fn total_pages(&self) -> usize {
        self.pages_by_domain.values().sum()
    }

    /// Total URLs that were tried or popped without producing a page
    pub fn total_skipped(&self) -> usize {
        self.skipped_visited
            + self.skipped_domain_limit
            + self.skipped_robots
            + self.skipped_content_type
            + self.skipped_transient
    }

    pub fn record_page(&mut self, domain: &DomainKey) {
        *self
            .pages_by_domain
            .entry(domain.as_str().to_string())
            .or_insert(0) += 1;
    }

    pub fn record_skip(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::AlreadyVisited => self.skipped_visited += 1,
            SkipReason::DomainLimit => self.skipped_domain_limit += 1,
        }
    }

    /// Counts a non-page fetch outcome (pages go through [`Self::record_page`])
    pub fn record_outcome(&mut self, outcome: &FetchOutcome) {
        match outcome {
            FetchOutcome::Fetched(_) => {}
            FetchOutcome::SkippedPolicy => self.skipped_robots += 1,
            FetchOutcome::SkippedTransient => self.skipped_transient += 1,
            FetchOutcome::SkippedContentType { .. } => self.skipped_content_type += 1,
        }
    }
}

/// Writes the statistics in a formatted manner
pub fn write_statistics<W: Write>(out: &mut W, stats: &CrawlStats) -> io::Result<()> {
    writeln!(out, "=== Crawl Statistics ===\n")?;

    writeln!(out, "Overview:")?;
    writeln!(out, "  Pages fetched: {}", stats.total_pages())?;
    writeln!(out, "  Domains with pages: {}", stats.pages_by_domain.len())?;
    writeln!(out, "  Links enqueued: {}", stats.links_enqueued)?;
    if stats.interrupted {
        writeln!(out, "  Stopped early: yes")?;
    }
    writeln!(out)?;

    if !stats.pages_by_domain.is_empty() {
        writeln!(out, "Pages by Domain:")?;
        let mut domains: Vec<_> = stats.pages_by_domain.iter().collect();
        domains.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        for (domain, count) in domains {
            writeln!(out, "  {}: {}", domain, count)?;
        }
        writeln!(out)?;
    }

    if stats.total_skipped() > 0 {
        writeln!(out, "Skipped:")?;
        for (label, count) in [
            ("Already visited", stats.skipped_visited),
            ("Per-domain limit", stats.skipped_domain_limit),
            ("Disallowed by robots.txt", stats.skipped_robots),
            ("Unsupported content type", stats.skipped_content_type),
            ("Failed after retries", stats.skipped_transient),
        ] {
            if count > 0 {
                writeln!(out, "  {}: {}", label, count)?;
            }
        }
        writeln!(out)?;
    }

    let attempted = stats.total_pages() + stats.skipped_content_type + stats.skipped_transient;
    let success_rate = if attempted > 0 {
        (stats.total_pages() as f64 / attempted as f64) * 100.0
    } else {
        0.0
    };
    writeln!(
        out,
        "Success Rate: {:.1}% ({} / {} fetch attempts produced a page)",
        success_rate,
        stats.total_pages(),
        attempted
    )
}

/// Prints statistics to stderr, keeping stdout free for results
pub fn print_statistics(stats: &CrawlStats) {
    let stderr = io::stderr();
    let mut handle = stderr.lock();
    if let Err(e) = write_statistics(&mut handle, stats) {
        tracing::warn!("Failed to print statistics: {}", e);
    }
}
