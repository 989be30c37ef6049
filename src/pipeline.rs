//! Crawl-and-structure pipeline
//!
//! Wires the collaborators together: seeds are crawled, every fetched page is
//! extracted into sections, sections are folded into modules, and modules are
//! projected into output records.

use crate::cache::{CachedTransport, ResponseCache, SqliteCache};
use crate::config::Config;
use crate::crawler::{Crawler, HttpTransport, Page, Transport};
use crate::extract::{extract_page_content, PageContent};
use crate::infer::infer_structure;
use crate::output::{to_output_list, CrawlStats, ModuleRecord};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Everything one pipeline run produced
#[derive(Debug, Clone, Default)]
pub struct PipelineOutput {
    pub records: Vec<ModuleRecord>,
    /// Extracted content, in fetch order
    pub pages: Vec<PageContent>,
    pub stats: CrawlStats,
}

/// A configured crawl-and-structure run
pub struct Pipeline {
    crawler: Crawler,
}

/// Builds the network transport, behind the response cache when enabled
fn build_transport(config: &Config) -> crate::Result<Arc<dyn Transport>> {
    let http = HttpTransport::new(&config.user_agent)?;

    if !config.cache.enabled {
        return Ok(Arc::new(http));
    }

    let ttl = Duration::from_secs(config.cache.ttl_seconds);
    let mut cache = SqliteCache::new(Path::new(&config.cache.path))?;
    match cache.purge_expired(ttl) {
        Ok(purged) => tracing::debug!(
            "Response cache at {} (ttl {}s, {} expired entries purged)",
            config.cache.path,
            config.cache.ttl_seconds,
            purged
        ),
        Err(e) => tracing::warn!("Could not purge expired cache entries: {}", e),
    }
    Ok(Arc::new(CachedTransport::new(http, cache, ttl)))
}

impl Pipeline {
    /// Creates a pipeline that fetches over HTTP
    ///
    /// Fails if the HTTP client cannot be built or the cache database cannot
    /// be opened.
    pub fn from_config(config: &Config) -> crate::Result<Self> {
        Ok(Self::with_transport(build_transport(config)?, config))
    }

    /// Creates a pipeline over an arbitrary transport
    pub fn with_transport(transport: Arc<dyn Transport>, config: &Config) -> Self {
        Self {
            crawler: Crawler::new(transport, config),
        }
    }

    /// Replaces the crawler, e.g. to adjust limits or attach cancellation
    pub fn map_crawler(mut self, f: impl FnOnce(Crawler) -> Crawler) -> Self {
        self.crawler = f(self.crawler);
        self
    }

    pub fn crawler(&self) -> &Crawler {
        &self.crawler
    }

    /// Crawls `seeds` and infers the module hierarchy
    pub async fn run(&self, seeds: &[String]) -> PipelineOutput {
        let report = self.crawler.crawl(seeds).await;
        let pages = extract_pages(&report.pages);
        let modules = infer_structure(&pages);
        let records = to_output_list(&modules);

        tracing::info!(
            "Pipeline finished: {} pages, {} modules",
            pages.len(),
            records.len()
        );

        PipelineOutput {
            records,
            pages,
            stats: report.stats,
        }
    }
}

fn extract_pages(pages: &[Page]) -> Vec<PageContent> {
    pages
        .iter()
        .map(|page| extract_page_content(&page.url, &page.html, page.content_type.as_deref()))
        .collect()
}

/// Crawls `seeds` with default settings and returns the module records
///
/// `max_pages` and `per_domain_limit` of 0 mean unlimited. `delay` is the
/// politeness pause in seconds between successful fetches. A negative,
/// non-finite or over-long delay is a configuration error.
pub async fn run_pipeline(
    seeds: &[String],
    max_pages: usize,
    per_domain_limit: usize,
    delay: f64,
) -> crate::Result<Vec<ModuleRecord>> {
    let mut config = Config::default();
    config.crawler.max_pages = max_pages;
    config.crawler.per_domain_limit = per_domain_limit;
    config.crawler.delay_seconds = delay;
    crate::config::validate(&config)?;

    let pipeline = Pipeline::from_config(&config)?;
    Ok(pipeline.run(seeds).await.records)
}
