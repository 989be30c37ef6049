//! Crawl coordinator - main crawl orchestration logic
//!
//! Runs the round-robin loop over seed domains: asks the scheduler for a
//! candidate, checks robots.txt, fetches, discovers links, and pauses between
//! successful fetches. Everything the loop touches (queues, visited set,
//! robots memo, counters) is created per call to [`Crawler::crawl`].

use crate::config::Config;
use crate::crawler::fetcher::{FetchOutcome, FetchPolicy, Fetcher};
use crate::crawler::parser::discover_links;
use crate::crawler::scheduler::{Candidate, CrawlLimits, Scheduler};
use crate::crawler::transport::Transport;
use crate::crawler::Page;
use crate::output::CrawlStats;
use crate::robots::RobotsGate;
use crate::url::normalize_url;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// Pages gathered by one crawl, plus how the crawl went
#[derive(Debug, Clone, Default)]
pub struct CrawlReport {
    /// Fetched pages, in fetch order
    pub pages: Vec<Page>,
    pub stats: CrawlStats,
}

/// Crawls documentation sites with per-domain fair-share scheduling
pub struct Crawler {
    transport: Arc<dyn Transport>,
    policy: FetchPolicy,
    limits: CrawlLimits,
    delay: Duration,
    product_token: String,
    max_duration: Option<Duration>,
    cancel: CancellationToken,
}

impl Crawler {
    /// Creates a crawler from the configuration, fetching through `transport`
    pub fn new(transport: Arc<dyn Transport>, config: &Config) -> Self {
        Self {
            transport,
            policy: FetchPolicy::from_config(&config.crawler),
            limits: CrawlLimits::new(config.crawler.max_pages, config.crawler.per_domain_limit),
            delay: config.crawler.delay(),
            product_token: config.user_agent.crawler_name.clone(),
            max_duration: config.crawler.max_duration(),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_limits(mut self, limits: CrawlLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_fetch_policy(mut self, policy: FetchPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Stops the crawl once `max_duration` has elapsed
    pub fn with_max_duration(mut self, max_duration: Option<Duration>) -> Self {
        self.max_duration = max_duration;
        self
    }

    /// Uses an externally owned token for cancellation
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Token that stops the crawl when cancelled
    ///
    /// Cancellation is observed between candidates and during the politeness
    /// pause; pages fetched so far are still returned.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn limits(&self) -> CrawlLimits {
        self.limits
    }

    /// Crawls from `seeds` and returns the fetched pages
    ///
    /// Seeds are normalized first; unusable ones are dropped. An empty seed
    /// list (after normalization) yields an empty report without touching the
    /// network.
    pub async fn crawl(&self, seeds: &[String]) -> CrawlReport {
        let normalized: Vec<_> = seeds
            .iter()
            .filter_map(|seed| {
                let url = normalize_url(seed);
                if url.is_none() {
                    tracing::debug!("Ignoring invalid seed URL: {:?}", seed);
                }
                url
            })
            .collect();

        let mut scheduler = Scheduler::new(normalized, self.limits);
        let mut robots = RobotsGate::new(
            self.transport.clone(),
            &self.product_token,
            self.policy.timeout,
        );
        let fetcher = Fetcher::new(self.transport.clone(), self.policy.clone());
        let mut report = CrawlReport::default();
        let started = Instant::now();

        tracing::info!(
            "Starting crawl of {} domain(s), max pages {}, per-domain limit {}",
            scheduler.domain_order().len(),
            self.limits.max_pages,
            self.limits.per_domain_limit
        );

        'rounds: while scheduler.should_continue() {
            let order = scheduler.domain_order().to_vec();
            for domain in &order {
                if self.should_stop(started) {
                    report.stats.interrupted = true;
                    break 'rounds;
                }

                let url = match scheduler.take_candidate(domain) {
                    Candidate::Idle | Candidate::Deferred => continue,
                    Candidate::CapReached => break,
                    Candidate::Skipped(reason) => {
                        tracing::trace!("Skipped a queued URL for {}: {:?}", domain, reason);
                        report.stats.record_skip(reason);
                        continue;
                    }
                    Candidate::Ready(url) => url,
                };

                if !robots.can_fetch(&url).await {
                    tracing::debug!("Disallowed by robots.txt: {}", url);
                    report.stats.record_outcome(&FetchOutcome::SkippedPolicy);
                    continue;
                }

                let page = match fetcher.fetch(&url).await {
                    FetchOutcome::Fetched(page) => page,
                    outcome => {
                        report.stats.record_outcome(&outcome);
                        continue;
                    }
                };

                scheduler.record_fetch(domain);
                report.stats.record_page(domain);
                tracing::info!("Fetched {}", page.url);

                for link in discover_links(&page.html, &url, domain) {
                    if scheduler.enqueue(domain, link) {
                        report.stats.links_enqueued += 1;
                    }
                }
                report.pages.push(page);

                if report.pages.len() % 10 == 0 {
                    let elapsed = started.elapsed().as_secs_f64();
                    tracing::info!(
                        "Progress: {} pages fetched, {:.2} pages/sec",
                        report.pages.len(),
                        report.pages.len() as f64 / elapsed.max(f64::EPSILON)
                    );
                }

                self.pause().await;
            }
            scheduler.end_round();
        }

        if report.stats.interrupted {
            tracing::warn!("Crawl stopped early after {} pages", report.pages.len());
        } else {
            tracing::info!(
                "Crawl complete: {} pages in {:.1}s",
                report.pages.len(),
                started.elapsed().as_secs_f64()
            );
        }

        report
    }

    fn should_stop(&self, started: Instant) -> bool {
        if self.cancel.is_cancelled() {
            return true;
        }
        matches!(self.max_duration, Some(limit) if started.elapsed() >= limit)
    }

    async fn pause(&self) {
        if self.delay.is_zero() {
            return;
        }
        tokio::select! {
            _ = tokio::time::sleep(self.delay) => {}
            _ = self.cancel.cancelled() => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::{HttpResponse, MemoryTransport};

    fn fast_crawler(transport: Arc<MemoryTransport>, max_pages: usize, per_domain: usize) -> Crawler {
        Crawler::new(transport, &Config::default())
            .with_limits(CrawlLimits::new(max_pages, per_domain))
            .with_delay(Duration::ZERO)
            .with_fetch_policy(FetchPolicy {
                timeout: Duration::from_secs(1),
                max_retries: 0,
                initial_backoff: Duration::from_millis(1),
                backoff_factor: 1.5,
            })
    }

    fn page_urls(report: &CrawlReport) -> Vec<&str> {
        report.pages.iter().map(|p| p.url.as_str()).collect()
    }

    #[tokio::test]
    async fn test_empty_seed_list() {
        let transport = Arc::new(MemoryTransport::new());
        let report = fast_crawler(transport.clone(), 10, 10).crawl(&[]).await;

        assert!(report.pages.is_empty());
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_seeds_are_dropped() {
        let transport = Arc::new(MemoryTransport::new());
        let seeds = vec!["".to_string(), "ftp://example.com/".to_string()];
        let report = fast_crawler(transport.clone(), 10, 10).crawl(&seeds).await;

        assert!(report.pages.is_empty());
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_follows_same_domain_links() {
        let transport = Arc::new(
            MemoryTransport::new()
                .with_html(
                    "https://a.com/",
                    r#"<a href="/help/one">One</a><a href="https://b.com/help">B</a>"#,
                )
                .with_html("https://a.com/help/one", r#"<a href="/">Home</a>"#),
        );
        let report = fast_crawler(transport.clone(), 0, 0)
            .crawl(&["https://a.com/".to_string()])
            .await;

        assert_eq!(page_urls(&report), vec!["https://a.com/", "https://a.com/help/one"]);
        assert_eq!(transport.request_count("https://b.com/help"), 0);
        assert_eq!(report.stats.pages_by_domain["a.com"], 2);
    }

    #[tokio::test]
    async fn test_max_pages_one_fetches_seed_only() {
        let transport = Arc::new(
            MemoryTransport::new().with_html("https://a.com/", r#"<a href="/help/x">X</a>"#),
        );
        let report = fast_crawler(transport.clone(), 1, 0)
            .crawl(&["https://a.com/".to_string()])
            .await;

        assert_eq!(page_urls(&report), vec!["https://a.com/"]);
        assert_eq!(transport.request_count("https://a.com/help/x"), 0);
    }

    #[tokio::test]
    async fn test_round_robin_interleaves_domains() {
        let transport = Arc::new(
            MemoryTransport::new()
                .with_html(
                    "https://a.com/",
                    r#"<a href="/help/1">1</a><a href="/help/2">2</a>"#,
                )
                .with_html("https://a.com/help/1", "<p>a1</p>")
                .with_html("https://a.com/help/2", "<p>a2</p>")
                .with_html("https://b.com/", r#"<a href="/help/1">1</a>"#)
                .with_html("https://b.com/help/1", "<p>b1</p>"),
        );
        let seeds = vec!["https://a.com/".to_string(), "https://b.com/".to_string()];
        let report = fast_crawler(transport, 0, 0).crawl(&seeds).await;

        assert_eq!(
            page_urls(&report),
            vec![
                "https://a.com/",
                "https://b.com/",
                "https://a.com/help/1",
                "https://b.com/help/1",
                "https://a.com/help/2",
            ]
        );
    }

    #[tokio::test]
    async fn test_robots_disallow_is_honored() {
        let transport = Arc::new(
            MemoryTransport::new()
                .with_response(
                    "https://a.com/robots.txt",
                    HttpResponse::ok(Some("text/plain"), "User-agent: *\nDisallow: /private/"),
                )
                .with_html(
                    "https://a.com/",
                    r#"<a href="/private/help">P</a><a href="/help">H</a>"#,
                )
                .with_html("https://a.com/help", "<p>ok</p>")
                .with_html("https://a.com/private/help", "<p>secret</p>"),
        );
        let report = fast_crawler(transport.clone(), 0, 0)
            .crawl(&["https://a.com/".to_string()])
            .await;

        assert_eq!(page_urls(&report), vec!["https://a.com/", "https://a.com/help"]);
        assert_eq!(transport.request_count("https://a.com/private/help"), 0);
        assert_eq!(report.stats.skipped_robots, 1);
    }

    #[tokio::test]
    async fn test_cancelled_before_start_returns_nothing() {
        let transport = Arc::new(MemoryTransport::new().with_html("https://a.com/", "<p>x</p>"));
        let crawler = fast_crawler(transport.clone(), 0, 0);
        crawler.cancellation_token().cancel();

        let report = crawler.crawl(&["https://a.com/".to_string()]).await;
        assert!(report.pages.is_empty());
        assert!(report.stats.interrupted);
        assert!(transport.requests().is_empty());
    }

    fn help_chain(pages: usize) -> MemoryTransport {
        let mut transport =
            MemoryTransport::new().with_html("https://a.com/", r#"<a href="/help/1">1</a>"#);
        for i in 1..pages {
            transport = transport.with_html(
                &format!("https://a.com/help/{}", i),
                format!(r#"<a href="/help/{}">next</a>"#, i + 1),
            );
        }
        transport
    }

    #[tokio::test]
    async fn test_deadline_stops_crawl() {
        let transport = Arc::new(help_chain(10));
        let crawler = fast_crawler(transport.clone(), 0, 0)
            .with_delay(Duration::from_millis(40))
            .with_max_duration(Some(Duration::from_millis(100)));

        let report = crawler.crawl(&["https://a.com/".to_string()]).await;

        assert!(report.stats.interrupted);
        assert!(!report.pages.is_empty());
        assert!(report.pages.len() < 10);
        assert_eq!(transport.request_count("https://a.com/help/9"), 0);
    }

    #[tokio::test]
    async fn test_cancel_cuts_pause_short() {
        let transport = Arc::new(help_chain(2));
        let crawler = fast_crawler(transport.clone(), 0, 0).with_delay(Duration::from_secs(10));

        let cancel = crawler.cancellation_token();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            cancel.cancel();
        });

        let report = tokio::time::timeout(
            Duration::from_secs(2),
            crawler.crawl(&["https://a.com/".to_string()]),
        )
        .await
        .expect("crawl should return once cancelled");

        assert_eq!(page_urls(&report), vec!["https://a.com/"]);
        assert_eq!(transport.request_count("https://a.com/help/1"), 0);
        assert!(report.stats.interrupted);
    }

    #[tokio::test]
    async fn test_no_duplicate_pages() {
        let transport = Arc::new(
            MemoryTransport::new()
                .with_html(
                    "https://a.com/",
                    r##"<a href="/help">H</a><a href="/help#top">H</a><a href="/">Home</a>"##,
                )
                .with_html("https://a.com/help", r#"<a href="/">Home</a>"#),
        );
        let report = fast_crawler(transport.clone(), 0, 0)
            .crawl(&["https://a.com/".to_string(), "https://a.com/".to_string()])
            .await;

        assert_eq!(page_urls(&report), vec!["https://a.com/", "https://a.com/help"]);
        assert_eq!(transport.request_count("https://a.com/help"), 1);
    }
}
