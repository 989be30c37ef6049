//! Robots.txt handling module
//!
//! [`RobotsGate`] answers "may this URL be fetched?" for the crawler. It
//! fetches `{scheme}://{host}/robots.txt` through the shared transport the
//! first time an origin is seen and memoizes the result for the rest of the
//! crawl.
//!
//! The gate fails open: a transport error, a timeout, a non-200 status or an
//! empty body all mean "allowed".

mod cache;
mod parser;

pub use cache::RobotsCache;
pub use parser::ParsedRobots;

use crate::crawler::Transport;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Fetches robots.txt for the origin of `url`
///
/// Never fails: anything other than a 200 with a body yields
/// [`ParsedRobots::allow_all`].
pub async fn fetch_robots(transport: &dyn Transport, url: &Url, timeout: Duration) -> ParsedRobots {
    let Ok(robots_url) = url.join("/robots.txt") else {
        return ParsedRobots::allow_all();
    };

    match transport.get(&robots_url, timeout).await {
        Ok(response) if response.status == 200 && !response.body.trim().is_empty() => {
            ParsedRobots::from_content(&response.body)
        }
        Ok(response) => {
            tracing::debug!(
                "No usable robots.txt at {} (status {}), allowing all",
                robots_url,
                response.status
            );
            ParsedRobots::allow_all()
        }
        Err(e) => {
            tracing::debug!("Failed to fetch {}: {}, allowing all", robots_url, e);
            ParsedRobots::allow_all()
        }
    }
}

/// Crawl-scoped robots.txt gate
pub struct RobotsGate {
    transport: Arc<dyn Transport>,
    product_token: String,
    timeout: Duration,
    cache: RobotsCache,
}

impl RobotsGate {
    /// Creates a gate that identifies itself as `product_token`
    pub fn new(transport: Arc<dyn Transport>, product_token: &str, timeout: Duration) -> Self {
        Self {
            transport,
            product_token: product_token.to_string(),
            timeout,
            cache: RobotsCache::new(),
        }
    }

    /// Checks whether `url` may be fetched
    pub async fn can_fetch(&mut self, url: &Url) -> bool {
        let origin = url.origin().ascii_serialization();

        if let Some(cached) = self.cache.get(&origin) {
            tracing::trace!("robots.txt for {} already cached", origin);
            return cached.is_allowed(url.as_str(), &self.product_token);
        }

        let robots = fetch_robots(self.transport.as_ref(), url, self.timeout).await;
        let cached = self.cache.insert(origin, robots);
        cached.is_allowed(url.as_str(), &self.product_token)
    }

    /// Number of origins seen so far
    pub fn origins_seen(&self) -> usize {
        self.cache.len()
    }
}
