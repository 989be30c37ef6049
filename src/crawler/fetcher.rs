//! Page fetcher
//!
//! Wraps a [`Transport`] with the crawler's fetch policy:
//! - a per-attempt timeout
//! - bounded retries with exponential backoff for transient failures
//! - a Content-Type gate that only lets text-like documents through
//!
//! The fetcher never fails: every attempt ends in a tagged [`FetchOutcome`],
//! and only [`FetchOutcome::Fetched`] carries a page.

use crate::config::CrawlerConfig;
use crate::crawler::transport::Transport;
use crate::crawler::Page;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Content types the crawler keeps, matched by substring
const ACCEPTED_CONTENT_TYPES: &[&str] = &["text/html", "text/plain", "text/markdown"];

/// Result of fetching one URL
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// A 200 response with a non-empty, acceptable body
    Fetched(Page),

    /// robots.txt disallows the URL (produced by the coordinator, never by the fetcher)
    SkippedPolicy,

    /// Every attempt failed or returned a non-200 / empty response
    SkippedTransient,

    /// The response was a document type the pipeline cannot read
    SkippedContentType {
        /// The rejected Content-Type header value
        content_type: String,
    },
}

/// Timeout and retry settings for [`Fetcher`]
#[derive(Debug, Clone, PartialEq)]
pub struct FetchPolicy {
    /// Timeout for each individual attempt
    pub timeout: Duration,

    /// Retries after the first attempt
    pub max_retries: u32,

    /// Pause before the first retry
    pub initial_backoff: Duration,

    /// Multiplier applied to the pause after every retry
    pub backoff_factor: f64,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(20),
            max_retries: 2,
            initial_backoff: Duration::from_millis(600),
            backoff_factor: 1.5,
        }
    }
}

impl FetchPolicy {
    /// Policy taken from the crawler section of the configuration
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self {
            timeout: config.request_timeout(),
            max_retries: config.max_retries,
            ..Self::default()
        }
    }
}

/// Returns true if the Content-Type names a document the pipeline can read
///
/// The match is a case-sensitive substring check, so `Text/HTML` is refused.
pub fn is_accepted_content_type(content_type: &str) -> bool {
    ACCEPTED_CONTENT_TYPES.iter().any(|t| content_type.contains(t))
}

/// Fetches pages through a shared transport
#[derive(Clone)]
pub struct Fetcher {
    transport: Arc<dyn Transport>,
    policy: FetchPolicy,
}

impl Fetcher {
    pub fn new(transport: Arc<dyn Transport>, policy: FetchPolicy) -> Self {
        Self { transport, policy }
    }

    pub fn policy(&self) -> &FetchPolicy {
        &self.policy
    }

    /// Fetches `url`, retrying transient failures
    ///
    /// # Retry Logic
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | 200, non-empty, accepted or missing Content-Type | `Fetched` |
    /// | 200, non-empty, other Content-Type | `SkippedContentType`, no retry |
    /// | non-200 status or empty body | retry |
    /// | transport error or timeout | retry |
    ///
    /// After `max_retries` retries the outcome is `SkippedTransient`.
    pub async fn fetch(&self, url: &Url) -> FetchOutcome {
        let mut backoff = self.policy.initial_backoff;

        for attempt in 0..=self.policy.max_retries {
            match self.transport.get(url, self.policy.timeout).await {
                Ok(response) if response.status == 200 && !response.body.is_empty() => {
                    match response.content_type {
                        Some(content_type) if !is_accepted_content_type(&content_type) => {
                            tracing::debug!("Skipping {} ({})", url, content_type);
                            return FetchOutcome::SkippedContentType { content_type };
                        }
                        content_type => {
                            return FetchOutcome::Fetched(Page {
                                url: url.to_string(),
                                html: response.body,
                                content_type,
                            });
                        }
                    }
                }
                Ok(response) => {
                    tracing::debug!(
                        "Attempt {} for {} returned status {} ({} bytes)",
                        attempt + 1,
                        url,
                        response.status,
                        response.body.len()
                    );
                }
                Err(e) => {
                    tracing::debug!("Attempt {} for {} failed: {}", attempt + 1, url, e);
                }
            }

            if attempt < self.policy.max_retries {
                tokio::time::sleep(backoff).await;
                backoff = backoff.mul_f64(self.policy.backoff_factor);
            }
        }

        tracing::warn!("Giving up on {}", url);
        FetchOutcome::SkippedTransient
    }
}
