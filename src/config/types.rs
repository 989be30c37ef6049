use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Pulse Extractor
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default, rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum pages fetched across all domains (0 = unlimited)
    #[serde(rename = "max-pages")]
    pub max_pages: usize,

    /// Maximum pages fetched per domain (0 = unlimited)
    #[serde(rename = "per-domain-limit")]
    pub per_domain_limit: usize,

    /// Politeness pause after each successful fetch (seconds)
    #[serde(rename = "delay-seconds")]
    pub delay_seconds: f64,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-seconds")]
    pub request_timeout_seconds: u64,

    /// Retries after the first attempt for transient failures
    #[serde(rename = "max-retries")]
    pub max_retries: u32,

    /// Wall-clock budget for one crawl (seconds, 0 = no deadline)
    #[serde(rename = "max-duration-seconds")]
    pub max_duration_seconds: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: 200,
            per_domain_limit: 150,
            delay_seconds: 0.3,
            request_timeout_seconds: 20,
            max_retries: 2,
            max_duration_seconds: 0,
        }
    }
}

impl CrawlerConfig {
    /// Politeness pause as a `Duration`
    ///
    /// Negative or NaN values give no pause. Values too large for a
    /// `Duration` saturate.
    pub fn delay(&self) -> Duration {
        match Duration::try_from_secs_f64(self.delay_seconds) {
            Ok(delay) => delay,
            Err(_) if self.delay_seconds > 0.0 => Duration::MAX,
            Err(_) => Duration::ZERO,
        }
    }

    /// Per-request timeout as a `Duration`
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// Crawl deadline, if one is configured
    pub fn max_duration(&self) -> Option<Duration> {
        (self.max_duration_seconds > 0).then(|| Duration::from_secs(self.max_duration_seconds))
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler, also used as the robots.txt product token
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "PulseCrawler".to_string(),
            crawler_version: "1.0".to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header value: `CrawlerName/Version`
    pub fn header_value(&self) -> String {
        format!("{}/{}", self.crawler_name, self.crawler_version)
    }
}

/// HTTP response cache configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Whether fetched responses are cached on disk
    pub enabled: bool,

    /// Path to the SQLite cache file
    pub path: String,

    /// How long a cached response stays fresh (seconds)
    #[serde(rename = "ttl-seconds")]
    pub ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "pulse_cache.sqlite".to_string(),
            ttl_seconds: 86_400,
        }
    }
}
