//! On-disk HTTP response cache
//!
//! Repeated runs against the same documentation sites should not hammer
//! them. [`CachedTransport`] wraps any [`Transport`] and serves fresh `200`
//! responses from a [`ResponseCache`] (SQLite by default). Only successful
//! responses are stored, so failures are always retried against the network.

mod schema;
mod sqlite;

pub use sqlite::SqliteCache;

use crate::crawler::{HttpResponse, Transport, TransportError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Errors that can occur during cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid timestamp in cache entry: {0}")]
    Timestamp(String),
}

/// Result type for cache operations
pub type CacheResult<T> = Result<T, CacheError>;

/// A stored response
#[derive(Debug, Clone, PartialEq)]
pub struct CachedResponse {
    pub url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
    pub fetched_at: DateTime<Utc>,
}

impl CachedResponse {
    /// Snapshot of a live response, stamped with the current time
    pub fn from_response(url: &Url, response: &HttpResponse) -> Self {
        Self {
            url: url.to_string(),
            status: response.status,
            content_type: response.content_type.clone(),
            body: response.body.clone(),
            fetched_at: Utc::now(),
        }
    }

    /// Whether this entry is younger than `ttl`
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        let age = Utc::now().signed_duration_since(self.fetched_at);
        match age.to_std() {
            Ok(age) => age < ttl,
            // fetched_at in the future (clock skew): treat as fresh
            Err(_) => true,
        }
    }

    pub fn into_response(self) -> HttpResponse {
        HttpResponse {
            status: self.status,
            body: self.body,
            content_type: self.content_type,
        }
    }
}

/// Key under which a GET for `url` is cached: hex SHA-256 of `GET <url>`
pub fn cache_key(url: &Url) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"GET ");
    hasher.update(url.as_str().as_bytes());
    hex::encode(hasher.finalize())
}

/// Storage backend for cached responses
pub trait ResponseCache: Send {
    /// Looks up an entry by key, regardless of age
    fn get(&self, key: &str) -> CacheResult<Option<CachedResponse>>;

    /// Inserts or replaces an entry
    fn put(&mut self, key: &str, entry: &CachedResponse) -> CacheResult<()>;

    /// Deletes entries older than `ttl`, returning how many were removed
    fn purge_expired(&mut self, ttl: Duration) -> CacheResult<usize>;

    /// Number of stored entries
    fn len(&self) -> CacheResult<usize>;

    fn is_empty(&self) -> CacheResult<bool> {
        Ok(self.len()? == 0)
    }
}

/// [`Transport`] decorator that consults a [`ResponseCache`] first
///
/// Cache failures are logged and otherwise ignored: a broken cache degrades
/// to plain network fetching.
pub struct CachedTransport<T, C> {
    inner: T,
    cache: Mutex<C>,
    ttl: Duration,
}

impl<T: Transport, C: ResponseCache> CachedTransport<T, C> {
    pub fn new(inner: T, cache: C, ttl: Duration) -> Self {
        Self {
            inner,
            cache: Mutex::new(cache),
            ttl,
        }
    }

    fn lookup(&self, key: &str) -> Option<HttpResponse> {
        let cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        match cache.get(key) {
            Ok(Some(entry)) if entry.is_fresh(self.ttl) => Some(entry.into_response()),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!("Cache read failed: {}", e);
                None
            }
        }
    }

    fn store(&self, key: &str, url: &Url, response: &HttpResponse) {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = cache.put(key, &CachedResponse::from_response(url, response)) {
            tracing::warn!("Cache write failed for {}: {}", url, e);
        }
    }
}

#[async_trait]
impl<T: Transport, C: ResponseCache> Transport for CachedTransport<T, C> {
    async fn get(&self, url: &Url, timeout: Duration) -> Result<HttpResponse, TransportError> {
        let key = cache_key(url);
        if let Some(response) = self.lookup(&key) {
            tracing::trace!("Cache hit: {}", url);
            return Ok(response);
        }

        let response = self.inner.get(url, timeout).await?;
        if response.status == 200 && !response.body.is_empty() {
            self.store(&key, url, &response);
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::MemoryTransport;
    use std::sync::Arc;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_cache_key_is_stable_and_distinct() {
        let a = cache_key(&url("https://example.com/a"));
        assert_eq!(a, cache_key(&url("https://example.com/a")));
        assert_ne!(a, cache_key(&url("https://example.com/b")));
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_freshness() {
        let mut entry =
            CachedResponse::from_response(&url("https://example.com/"), &HttpResponse::html("x"));
        assert!(entry.is_fresh(Duration::from_secs(60)));

        entry.fetched_at = Utc::now() - chrono::Duration::seconds(120);
        assert!(!entry.is_fresh(Duration::from_secs(60)));
    }

    // Lets a test keep a handle on the inner transport's request log
    struct Shared(Arc<MemoryTransport>);

    #[async_trait]
    impl Transport for Shared {
        async fn get(&self, url: &Url, timeout: Duration) -> Result<HttpResponse, TransportError> {
            self.0.get(url, timeout).await
        }
    }

    #[tokio::test]
    async fn test_second_request_served_from_cache() {
        let memory =
            Arc::new(MemoryTransport::new().with_html("https://example.com/docs", "<h1>Docs</h1>"));
        let cache = SqliteCache::new_in_memory().unwrap();
        let transport =
            CachedTransport::new(Shared(memory.clone()), cache, Duration::from_secs(3600));
        let target = url("https://example.com/docs");

        let first = transport.get(&target, Duration::from_secs(1)).await.unwrap();
        let second = transport.get(&target, Duration::from_secs(1)).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(memory.request_count("https://example.com/docs"), 1);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let memory = Arc::new(MemoryTransport::new());
        let cache = SqliteCache::new_in_memory().unwrap();
        let transport =
            CachedTransport::new(Shared(memory.clone()), cache, Duration::from_secs(3600));
        let target = url("https://example.com/missing");

        transport.get(&target, Duration::from_secs(1)).await.unwrap();
        transport.get(&target, Duration::from_secs(1)).await.unwrap();

        assert_eq!(memory.request_count("https://example.com/missing"), 2);
    }
}
