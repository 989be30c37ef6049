//! HTTP transport seam
//!
//! Every network read made by the crawler (pages and robots.txt) goes through
//! the [`Transport`] trait, so the response cache and test fixtures can stand
//! in for the real HTTP client without the fetcher or scheduler noticing.

use crate::config::UserAgentConfig;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// A raw HTTP response as seen by the crawler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,

    /// Response body decoded as text
    pub body: String,

    /// Content-Type header value, `None` when absent or empty
    pub content_type: Option<String>,
}

impl HttpResponse {
    /// A 200 response with the given content type and body
    pub fn ok(content_type: Option<&str>, body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
            content_type: content_type.map(str::to_string),
        }
    }

    /// A 200 `text/html` response
    pub fn html(body: impl Into<String>) -> Self {
        Self::ok(Some("text/html; charset=utf-8"), body)
    }

    /// An empty response with the given status
    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: String::new(),
            content_type: None,
        }
    }
}

/// Transport-level failures (no HTTP status was received)
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection failed for {url}: {message}")]
    Connect { url: String, message: String },

    #[error("HTTP error for {url}: {message}")]
    Other { url: String, message: String },
}

impl TransportError {
    fn classify(url: &Url, error: reqwest::Error) -> Self {
        let url = url.to_string();
        if error.is_timeout() {
            Self::Timeout { url }
        } else if error.is_connect() {
            Self::Connect {
                url,
                message: error.to_string(),
            }
        } else {
            Self::Other {
                url,
                message: error.to_string(),
            }
        }
    }
}

/// Performs a single GET request
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetches `url`, giving up after `timeout`
    async fn get(&self, url: &Url, timeout: Duration) -> Result<HttpResponse, TransportError>;
}

/// Builds an HTTP client with the crawler's identifying user agent
///
/// # Example
///
/// ```no_run
/// use pulse_extractor::config::UserAgentConfig;
/// use pulse_extractor::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`Transport`] backed by a `reqwest` client
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Creates a transport with a freshly built client
    pub fn new(config: &UserAgentConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &Url, timeout: Duration) -> Result<HttpResponse, TransportError> {
        let response = self
            .client
            .get(url.clone())
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| TransportError::classify(url, e))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string);

        let body = response
            .text()
            .await
            .map_err(|e| TransportError::classify(url, e))?;

        Ok(HttpResponse {
            status,
            body,
            content_type,
        })
    }
}

type Reply = Result<HttpResponse, TransportError>;

/// [`Transport`] that serves canned responses from memory
///
/// Unknown URLs answer `404`. A URL registered with a sequence replays the
/// replies in order and keeps repeating the last one. Every request is
/// recorded, which makes this the fixture of choice for offline runs and
/// deterministic scheduling tests.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    routes: Mutex<HashMap<String, VecDeque<Reply>>>,
    requests: Mutex<Vec<String>>,
}

impl MemoryTransport {
    /// Creates an empty transport (every URL answers 404)
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a fixed response for `url`
    pub fn with_response(self, url: &str, response: HttpResponse) -> Self {
        self.with_sequence(url, vec![Ok(response)])
    }

    /// Registers a 200 `text/html` page for `url`
    pub fn with_html(self, url: &str, body: impl Into<String>) -> Self {
        self.with_response(url, HttpResponse::html(body))
    }

    /// Registers a sequence of replies for `url`
    pub fn with_sequence(self, url: &str, replies: Vec<Reply>) -> Self {
        self.routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(url.to_string(), replies.into());
        self
    }

    /// All requested URLs, in request order
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// How many times `url` was requested
    pub fn request_count(&self, url: &str) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|requested| requested.as_str() == url)
            .count()
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn get(&self, url: &Url, _timeout: Duration) -> Result<HttpResponse, TransportError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url.to_string());

        let mut routes = self.routes.lock().unwrap_or_else(PoisonError::into_inner);
        match routes.get_mut(url.as_str()) {
            Some(replies) if replies.len() > 1 => replies
                .pop_front()
                .unwrap_or_else(|| Ok(HttpResponse::status(404))),
            Some(replies) => replies
                .front()
                .cloned()
                .unwrap_or_else(|| Ok(HttpResponse::status(404))),
            None => Ok(HttpResponse::status(404)),
        }
    }
}
