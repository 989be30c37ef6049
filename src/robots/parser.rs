//! Robots.txt parser implementation
//!
//! Thin wrapper over the robotstxt crate's matcher.

use robotstxt::DefaultMatcher;

/// Parsed robots.txt data for one origin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRobots {
    /// Raw robots.txt content (empty means allow all)
    content: String,
}

impl ParsedRobots {
    /// Wraps raw robots.txt content
    pub fn from_content(content: &str) -> Self {
        Self {
            content: content.to_string(),
        }
    }

    /// A permissive instance, used whenever robots.txt is unavailable
    pub fn allow_all() -> Self {
        Self {
            content: String::new(),
        }
    }

    pub fn is_allow_all(&self) -> bool {
        self.content.trim().is_empty()
    }

    /// Checks if `url` may be fetched by the crawler identified by `user_agent`
    ///
    /// `user_agent` is the product token (e.g. `PulseCrawler`), not the full
    /// User-Agent header.
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        if self.is_allow_all() {
            return true;
        }

        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(&self.content, user_agent, url)
    }
}
