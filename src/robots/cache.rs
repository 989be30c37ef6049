//! Per-origin robots.txt memo
//!
//! robots.txt is fetched at most once per origin per crawl. Entries live as
//! long as the crawl does.

use crate::robots::ParsedRobots;
use std::collections::HashMap;

/// Origin → robots.txt map
#[derive(Debug, Default)]
pub struct RobotsCache {
    entries: HashMap<String, ParsedRobots>,
}

impl RobotsCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, origin: &str) -> Option<&ParsedRobots> {
        self.entries.get(origin)
    }

    /// Stores `robots` for `origin` unless an entry exists, returning the stored entry
    pub fn insert(&mut self, origin: String, robots: ParsedRobots) -> &ParsedRobots {
        self.entries.entry(origin).or_insert(robots)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
