//! Fair-share round-robin scheduler
//!
//! The scheduler decides which URL is tried next. It knows nothing about
//! HTTP: the coordinator asks it for a candidate per domain, performs the
//! fetch, and reports back.
//!
//! # Phases
//!
//! With a bounded page cap every seed domain gets a budget of
//! `max(1, max_pages / domains)` (capped by the per-domain limit). During the
//! *fair* phase a domain that has used its budget is passed over. Once no
//! domain is both under budget and holding queued URLs, the scheduler moves to
//! the *fill* phase and budgets stop applying, so leftover capacity goes to
//! whichever domains still have work.

use crate::state::DomainState;
use crate::url::DomainKey;
use std::collections::{HashMap, HashSet};
use url::Url;

/// Page caps for one crawl (`0` means unlimited)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlLimits {
    pub max_pages: usize,
    pub per_domain_limit: usize,
}

impl CrawlLimits {
    pub fn new(max_pages: usize, per_domain_limit: usize) -> Self {
        Self {
            max_pages,
            per_domain_limit,
        }
    }

    pub fn pages_bounded(&self) -> bool {
        self.max_pages > 0
    }

    fn budget_for(&self, domain_count: usize) -> Option<usize> {
        if !self.pages_bounded() {
            return None;
        }
        let base = (self.max_pages / domain_count.max(1)).max(1);
        if self.per_domain_limit > 0 {
            Some(base.min(self.per_domain_limit))
        } else {
            Some(base)
        }
    }
}

impl Default for CrawlLimits {
    fn default() -> Self {
        Self::new(200, 150)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Budgets apply
    Fair,
    /// Budgets no longer apply
    Fill,
}

/// Why a popped URL was dropped without fetching
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    AlreadyVisited,
    DomainLimit,
}

/// What the scheduler offers for one domain on one turn of a round
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate {
    /// The domain has nothing queued
    Idle,

    /// The global page cap is reached; the round should end
    CapReached,

    /// The domain has used its fair share for now
    Deferred,

    /// A URL was popped but must not be fetched
    Skipped(SkipReason),

    /// A URL to robots-check and fetch
    Ready(Url),
}

/// Frontier and per-domain bookkeeping for a single crawl
#[derive(Debug)]
pub struct Scheduler {
    order: Vec<DomainKey>,
    domains: HashMap<DomainKey, DomainState>,
    visited: HashSet<String>,
    limits: CrawlLimits,
    phase: Phase,
    fetched_total: usize,
}

impl Scheduler {
    /// Builds the per-domain queues from already-normalized seeds
    ///
    /// Domains are ordered by first appearance among the seeds. Seeds without
    /// a usable host are dropped.
    pub fn new(seeds: impl IntoIterator<Item = Url>, limits: CrawlLimits) -> Self {
        let mut order = Vec::new();
        let mut domains: HashMap<DomainKey, DomainState> = HashMap::new();

        for seed in seeds {
            let Some(key) = DomainKey::from_url(&seed) else {
                tracing::debug!("Dropping seed without host: {}", seed);
                continue;
            };
            match domains.get_mut(&key) {
                Some(state) => state.queue.push_back(seed),
                None => {
                    order.push(key.clone());
                    domains.insert(key, DomainState::with_seed(seed));
                }
            }
        }

        let budget = limits.budget_for(order.len());
        for state in domains.values_mut() {
            state.budget = budget;
        }

        Self {
            order,
            domains,
            visited: HashSet::new(),
            limits,
            phase: Phase::Fair,
            fetched_total: 0,
        }
    }

    /// Seed domains in round-robin order
    pub fn domain_order(&self) -> &[DomainKey] {
        &self.order
    }

    pub fn limits(&self) -> CrawlLimits {
        self.limits
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Pages fetched across all domains
    pub fn fetched_total(&self) -> usize {
        self.fetched_total
    }

    pub fn domain(&self, key: &DomainKey) -> Option<&DomainState> {
        self.domains.get(key)
    }

    pub fn is_visited(&self, url: &Url) -> bool {
        self.visited.contains(url.as_str())
    }

    /// Whether any domain still has queued URLs
    pub fn has_work(&self) -> bool {
        self.domains.values().any(|d| !d.queue.is_empty())
    }

    /// Whether the global page cap has been reached
    pub fn cap_reached(&self) -> bool {
        self.limits.pages_bounded() && self.fetched_total >= self.limits.max_pages
    }

    /// Whether another round should run
    pub fn should_continue(&self) -> bool {
        self.has_work() && !self.cap_reached()
    }

    /// Takes this domain's turn in the current round
    ///
    /// Popping a URL marks it visited, whether or not it ends up fetched.
    pub fn take_candidate(&mut self, key: &DomainKey) -> Candidate {
        let cap_reached = self.cap_reached();
        let Some(state) = self.domains.get_mut(key) else {
            return Candidate::Idle;
        };

        if state.queue.is_empty() {
            return Candidate::Idle;
        }
        if cap_reached {
            return Candidate::CapReached;
        }
        if self.phase == Phase::Fair && !state.within_fair_share() {
            return Candidate::Deferred;
        }

        let Some(url) = state.queue.pop_front() else {
            return Candidate::Idle;
        };
        if !self.visited.insert(url.to_string()) {
            return Candidate::Skipped(SkipReason::AlreadyVisited);
        }
        if state.has_reached_limit(self.limits.per_domain_limit) {
            return Candidate::Skipped(SkipReason::DomainLimit);
        }

        Candidate::Ready(url)
    }

    /// Records a successful fetch for `key`
    pub fn record_fetch(&mut self, key: &DomainKey) {
        if let Some(state) = self.domains.get_mut(key) {
            state.record_fetch();
            self.fetched_total += 1;
        }
    }

    /// Appends a discovered URL to `key`'s queue unless it was already visited
    ///
    /// Returns whether the URL was queued.
    pub fn enqueue(&mut self, key: &DomainKey, url: Url) -> bool {
        if self.visited.contains(url.as_str()) {
            return false;
        }
        match self.domains.get_mut(key) {
            Some(state) => {
                state.queue.push_back(url);
                true
            }
            None => false,
        }
    }

    /// Closes a round, switching to the fill phase when fair shares are settled
    pub fn end_round(&mut self) {
        if self.phase != Phase::Fair || !self.limits.pages_bounded() {
            return;
        }
        let owed = self.domains.values().any(DomainState::wants_fair_share);
        if !owed {
            tracing::debug!(
                "Fair-share budgets settled after {} pages, filling remaining capacity",
                self.fetched_total
            );
            self.phase = Phase::Fill;
        }
    }
}
