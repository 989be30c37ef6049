use std::collections::VecDeque;
use url::Url;

/// Tracks one domain's progress during a crawl
///
/// Each domain owns a FIFO queue of URLs still to try, a count of pages
/// actually fetched, and (when the global page cap is bounded) a fair-share
/// budget with its own usage counter. Only successful fetches move the
/// counters.
#[derive(Debug, Clone, Default)]
pub struct DomainState {
    /// URLs waiting to be tried, oldest first
    pub queue: VecDeque<Url>,

    /// Pages fetched from this domain so far
    pub fetched: usize,

    /// Pages counted against the fair-share budget
    pub fair_used: usize,

    /// Fair-share allowance (`None` when the page cap is unlimited)
    pub budget: Option<usize>,
}

impl DomainState {
    /// Creates a state seeded with a single URL
    pub fn with_seed(seed: Url) -> Self {
        let mut state = Self::default();
        state.queue.push_back(seed);
        state
    }

    /// Whether this domain may still take a URL under its fair share
    pub fn within_fair_share(&self) -> bool {
        match self.budget {
            Some(budget) => self.fair_used < budget,
            None => true,
        }
    }

    /// Whether the fair-share pass still owes this domain a page
    ///
    /// True while the domain is under budget and has something left to try.
    pub fn wants_fair_share(&self) -> bool {
        self.within_fair_share() && !self.queue.is_empty()
    }

    /// Whether the per-domain page limit has been reached (`0` = unlimited)
    pub fn has_reached_limit(&self, per_domain_limit: usize) -> bool {
        per_domain_limit > 0 && self.fetched >= per_domain_limit
    }

    /// Records a successful fetch
    ///
    /// Both counters move in either phase; once the crawl leaves the
    /// fair-share phase the budget is no longer consulted.
    pub fn record_fetch(&mut self) {
        self.fetched += 1;
        self.fair_used += 1;
    }
}
