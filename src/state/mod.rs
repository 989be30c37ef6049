//! State module for tracking crawl progress
//!
//! Holds the per-domain bookkeeping the scheduler uses for fair-share
//! round-robin crawling: queues, fetch counters and budgets. All of it is
//! invocation-scoped and dropped when the crawl returns.

mod domain_state;

pub use domain_state::DomainState;
