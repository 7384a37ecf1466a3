// src/search/mod.rs
// =============================================================================
// This module contains the path-finding core.
//
// Submodules:
// - frontier: Bidirectional breadth-first search over the live link graph
// - path: Rebuilds the article chain once the two searches meet
//
// The link graph is never materialized. The only graph-shaped state is one
// "visited" map per direction: article -> which article we discovered it
// from. That map is both the dedup set and, afterwards, the breadcrumb trail
// the path is rebuilt from.
//
// Rust concepts:
// - Type aliases: VisitMap names a HashMap with a specific meaning
// - Arc<AtomicBool>: A cheap flag shared between the search and a
//   Ctrl-C handler
// =============================================================================

mod frontier;
mod path;

// Re-export the public search API
pub use frontier::{FrontierSearch, SearchConfig};
pub use path::reconstruct_path;

use crate::article::ArticleId;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

// Which half of the bidirectional search a record belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

// Per-direction visit bookkeeping: article -> the article it was first
// discovered from (None for the search's own endpoint).
//
// First discovery wins: entries are inserted once and never overwritten,
// which is what makes the recorded trail a SHORTEST trail.
pub type VisitMap = HashMap<ArticleId, Option<ArticleId>>;

// How a finished search turned out
//
// PathNotFound and Cancelled are expected outcomes, not errors - only a
// fatal remote failure surfaces as an Err (the "search aborted" case).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The connecting chain, start first, end last
    Found(Vec<ArticleId>),
    /// Both frontiers exhausted, or the depth cap was reached
    NotFound,
    /// The user interrupted the search
    Cancelled,
}

// A cancellation flag the search both polls and awaits
//
// Polling (is_cancelled) stops new fetches from being issued; awaiting
// (cancelled) lets in-flight waits - a parked rate-limiter slot, a retry
// backoff, a slow response - be raced against the flag and abandoned the
// moment it flips, instead of drained to completion.
//
// Cloning is cheap (it is an Arc); main hands one clone to the Ctrl-C
// handler and one to the search.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<CancelInner>);

#[derive(Debug, Default)]
struct CancelInner {
    cancelled: AtomicBool,
    notify: Notify,
}

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.cancelled.store(true, Ordering::SeqCst);
        self.0.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.cancelled.load(Ordering::SeqCst)
    }

    // Resolves once cancel() has been called (immediately if it already was)
    //
    // The Notified future is created BEFORE the flag check: tokio
    // guarantees it observes any notify_waiters() from that point on, so a
    // cancel() racing between the check and the await cannot be missed.
    pub async fn cancelled(&self) {
        let notified = self.0.notify.notified();
        if self.is_cancelled() {
            return;
        }
        notified.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_cancelled_resolves_immediately_when_already_set() {
        let flag = CancelFlag::new();
        flag.cancel();
        // Must not hang
        flag.cancelled().await;
        assert!(flag.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancelled_wakes_a_parked_waiter() {
        let flag = CancelFlag::new();
        let canceller = flag.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            canceller.cancel();
        });

        tokio::time::timeout(Duration::from_secs(2), flag.cancelled())
            .await
            .expect("waiter was never woken");
    }
}
