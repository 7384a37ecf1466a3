// src/limiter.rs
// =============================================================================
// This module throttles our outgoing API calls.
//
// How it works:
// - We are allowed at most N requests in any rolling window (default: 60s)
// - We remember the timestamps of the last N accepted requests
// - When the window is full, the next caller sleeps until the oldest
//   timestamp falls out of the window: sleep = window - (now - oldest)
//
// Why a rolling window instead of "reset the counter every minute"?
// - A fixed counter allows 2N requests back to back across the reset
//   boundary; a rolling window never allows more than N in ANY interval
//   of the window length
//
// Rust concepts:
// - VecDeque: Queue of timestamps, oldest at the front
// - tokio::sync::Mutex: Async-aware lock so acquire() is safe to call from
//   several tasks at once (we hold it across a sleep, which a std Mutex
//   would not allow)
// - Instant: Monotonic clock, immune to wall-clock jumps
// =============================================================================

use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

// Throttles callers to `max_requests` per rolling `window`
//
// acquire() never fails and never drops a request - it only delays.
pub struct RateLimiter {
    max_requests: usize,
    window: Duration,
    // Timestamps of the most recent accepted requests, oldest first.
    // Bounded: never holds more than max_requests entries.
    accepted: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    // Creates a limiter allowing `per_minute` requests per 60 second window
    pub fn per_minute(per_minute: usize) -> Self {
        Self::new(per_minute, Duration::from_secs(60))
    }

    // Creates a limiter with an explicit window (used by tests)
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            // A limit of 0 would block forever; clamp to 1 instead
            max_requests: max_requests.max(1),
            window,
            accepted: Mutex::new(VecDeque::new()),
        }
    }

    // Blocks until one more request fits under the limit, then records it
    //
    // The lock is held across the sleep on purpose: that serializes
    // concurrent acquirers, so each one re-checks the window only after the
    // previous one has claimed its slot. Without this, N waiters could all
    // wake at once and burst past the limit.
    pub async fn acquire(&self) {
        let mut accepted = self.accepted.lock().await;

        // Drop timestamps that have aged out of the window
        let now = Instant::now();
        while let Some(oldest) = accepted.front() {
            if now.duration_since(*oldest) >= self.window {
                accepted.pop_front();
            } else {
                break;
            }
        }

        // Window full: sleep until the oldest entry expires
        if accepted.len() >= self.max_requests {
            let oldest = *accepted
                .front()
                .expect("window is full, so it has a front entry");
            let wait = self.window - now.duration_since(oldest);
            tokio::time::sleep(wait).await;
            accepted.pop_front();
        }

        accepted.push_back(Instant::now());
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why tokio::sync::Mutex and not std::sync::Mutex?
//    - We sleep while holding the lock
//    - A std MutexGuard is not Send and would block the whole thread
//    - The tokio Mutex yields to other tasks while locked/waiting
//
// 2. What is duration_since?
//    - Elapsed time between two Instants
//    - Instant is monotonic: it never goes backwards, unlike SystemTime
// -----------------------------------------------------------------------------
