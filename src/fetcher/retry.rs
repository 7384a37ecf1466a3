// src/fetcher/retry.rs
// =============================================================================
// This module wraps any LinkFetcher with the two policies every outbound
// request must respect:
//
// 1. Rate limiting: acquire() on the shared RateLimiter before EVERY
//    attempt, including retries - a retry is still a request
// 2. Bounded retry: transient failures (network blips, remote 429s) get a
//    few more attempts with growing backoff; NotFound and Fatal never do
//
// Composing these as a decorator keeps the search loop free of ad hoc
// retry/sleep logic - the search just calls fetch_links and gets either
// links or a final, already-retried error.
//
// Rust concepts:
// - Generics: RetryingFetcher<F> works for any LinkFetcher (real or test)
// - Arc: The RateLimiter is shared with every task that fetches
// =============================================================================

use crate::article::ArticleId;
use crate::fetcher::{FetchError, LinkFetcher};
use crate::limiter::RateLimiter;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

// Default pause before the first retry; doubles per attempt after that
const RETRY_BACKOFF: Duration = Duration::from_secs(1);

// A LinkFetcher that rate-limits and retries another LinkFetcher
pub struct RetryingFetcher<F> {
    inner: F,
    limiter: Arc<RateLimiter>,
    max_retries: u32,
    backoff: Duration,
}

impl<F: LinkFetcher> RetryingFetcher<F> {
    pub fn new(inner: F, limiter: Arc<RateLimiter>, max_retries: u32) -> Self {
        Self::with_backoff(inner, limiter, max_retries, RETRY_BACKOFF)
    }

    // Same, with an explicit backoff base (tests use a tiny one)
    pub fn with_backoff(
        inner: F,
        limiter: Arc<RateLimiter>,
        max_retries: u32,
        backoff: Duration,
    ) -> Self {
        Self {
            inner,
            limiter,
            max_retries,
            backoff,
        }
    }
}

#[async_trait]
impl<F: LinkFetcher> LinkFetcher for RetryingFetcher<F> {
    async fn fetch_links(&self, article: &ArticleId) -> Result<Vec<ArticleId>, FetchError> {
        let mut attempt: u32 = 0;

        loop {
            // Every attempt counts against the rate budget
            self.limiter.acquire().await;

            match self.inner.fetch_links(article).await {
                Ok(links) => return Ok(links),
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    // Exponential backoff: base, 2x base, 4x base, ...
                    let pause = self.backoff * 2u32.saturating_pow(attempt - 1);
                    eprintln!(
                        "  Warning: fetch for '{}' failed ({}), retry {}/{} in {:.1}s",
                        article,
                        e,
                        attempt,
                        self.max_retries,
                        pause.as_secs_f32()
                    );
                    tokio::time::sleep(pause).await;
                }
                // NotFound, Fatal, or retry budget exhausted
                Err(e) => return Err(e),
            }
        }
    }
}
