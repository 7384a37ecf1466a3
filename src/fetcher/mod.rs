// src/fetcher/mod.rs
// =============================================================================
// This module is the seam between the search and the network.
//
// Submodules:
// - wiki: Talks to the MediaWiki Action API to get an article's links
// - retry: Wraps any fetcher with rate limiting and a bounded retry budget
//
// The search only ever sees the LinkFetcher trait, so tests can swap in a
// synthetic in-memory graph and never touch the network.
//
// Rust concepts:
// - Traits: Rust's interfaces; the search is generic over any LinkFetcher
// - async-trait: Allows async methods in traits
// - Enums with data: FetchError carries details per failure kind
// =============================================================================

mod retry;
mod wiki;

// Re-export the public fetcher API
pub use retry::RetryingFetcher;
pub use wiki::WikiFetcher;

use crate::article::ArticleId;
use async_trait::async_trait;
use std::fmt;

// How a link fetch can fail
//
// The distinction matters to the search: transient kinds are retried and
// then degraded to "no links", while Fatal aborts the whole search.
#[derive(Debug, Clone)]
pub enum FetchError {
    /// The article does not exist (not retried - it won't appear)
    NotFound,
    /// The remote API rejected us for sending too fast (retried with backoff;
    /// distinct from our own RateLimiter, which prevents this proactively)
    RateLimited,
    /// Transient transport or server failure (retried)
    Network(String),
    /// Authentication failure or permanently unreachable remote (aborts)
    Fatal(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::NotFound => write!(f, "article not found"),
            FetchError::RateLimited => write!(f, "remote rate limit hit"),
            FetchError::Network(msg) => write!(f, "network error: {}", msg),
            FetchError::Fatal(msg) => write!(f, "fatal remote error: {}", msg),
        }
    }
}

impl std::error::Error for FetchError {}

impl FetchError {
    /// True for failures worth another attempt
    pub fn is_retryable(&self) -> bool {
        matches!(self, FetchError::RateLimited | FetchError::Network(_))
    }
}

// The one capability the search needs from the outside world
//
// Contract: returns the article's outbound links in the order the source
// reports them (the search relies on that order for determinism). An empty
// Vec is a valid answer meaning "this article links to nothing".
#[async_trait]
pub trait LinkFetcher: Send + Sync {
    async fn fetch_links(&self, article: &ArticleId) -> Result<Vec<ArticleId>, FetchError>;
}

// A reference to a fetcher is itself a fetcher, so callers can lend one to
// the search without giving up ownership (tests rely on this to inspect
// their fake fetcher after the search finishes)
#[async_trait]
impl<'a, F: LinkFetcher> LinkFetcher for &'a F {
    async fn fetch_links(&self, article: &ArticleId) -> Result<Vec<ArticleId>, FetchError> {
        (**self).fetch_links(article).await
    }
}
