// src/search/frontier.rs
// =============================================================================
// This module implements the core algorithm: bidirectional breadth-first
// search over the Wikipedia link graph, one fetch at a time.
//
// How it works:
// 1. Start a frontier at each endpoint: {start} forward, {end} backward
// 2. Each round, expand one full BFS layer per direction: fetch every
//    frontier article's links, record never-seen neighbors with a
//    breadcrumb back to the article that revealed them
// 3. After each layer, check whether some article is now visited from BOTH
//    directions - that article is the meeting point, and stitching the two
//    breadcrumb trails together at it yields a shortest chain
// 4. Stop on meeting, on two empty frontiers, or at the depth cap
//
// Why bidirectional?
// - A one-sided BFS reaching depth d costs about b^d fetches (b = links
//   per article); two half-depth searches cost about 2*b^(d/2)
// - Against a rate-limited API, that difference is hours versus minutes
//
// Backward expansion, honestly stated: the MediaWiki links API only tells
// us what an article points AT, not what points at it. The backward half
// therefore expands outbound links of its own frontier and treats linkage
// as symmetric. Chains found across the meeting point are link-connected,
// but the backward half of the chain may traverse some links end-to-start.
//
// Rust concepts:
// - Generics: the search works against any LinkFetcher
// - futures::stream::buffered: a whole layer's fetches run concurrently,
//   results come back in submission order (determinism)
// =============================================================================

use crate::article::ArticleId;
use crate::fetcher::{FetchError, LinkFetcher};
use crate::search::{reconstruct_path, CancelFlag, Direction, SearchOutcome, VisitMap};
use anyhow::{anyhow, Result};
use futures::stream::{self, StreamExt};
use std::collections::{HashMap, VecDeque};

// How many fetches from one layer may be in flight at once.
// The rate limiter still bounds the request RATE; this only bounds how many
// tasks sit waiting on it.
const MAX_IN_FLIGHT: usize = 8;

// Tuning knobs for one search run
#[derive(Debug, Clone, Copy)]
pub struct SearchConfig {
    /// Maximum rounds (one forward + one backward layer each) before
    /// giving up - the "six degrees" cap
    pub max_depth: usize,
    /// Most frontier articles expanded per layer; the rest wait for the
    /// next round. Bounds the fetch bill on bushy graphs.
    pub max_frontier: usize,
    /// Most neighbors taken per expanded article
    pub max_links: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: 6,
            max_frontier: 50,
            max_links: 30,
        }
    }
}

// One bidirectional search run
//
// All state (frontiers, visit maps, link cache) is owned here, created by
// new() and discarded when run() returns - nothing outlives a search.
pub struct FrontierSearch<F> {
    fetcher: F,
    config: SearchConfig,
    cancel: CancelFlag,

    // Per-direction breadcrumbs: article -> discovered-from.
    // Insert-once; doubles as the visited set.
    visited_forward: VisitMap,
    visited_backward: VisitMap,

    // Articles awaiting expansion, FIFO so expansion is breadth-first
    frontier_forward: VecDeque<ArticleId>,
    frontier_backward: VecDeque<ArticleId>,

    // Per-run cache of fetched link sets, shared by both directions: an
    // article the forward half already fetched is free for the backward
    // half. Never persisted.
    link_cache: HashMap<ArticleId, Vec<ArticleId>>,
}

impl<F: LinkFetcher> FrontierSearch<F> {
    pub fn new(fetcher: F, config: SearchConfig, cancel: CancelFlag) -> Self {
        Self {
            fetcher,
            config,
            cancel,
            visited_forward: VisitMap::new(),
            visited_backward: VisitMap::new(),
            frontier_forward: VecDeque::new(),
            frontier_backward: VecDeque::new(),
            link_cache: HashMap::new(),
        }
    }

    // Runs the search to completion
    //
    // Ok(Found/NotFound/Cancelled) covers every expected ending; Err means
    // the search was aborted by a fatal remote failure.
    pub async fn run(mut self, start: ArticleId, end: ArticleId) -> Result<SearchOutcome> {
        // Same article on both ends: a single-node path, zero fetches
        if start == end {
            return Ok(SearchOutcome::Found(vec![start]));
        }

        self.visited_forward.insert(start.clone(), None);
        self.frontier_forward.push_back(start);
        self.visited_backward.insert(end.clone(), None);
        self.frontier_backward.push_back(end);

        for round in 1..=self.config.max_depth {
            if self.cancel.is_cancelled() {
                return Ok(SearchOutcome::Cancelled);
            }

            println!(
                "🔁 Round {}/{}: forward frontier {}, backward frontier {}",
                round,
                self.config.max_depth,
                self.frontier_forward.len(),
                self.frontier_backward.len()
            );

            // One full layer per direction; the meeting check happens only
            // at these boundaries, never mid-layer, so a meeting at depths
            // (df, db) really is minimal among everything explored
            if let Some(meeting) = self.expand_layer(Direction::Forward).await? {
                return Ok(self.found(&meeting));
            }
            if self.cancel.is_cancelled() {
                return Ok(SearchOutcome::Cancelled);
            }

            if let Some(meeting) = self.expand_layer(Direction::Backward).await? {
                return Ok(self.found(&meeting));
            }
            if self.cancel.is_cancelled() {
                return Ok(SearchOutcome::Cancelled);
            }

            // Nothing left to expand anywhere: the articles are not
            // connected within the reachable portion of the graph
            if self.frontier_forward.is_empty() && self.frontier_backward.is_empty() {
                println!("⛔ Both frontiers exhausted without meeting");
                return Ok(SearchOutcome::NotFound);
            }
        }

        println!("⛔ Depth cap reached without meeting");
        Ok(SearchOutcome::NotFound)
    }

    fn found(&self, meeting: &ArticleId) -> SearchOutcome {
        println!("🤝 Frontiers met at: {}", meeting);
        SearchOutcome::Found(reconstruct_path(
            &self.visited_forward,
            &self.visited_backward,
            meeting,
        ))
    }

    // Expands one BFS layer in one direction
    //
    // Returns Ok(Some(meeting point)) if this layer connected the two
    // searches, Ok(None) to keep going, Err only on a fatal fetch failure.
    async fn expand_layer(&mut self, direction: Direction) -> Result<Option<ArticleId>> {
        // Pull this layer off the frontier, up to the per-layer cap.
        // Anything left over is still at the same depth and goes first
        // next round.
        let layer: Vec<ArticleId> = {
            let frontier = match direction {
                Direction::Forward => &mut self.frontier_forward,
                Direction::Backward => &mut self.frontier_backward,
            };
            let take = frontier.len().min(self.config.max_frontier);
            frontier.drain(..take).collect()
        };

        if layer.is_empty() {
            return Ok(None);
        }

        let link_sets = self.resolve_links(&layer).await?;

        // Record neighbors in frontier order, then in the order the fetcher
        // reported them - first discovery wins, and ties are deterministic
        let max_links = self.config.max_links;
        let (frontier, visited, other_visited) = match direction {
            Direction::Forward => (
                &mut self.frontier_forward,
                &mut self.visited_forward,
                &self.visited_backward,
            ),
            Direction::Backward => (
                &mut self.frontier_backward,
                &mut self.visited_backward,
                &self.visited_forward,
            ),
        };

        let mut discovered = Vec::new();
        for article in &layer {
            let links = link_sets.get(article).cloned().unwrap_or_default();
            for neighbor in links.into_iter().take(max_links) {
                if visited.contains_key(&neighbor) {
                    continue;
                }
                visited.insert(neighbor.clone(), Some(article.clone()));
                frontier.push_back(neighbor.clone());
                discovered.push(neighbor);
            }
        }

        // Layer boundary: did anything we just discovered close the gap?
        // First hit in discovery order is the meeting point.
        for article in discovered {
            if other_visited.contains_key(&article) {
                return Ok(Some(article));
            }
        }

        Ok(None)
    }

    // Fetches link sets for a whole layer, concurrently, through the cache
    //
    // A per-article failure is logged and degraded to "no links" so the
    // rest of the layer still expands; only Fatal aborts.
    async fn resolve_links(
        &mut self,
        layer: &[ArticleId],
    ) -> Result<HashMap<ArticleId, Vec<ArticleId>>> {
        let mut link_sets = HashMap::new();
        let mut to_fetch = Vec::new();

        for article in layer {
            match self.link_cache.get(article) {
                Some(links) => {
                    link_sets.insert(article.clone(), links.clone());
                }
                None => to_fetch.push(article.clone()),
            }
        }

        if to_fetch.is_empty() {
            return Ok(link_sets);
        }

        // buffered (not buffer_unordered): results come back in submission
        // order, so reruns on the same graph discover in the same order
        let fetched: Vec<(ArticleId, Result<Vec<ArticleId>, FetchError>)> = {
            let fetcher = &self.fetcher;
            let cancel = self.cancel.clone();
            stream::iter(to_fetch.into_iter().map(move |article| {
                let cancel = cancel.clone();
                async move {
                    // A cancelled search stops issuing fetches mid-layer;
                    // the skipped article just contributes no neighbors
                    if cancel.is_cancelled() {
                        return (article, Ok(Vec::new()));
                    }
                    // Race the fetch against cancellation: a fetch parked
                    // in the rate limiter or a retry backoff is abandoned
                    // the moment the flag flips, not drained to completion
                    tokio::select! {
                        links = fetcher.fetch_links(&article) => (article, links),
                        _ = cancel.cancelled() => (article, Ok(Vec::new())),
                    }
                }
            }))
            .buffered(MAX_IN_FLIGHT)
            .collect()
            .await
        };

        for (article, result) in fetched {
            match result {
                Ok(links) => {
                    self.link_cache.insert(article.clone(), links.clone());
                    link_sets.insert(article, links);
                }
                Err(FetchError::Fatal(msg)) => {
                    return Err(anyhow!("search aborted: {}", msg));
                }
                Err(e) => {
                    // Degrade: this article expands to nothing, the layer
                    // carries on. Not cached, so the other direction may
                    // still try it fresh.
                    eprintln!("  Warning: giving up on '{}': {}", article, e);
                    link_sets.insert(article, Vec::new());
                }
            }
        }

        Ok(link_sets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn id(title: &str) -> ArticleId {
        ArticleId::from_title(title)
    }

    fn titles(path: &[ArticleId]) -> Vec<&str> {
        path.iter().map(|a| a.title()).collect()
    }

    // An in-memory link graph standing in for Wikipedia
    struct GraphFetcher {
        edges: HashMap<ArticleId, Vec<ArticleId>>,
        failures: HashMap<ArticleId, FetchError>,
        calls: AtomicUsize,
    }

    impl GraphFetcher {
        fn new(edges: &[(&str, &[&str])]) -> Self {
            Self {
                edges: edges
                    .iter()
                    .map(|(from, tos)| (id(from), tos.iter().map(|t| id(t)).collect()))
                    .collect(),
                failures: HashMap::new(),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing_on(mut self, article: &str, error: FetchError) -> Self {
            self.failures.insert(id(article), error);
            self
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LinkFetcher for GraphFetcher {
        async fn fetch_links(&self, article: &ArticleId) -> Result<Vec<ArticleId>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(error) = self.failures.get(article) {
                return Err(error.clone());
            }
            // Unknown articles simply have no outbound links
            Ok(self.edges.get(article).cloned().unwrap_or_default())
        }
    }

    fn search(fetcher: &GraphFetcher) -> FrontierSearch<&GraphFetcher> {
        FrontierSearch::new(fetcher, SearchConfig::default(), CancelFlag::new())
    }

    #[tokio::test]
    async fn test_start_equals_end_needs_zero_fetches() {
        let graph = GraphFetcher::new(&[("A", &["B"])]);
        let outcome = search(&graph).run(id("A"), id("A")).await.unwrap();

        assert_eq!(outcome, SearchOutcome::Found(vec![id("A")]));
        assert_eq!(graph.calls(), 0);
    }

    #[tokio::test]
    async fn test_direct_link_found_in_one_fetch() {
        let graph = GraphFetcher::new(&[("A", &["X", "B"])]);
        let outcome = search(&graph).run(id("A"), id("B")).await.unwrap();

        assert_eq!(outcome, SearchOutcome::Found(vec![id("A"), id("B")]));
        // Only the forward layer for A ran; the backward half never expanded
        assert_eq!(graph.calls(), 1);
    }

    #[tokio::test]
    async fn test_finds_shortest_of_two_routes() {
        // A->B->Z is two hops; A->C->D->Z is three
        let graph = GraphFetcher::new(&[
            ("A", &["C", "B"]),
            ("B", &["Z"]),
            ("C", &["D"]),
            ("D", &["Z"]),
        ]);
        let outcome = search(&graph).run(id("A"), id("Z")).await.unwrap();

        match outcome {
            SearchOutcome::Found(path) => assert_eq!(titles(&path), vec!["A", "B", "Z"]),
            other => panic!("expected a path, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_meeting_in_the_middle() {
        // Forward reaches C in two layers, backward reaches it in one:
        // A->B->C cited forward, D->C expanded backward (symmetric reading)
        let graph = GraphFetcher::new(&[("A", &["B"]), ("B", &["C"]), ("D", &["C"])]);
        let outcome = search(&graph).run(id("A"), id("D")).await.unwrap();

        match outcome {
            SearchOutcome::Found(path) => assert_eq!(titles(&path), vec!["A", "B", "C", "D"]),
            other => panic!("expected a path, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_path_has_no_duplicate_articles() {
        // Plenty of cycles and cross-links
        let graph = GraphFetcher::new(&[
            ("A", &["B", "C"]),
            ("B", &["A", "C", "D"]),
            ("C", &["A", "B", "D"]),
            ("D", &["B", "C", "E"]),
            ("E", &["D"]),
        ]);
        let outcome = search(&graph).run(id("A"), id("E")).await.unwrap();

        match outcome {
            SearchOutcome::Found(path) => {
                let unique: HashSet<_> = path.iter().collect();
                assert_eq!(unique.len(), path.len(), "path repeats an article");
                assert_eq!(path.first(), Some(&id("A")));
                assert_eq!(path.last(), Some(&id("E")));
            }
            other => panic!("expected a path, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_disconnected_graph_reports_not_found_and_terminates() {
        // A and B only reference each other; Z is an island
        let graph = GraphFetcher::new(&[("A", &["B"]), ("B", &["A"])]);
        let outcome = search(&graph).run(id("A"), id("Z")).await.unwrap();

        assert_eq!(outcome, SearchOutcome::NotFound);
        // Every article fetched at most once per direction: A, B forward
        // plus Z backward, with the shared cache absorbing repeats
        assert!(graph.calls() <= 6, "fetched {} times", graph.calls());
    }

    #[tokio::test]
    async fn test_depth_cap_bounds_the_search() {
        // A straight chain far longer than a 1-round cap can cover
        let graph = GraphFetcher::new(&[
            ("A", &["B"]),
            ("B", &["C"]),
            ("C", &["D"]),
            ("D", &["E"]),
            ("E", &["F"]),
            ("F", &["G"]),
            ("G", &["H"]),
        ]);
        let config = SearchConfig {
            max_depth: 1,
            ..SearchConfig::default()
        };
        let outcome = FrontierSearch::new(&graph, config, CancelFlag::new())
            .run(id("A"), id("H"))
            .await
            .unwrap();

        assert_eq!(outcome, SearchOutcome::NotFound);
        // One round = one forward layer (A) + one backward layer (H)
        assert_eq!(graph.calls(), 2);
    }

    #[tokio::test]
    async fn test_one_failing_article_does_not_abort_the_layer() {
        // B's fetch always fails; the route through C still works
        let graph = GraphFetcher::new(&[("A", &["B", "C"]), ("C", &["Z"])])
            .failing_on("B", FetchError::Network("boom".to_string()));
        let outcome = search(&graph).run(id("A"), id("Z")).await.unwrap();

        match outcome {
            SearchOutcome::Found(path) => assert_eq!(titles(&path), vec!["A", "C", "Z"]),
            other => panic!("expected a path, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fatal_failure_aborts_the_search() {
        let graph = GraphFetcher::new(&[("A", &["B"]), ("B", &["Z"])])
            .failing_on("A", FetchError::Fatal("forbidden".to_string()));
        let result = search(&graph).run(id("A"), id("Z")).await;

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("search aborted"));
    }

    #[tokio::test]
    async fn test_cancel_interrupts_a_rate_limited_wait() {
        use crate::fetcher::RetryingFetcher;
        use crate::limiter::RateLimiter;
        use std::sync::Arc;
        use std::time::{Duration, Instant};

        // One request per 5 seconds: the round's second fetch parks inside
        // the limiter. Cancelling must yank it out of that wait, not sit
        // through the remaining window.
        let graph = GraphFetcher::new(&[("A", &["B"]), ("B", &["Z"])]);
        let limiter = Arc::new(RateLimiter::new(1, Duration::from_secs(5)));
        let fetcher = RetryingFetcher::new(&graph, limiter, 0);

        let cancel = CancelFlag::new();
        let canceller = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            canceller.cancel();
        });

        let started = Instant::now();
        let outcome = FrontierSearch::new(fetcher, SearchConfig::default(), cancel)
            .run(id("A"), id("Z"))
            .await
            .unwrap();

        assert_eq!(outcome, SearchOutcome::Cancelled);
        assert!(
            started.elapsed() < Duration::from_secs(2),
            "cancellation drained a rate-limited wait: took {:?}",
            started.elapsed()
        );
    }

    #[tokio::test]
    async fn test_cancelled_before_any_fetch() {
        let graph = GraphFetcher::new(&[("A", &["B"]), ("B", &["Z"])]);
        let cancel = CancelFlag::new();
        cancel.cancel();

        let outcome = FrontierSearch::new(&graph, SearchConfig::default(), cancel)
            .run(id("A"), id("Z"))
            .await
            .unwrap();

        assert_eq!(outcome, SearchOutcome::Cancelled);
        assert_eq!(graph.calls(), 0);
    }

    #[tokio::test]
    async fn test_link_cache_spares_repeat_fetches() {
        // Both directions will want C's links; only one fetch should happen
        let graph = GraphFetcher::new(&[("A", &["C"]), ("Z", &["C"]), ("C", &["A", "Z"])]);
        let outcome = search(&graph).run(id("A"), id("Z")).await.unwrap();

        assert!(matches!(outcome, SearchOutcome::Found(_)));
        let unique_articles_fetched = graph.calls();
        assert!(
            unique_articles_fetched <= 4,
            "expected the cache to dedupe, saw {} fetches",
            unique_articles_fetched
        );
    }
}
