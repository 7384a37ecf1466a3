// src/search/path.rs
// =============================================================================
// This module turns the search's breadcrumbs back into an article chain.
//
// When the two frontiers meet at article M, we have:
// - the forward map: every article -> the article that revealed it,
//   chaining back to start
// - the backward map: the same, chaining back to end
//
// Walking M's forward breadcrumbs gives [M, ..., start]; reversed, that is
// the first half. Walking M's backward breadcrumbs gives [.., end] - already
// pointing the right way - and concatenating yields
// start -> ... -> M -> ... -> end with M appearing exactly once.
//
// Rust concepts:
// - Pure functions: no I/O, no state - just maps in, Vec out
// - Option chaining: .cloned().flatten() unwraps map-lookup-of-Option
// =============================================================================

use crate::article::ArticleId;
use crate::search::VisitMap;

// Rebuilds the full chain through the meeting point
//
// Each visit record is consulted at most once per direction, so the result
// cannot repeat an article within either half; the meeting point joins the
// halves without duplication.
pub fn reconstruct_path(
    forward: &VisitMap,
    backward: &VisitMap,
    meeting: &ArticleId,
) -> Vec<ArticleId> {
    // Meeting point back to start, then flipped to start-first
    let mut path = Vec::new();
    let mut current = Some(meeting.clone());
    while let Some(article) = current {
        current = forward.get(&article).cloned().flatten();
        path.push(article);
    }
    path.reverse();

    // Meeting point onward to end (skip the meeting point itself - it is
    // already the last element of the forward half)
    let mut current = backward.get(meeting).cloned().flatten();
    while let Some(article) = current {
        current = backward.get(&article).cloned().flatten();
        path.push(article);
    }

    path
}
