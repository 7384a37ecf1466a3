// src/article.rs
// =============================================================================
// This module defines ArticleId - the normalized identifier for a Wikipedia
// article - and the URL parsing that produces one.
//
// Why normalize?
// - The same article can be written many ways in a URL:
//   "Six_degrees_of_separation", "Six%20degrees%20of%20separation", ...
// - The MediaWiki API returns link titles with plain spaces
// - For the search to recognize "already visited", all of these must compare
//   equal, so we store one canonical form: percent-decoded, spaces not
//   underscores
//
// Rust concepts:
// - Newtype structs: Wrapping a String to give it meaning and invariants
// - Trait derives: Eq + Hash let ArticleId be a HashMap key
// - Display: Custom formatting for user-facing output
// =============================================================================

use anyhow::{anyhow, Result};
use serde::Serialize;
use std::fmt;
use url::Url;

// A normalized Wikipedia article identifier
//
// Equality and hashing go through the normalized title, so two ArticleIds
// built from different spellings of the same URL compare equal.
//
// The inner String is private: the only ways to build an ArticleId are
// from_title() and parse_article_url(), both of which normalize.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ArticleId(String);

impl ArticleId {
    // Builds an ArticleId from a raw title (the form the MediaWiki API uses)
    //
    // Underscores are the URL spelling of spaces in article titles, so they
    // are folded to spaces here too.
    pub fn from_title(title: &str) -> Self {
        ArticleId(title.trim().replace('_', " "))
    }

    /// The normalized, human-readable title
    pub fn title(&self) -> &str {
        &self.0
    }

    // Renders this article back into a canonical URL for output
    //
    // Spaces go back to underscores and the path segment is percent-encoded
    // by the url crate, so titles like "AT&T" round-trip safely.
    pub fn to_url(&self, lang: &str) -> String {
        let mut url = Url::parse(&format!("https://{}.wikipedia.org", lang))
            .expect("wikipedia base URL is always valid");
        url.path_segments_mut()
            .expect("https URLs always have path segments")
            .pop_if_empty()
            .push("wiki")
            .push(&self.0.replace(' ', "_"));
        url.to_string()
    }
}

// Display lets us print an ArticleId directly with {} in format strings
impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Parses a full Wikipedia article URL into its ArticleId and language code
//
// Supported format: https://<lang>.wikipedia.org/wiki/<Title>
//
// Returns: (article, language) tuple, e.g.
//   "https://en.wikipedia.org/wiki/Six_degrees_of_separation"
//     -> (ArticleId("Six degrees of separation"), "en")
//
// Errors if the URL is malformed, is not a wikipedia.org host, or has no
// /wiki/ path - this is the "invalid input" case the CLI reports immediately.
pub fn parse_article_url(input: &str) -> Result<(ArticleId, String)> {
    let url = Url::parse(input).map_err(|e| anyhow!("Invalid URL '{}': {}", input, e))?;

    let host = url
        .host_str()
        .ok_or_else(|| anyhow!("URL has no host: {}", input))?;

    // The language is the first host label: en.wikipedia.org -> "en"
    let lang = match host.strip_suffix(".wikipedia.org") {
        Some(lang) if !lang.is_empty() && lang.chars().all(|c| c.is_ascii_alphabetic()) => {
            lang.to_string()
        }
        _ => return Err(anyhow!("Not a Wikipedia article URL: {}", input)),
    };

    // The title is everything after /wiki/ in the raw path
    let raw_title = url
        .path()
        .strip_prefix("/wiki/")
        .filter(|t| !t.is_empty())
        .ok_or_else(|| anyhow!("URL has no /wiki/<article> path: {}", input))?;

    Ok((ArticleId::from_title(&percent_decode(raw_title)), lang))
}

// Decodes %XX escapes in a URL path segment
//
// The url crate keeps paths in encoded form, so we decode by hand here.
// Invalid escapes (a '%' not followed by two hex digits) are kept literally
// rather than rejected - the API lookup will report a missing article if the
// title really is garbage.
fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' {
            // Need two hex digits after the '%'
            if let (Some(hi), Some(lo)) = (
                bytes.get(i + 1).and_then(|b| (*b as char).to_digit(16)),
                bytes.get(i + 2).and_then(|b| (*b as char).to_digit(16)),
            ) {
                out.push((hi * 16 + lo) as u8);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }

    // Titles are UTF-8; replace invalid sequences instead of failing
    String::from_utf8_lossy(&out).into_owned()
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is a newtype?
//    - A struct with exactly one field, like ArticleId(String)
//    - The compiler treats it as a distinct type from String
//    - Prevents mixing up "any string" with "a normalized article title"
//
// 2. Why derive Hash and Eq?
//    - The search keeps HashMaps keyed by ArticleId (visited bookkeeping)
//    - HashMap keys must implement Hash + Eq
//    - Deriving uses the inner String's implementations
//
// 3. What does #[serde(transparent)] do?
//    - Serializes the newtype as its inner value
//    - So --json output shows "Kevin Bacon", not {"0": "Kevin Bacon"}
// -----------------------------------------------------------------------------
