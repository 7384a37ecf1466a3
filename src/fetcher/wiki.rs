// src/fetcher/wiki.rs
// =============================================================================
// This module fetches an article's outbound links from the MediaWiki
// Action API.
//
// The request:
//   GET https://<lang>.wikipedia.org/w/api.php
//       ?action=query&format=json&titles=<Title>
//       &prop=links&pllimit=max&plnamespace=0
//
// Why these parameters?
// - prop=links: the links ON the page (outbound), which is all the API
//   offers - there is no cheap inbound view
// - plnamespace=0: only real articles, no Talk:/File:/Category: pages
// - pllimit=max: as many links per response as the API allows; longer
//   pages continue via the 'plcontinue' token
//
// Rust concepts:
// - serde derive: Declarative JSON decoding of the API response
// - Loops with continuation tokens: Paging through a remote result set
// =============================================================================

use crate::article::ArticleId;
use crate::fetcher::{FetchError, LinkFetcher};
use anyhow::Result;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

// Identify ourselves to the API, as its etiquette guide asks
const USER_AGENT: &str = "wiki-degrees/0.1 (six-degrees link search; educational)";

// Fetches outbound links for articles on one Wikipedia language edition
pub struct WikiFetcher {
    client: Client,
    api_url: String,
    // Stop collecting links for an article once we have this many.
    // Hub pages can cite thousands of articles; past a point, more neighbors
    // only burn rate-limit budget without shortening paths much.
    max_links: usize,
}

impl WikiFetcher {
    // Creates a fetcher for the given language edition (e.g. "en", "ru")
    pub fn new(lang: &str, max_links: usize) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            api_url: format!("https://{}.wikipedia.org/w/api.php", lang),
            max_links,
        })
    }

    // Issues one API request, optionally resuming from a continuation token
    async fn query_page(
        &self,
        title: &str,
        continue_from: Option<&str>,
    ) -> Result<ApiResponse, FetchError> {
        let mut params = vec![
            ("action", "query"),
            ("format", "json"),
            ("titles", title),
            ("prop", "links"),
            ("pllimit", "max"),
            ("plnamespace", "0"),
        ];
        if let Some(token) = continue_from {
            params.push(("plcontinue", token));
        }

        let response = self
            .client
            .get(&self.api_url)
            .query(&params)
            .send()
            .await
            .map_err(categorize_transport_error)?;

        match response.status() {
            status if status.is_success() => {
                response
                    .json::<ApiResponse>()
                    .await
                    .map_err(|e| FetchError::Network(format!("bad API response: {}", e)))
            }
            StatusCode::TOO_MANY_REQUESTS => Err(FetchError::RateLimited),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(FetchError::Fatal(format!(
                "API rejected us with HTTP {}",
                response.status().as_u16()
            ))),
            status => Err(FetchError::Network(format!(
                "HTTP {}",
                status.as_u16()
            ))),
        }
    }
}

#[async_trait]
impl LinkFetcher for WikiFetcher {
    // Fetches up to max_links outbound links, following continuation tokens
    async fn fetch_links(&self, article: &ArticleId) -> Result<Vec<ArticleId>, FetchError> {
        let mut links = Vec::new();
        let mut continue_from: Option<String> = None;

        loop {
            let response = self
                .query_page(article.title(), continue_from.as_deref())
                .await?;

            let next = extract_links(response, self.max_links, &mut links)?;

            match next {
                Some(token) if links.len() < self.max_links => continue_from = Some(token),
                _ => break,
            }
        }

        Ok(links)
    }
}

// Sorts a reqwest transport failure into our error taxonomy
fn categorize_transport_error(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Network("request timed out".to_string())
    } else if error.is_connect() {
        FetchError::Network("connection failed".to_string())
    } else {
        FetchError::Network(error.to_string())
    }
}

// --- API response shape ------------------------------------------------------
// Only the fields we read; serde ignores the rest.
//
// A response looks like:
//   { "continue": { "plcontinue": "736|0|Next_batch" },
//     "query": { "pages": {
//       "736": { "title": "Albert Einstein",
//                "links": [ { "title": "Physics" }, ... ] } } } }
//
// A missing article comes back with a negative page id and a "missing" key.

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(rename = "continue")]
    continuation: Option<Continuation>,
    query: Option<QueryBlock>,
}

#[derive(Debug, Deserialize)]
struct Continuation {
    plcontinue: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QueryBlock {
    pages: HashMap<String, PageEntry>,
}

#[derive(Debug, Deserialize)]
struct PageEntry {
    // Present (as an empty string) when the article does not exist
    missing: Option<String>,
    links: Option<Vec<PageLink>>,
}

#[derive(Debug, Deserialize)]
struct PageLink {
    title: String,
}

// Pulls link titles out of one API response into `links` (capped), returning
// the continuation token if the page has more
fn extract_links(
    response: ApiResponse,
    max_links: usize,
    links: &mut Vec<ArticleId>,
) -> Result<Option<String>, FetchError> {
    let pages = response
        .query
        .map(|q| q.pages)
        .ok_or_else(|| FetchError::Network("API response missing query block".to_string()))?;

    // We query one title, so there is exactly one page entry
    let page = pages
        .into_values()
        .next()
        .ok_or_else(|| FetchError::Network("API response has no pages".to_string()))?;

    if page.missing.is_some() {
        return Err(FetchError::NotFound);
    }

    // No 'links' key just means the article cites nothing (valid)
    for link in page.links.unwrap_or_default() {
        if links.len() >= max_links {
            break;
        }
        links.push(ArticleId::from_title(&link.title));
    }

    Ok(response.continuation.and_then(|c| c.plcontinue))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response_from(json: &str) -> ApiResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_extract_links_from_normal_response() {
        let response = response_from(
            r#"{ "query": { "pages": { "736": {
                "pageid": 736, "ns": 0, "title": "Albert Einstein",
                "links": [ { "ns": 0, "title": "Physics" },
                           { "ns": 0, "title": "Nobel Prize" } ] } } } }"#,
        );

        let mut links = Vec::new();
        let next = extract_links(response, 100, &mut links).unwrap();

        assert_eq!(
            links,
            vec![
                ArticleId::from_title("Physics"),
                ArticleId::from_title("Nobel Prize")
            ]
        );
        assert!(next.is_none());
    }

    #[test]
    fn test_extract_links_respects_cap() {
        let response = response_from(
            r#"{ "query": { "pages": { "1": {
                "title": "Hub",
                "links": [ { "title": "A" }, { "title": "B" }, { "title": "C" } ] } } } }"#,
        );

        let mut links = Vec::new();
        extract_links(response, 2, &mut links).unwrap();
        assert_eq!(links.len(), 2);
    }

    #[test]
    fn test_missing_article_is_not_found() {
        let response = response_from(
            r#"{ "query": { "pages": { "-1": {
                "ns": 0, "title": "No Such Page", "missing": "" } } } }"#,
        );

        let mut links = Vec::new();
        let result = extract_links(response, 100, &mut links);
        assert!(matches!(result, Err(FetchError::NotFound)));
    }

    #[test]
    fn test_article_with_no_links_is_empty_not_error() {
        let response = response_from(
            r#"{ "query": { "pages": { "42": { "title": "Dead End" } } } }"#,
        );

        let mut links = Vec::new();
        let next = extract_links(response, 100, &mut links).unwrap();
        assert!(links.is_empty());
        assert!(next.is_none());
    }

    #[test]
    fn test_continuation_token_is_surfaced() {
        let response = response_from(
            r#"{ "continue": { "plcontinue": "736|0|Next", "continue": "||" },
                "query": { "pages": { "736": {
                    "title": "Albert Einstein",
                    "links": [ { "title": "Physics" } ] } } } }"#,
        );

        let mut links = Vec::new();
        let next = extract_links(response, 100, &mut links).unwrap();
        assert_eq!(next.as_deref(), Some("736|0|Next"));
    }
}
