// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Validate the two article URLs and build the fetching stack
//    (Wikipedia client -> retry wrapper -> shared rate limiter)
// 3. Run the bidirectional search, watching for Ctrl-C
// 4. Print the chain (or why there isn't one) and exit with proper code
//    (0 = path found, 1 = no path, 2 = error)
//
// Rust concepts used:
// - async/await: The search spends its life waiting on the network
// - Result<T, E>: For error handling (T = success type, E = error type)
// - match: Pattern matching over the search outcome
// =============================================================================

// Module declarations - tells Rust about our other source files
mod article; // src/article.rs - ArticleId and URL parsing
mod cli; // src/cli.rs - command-line parsing
mod fetcher; // src/fetcher/ - MediaWiki client, retry, rate-limit glue
mod limiter; // src/limiter.rs - rolling-window rate limiter
mod search; // src/search/ - bidirectional BFS core

use crate::article::{parse_article_url, ArticleId};
use crate::fetcher::{RetryingFetcher, WikiFetcher};
use crate::limiter::RateLimiter;
use crate::search::{CancelFlag, FrontierSearch, SearchConfig, SearchOutcome};
use clap::Parser; // Parser trait enables the parse() method
use serde::Serialize;
use std::sync::Arc;

// anyhow::Result is like std::result::Result but simpler for applications
// It lets us return any error type with the ? operator
use anyhow::Result;

// Most links kept per article when the API pages through a long list;
// hub articles cite thousands and we only need the well-connected front
const MAX_LINKS_PER_ARTICLE: usize = 100;

// Transient fetch failures get this many extra attempts before the article
// is treated as a dead end
const MAX_FETCH_RETRIES: u32 = 3;

// The #[tokio::main] attribute transforms our async main into a real main
// function. It creates a tokio runtime and runs our async code inside it.
#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // Invalid input or an aborted search lands here
            eprintln!("Error: {}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// This is the main application logic
// Returns:
//   Ok(0) = path found
//   Ok(1) = no path found (or search cancelled)
//   Err  = invalid input / search aborted by a fatal remote failure
async fn run() -> Result<i32> {
    let cli = cli::Cli::parse();

    // Both URLs must be well-formed Wikipedia article URLs; bad input is
    // reported immediately, before any network traffic
    let (start, start_lang) = parse_article_url(&cli.url1)?;
    let (end, end_lang) = parse_article_url(&cli.url2)?;

    // The link graph lives inside one language edition; the start article's
    // edition drives the search (matching titles across editions would need
    // a different API entirely)
    if start_lang != end_lang {
        eprintln!(
            "⚠️  Articles are on different editions ({} vs {}); searching {}.wikipedia.org",
            start_lang, end_lang, start_lang
        );
    }

    println!("🔍 Searching for a link chain");
    println!("   From: {}", start);
    println!("   To:   {}", end);
    println!(
        "   Rate limit: {}/min, depth cap: {} rounds",
        cli.rate_limit, cli.max_depth
    );
    println!();

    // The fetching stack: every request the search makes flows through the
    // retry wrapper, which takes a rate-limiter slot before each attempt
    let limiter = Arc::new(RateLimiter::per_minute(cli.rate_limit));
    let wiki = WikiFetcher::new(&start_lang, MAX_LINKS_PER_ARTICLE)?;
    let fetcher = RetryingFetcher::new(wiki, limiter, MAX_FETCH_RETRIES);

    // Ctrl-C flips the cancel flag; the search abandons in-flight
    // rate-limited waits and winds down instead of draining them
    let cancel = CancelFlag::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("\n🛑 Interrupt received, stopping the search...");
                cancel.cancel();
            }
        });
    }

    let config = SearchConfig {
        max_depth: cli.max_depth,
        ..SearchConfig::default()
    };

    let outcome = FrontierSearch::new(fetcher, config, cancel)
        .run(start, end)
        .await?;

    match outcome {
        SearchOutcome::Found(path) => {
            print_path(&path, &start_lang, cli.json)?;
            Ok(0)
        }
        SearchOutcome::NotFound => {
            println!(
                "❌ No path found within {} rounds - the articles may be connected more \
                 distantly, or not at all",
                cli.max_depth
            );
            Ok(1)
        }
        SearchOutcome::Cancelled => {
            println!("🛑 Search cancelled before a path was found");
            Ok(1)
        }
    }
}

// The --json output shape
#[derive(Serialize)]
struct PathReport<'a> {
    degrees: usize,
    articles: &'a [ArticleId],
    urls: Vec<String>,
}

// Prints the resolved chain either as text or JSON
//
// "Degrees" is the number of hops (links followed), which is one less than
// the number of articles in the chain.
fn print_path(path: &[ArticleId], lang: &str, json: bool) -> Result<()> {
    let urls: Vec<String> = path.iter().map(|a| a.to_url(lang)).collect();
    let degrees = path.len().saturating_sub(1);

    if json {
        let report = PathReport {
            degrees,
            articles: path,
            urls,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let chain: Vec<&str> = path.iter().map(|a| a.title()).collect();
        println!("✅ Connected in {} degree(s):", degrees);
        println!("   {}", chain.join(" => "));
        println!();
        for url in &urls {
            println!("   {}", url);
        }
    }

    Ok(())
}
