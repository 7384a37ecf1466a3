// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// clap is a popular Rust library for parsing command-line arguments.
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// This tool takes its three core inputs positionally - two article URLs and
// a rate limit - because that is the natural "compare these two things"
// shape; the tuning knobs are optional flags.
//
// Rust concepts:
// - Structs: Custom data types that group related data
// - Derive macros: Automatically generate code for our types
// =============================================================================

use clap::Parser;

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to automatically generate parsing code
// The #[command(...)] attributes configure how the CLI behaves
#[derive(Parser, Debug)]
#[command(
    name = "wiki-degrees",
    version = "0.1.0",
    about = "Find the shortest chain of links between two Wikipedia articles",
    long_about = "wiki-degrees runs a bidirectional breadth-first search over live Wikipedia \
                  link data to find how two articles are connected, staying under a request \
                  rate you choose. A classic \"six degrees of separation\" test for the \
                  encyclopedia."
)]
pub struct Cli {
    /// URL of the first article (e.g. https://en.wikipedia.org/wiki/Six_degrees_of_separation)
    ///
    /// This is a positional argument (required, no flag needed)
    pub url1: String,

    /// URL of the second article (e.g. https://en.wikipedia.org/wiki/Kevin_Bacon)
    pub url2: String,

    /// Maximum API requests per minute
    ///
    /// Every link fetch counts against this budget, retries included.
    /// Wikipedia asks automated clients to stay modest; 50-100 is polite.
    pub rate_limit: usize,

    /// Maximum search rounds before giving up
    ///
    /// Each round expands one link layer from BOTH ends, so the default of
    /// 6 already covers very long chains. Raising it gets expensive fast.
    #[arg(long, default_value_t = 6)]
    pub max_depth: usize,

    /// Output the result in JSON format instead of text
    ///
    /// This is an optional flag: --json
    #[arg(long)]
    pub json: bool,
}
