// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Usage:
//   site-harvest <URL> [MAX_CONCURRENCY] [MAX_PAGES] [-o FILE] [-v]
//
// The two limits are taken as plain strings on purpose: a bad value is not
// fatal, we warn and fall back to the default instead of letting clap reject
// the whole command line.
// =============================================================================

use std::path::PathBuf;

use clap::Parser;
use tracing::warn;

use crate::config::{DEFAULT_MAX_CONCURRENCY, DEFAULT_MAX_PAGES, DEFAULT_REPORT_FILE};

#[derive(Parser, Debug)]
#[command(
    name = "site-harvest",
    version,
    about = "Crawl a website and write a CSV report of its pages",
    long_about = "site-harvest crawls every page it can reach on the seed URL's host and records \
                  each page's first heading, first paragraph, outgoing links and images in a CSV report."
)]
pub struct Cli {
    /// Website URL to start from (e.g., https://example.com)
    pub url: String,

    /// Maximum number of pages fetched at the same time (default: 10)
    pub max_concurrency: Option<String>,

    /// Maximum number of pages to crawl (default: 100)
    pub max_pages: Option<String>,

    /// Where to write the CSV report
    #[arg(short, long, default_value = DEFAULT_REPORT_FILE)]
    pub output: PathBuf,

    /// Show debug output (skipped and duplicate URLs)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn max_concurrency(&self) -> usize {
        resolve_limit(self.max_concurrency.as_deref(), DEFAULT_MAX_CONCURRENCY, "Max concurrency")
    }

    pub fn max_pages(&self) -> usize {
        resolve_limit(self.max_pages.as_deref(), DEFAULT_MAX_PAGES, "Max pages")
    }
}

// Parses a positive integer, falling back to `default` with a warning
pub fn resolve_limit(raw: Option<&str>, default: usize, name: &str) -> usize {
    let Some(raw) = raw else {
        return default;
    };

    match raw.trim().parse::<usize>() {
        Ok(value) if value > 0 => value,
        _ => {
            warn!(
                "{} must be a positive number. Invalid value: {}. Using default: {}",
                name, raw, default
            );
            default
        }
    }
}
