// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Features:
// - Recursive, concurrent crawling starting from a URL
// - Same-host restriction (doesn't crawl other sites, or subdomains)
// - A global cap on concurrent fetches
// - A page budget; reaching it cancels whatever is still in flight
//
// Pieces:
// - normalize: URL -> dedup key
// - limiter: concurrency cap that honours cancellation
// - ledger: claimed keys, collected pages, the cancellation signal
// - tracker: waits for every spawned branch to finish
// - fetch: the HTTP side
// - orchestrator: ties it all together
// =============================================================================

mod fetch;
mod ledger;
mod limiter;
mod normalize;
mod orchestrator;
mod tracker;

// Re-export the main crawling function
pub use orchestrator::{crawl_site, CrawlOutcome};
