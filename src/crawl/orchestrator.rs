// src/crawl/orchestrator.rs
// =============================================================================
// The recursive crawl.
//
// How it works:
// 1. crawl_site seeds one visit() for the starting URL
// 2. visit() checks the URL is on our host, normalizes it and claims it in
//    the ledger (the only dedup + budget gate)
// 3. The page is fetched through the limiter, which races the fetch against
//    the cancellation token
// 4. On success the page is extracted, recorded, and one child visit() is
//    spawned per outgoing link
// 5. A visit() finishes when its direct children have finished; the top
//    level waits on the CompletionTracker for the whole tree
//
// Errors stay inside the branch that hit them. A failed fetch still used up
// its claim (the budget counts attempts, not successes).
// =============================================================================

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use futures::future::{join_all, BoxFuture};
use futures::FutureExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

use super::fetch::{FetchError, Fetcher, HttpFetcher};
use super::ledger::{Claim, Ledger};
use super::limiter::FetchLimiter;
use super::normalize::normalize_url;
use super::tracker::CompletionTracker;
use crate::config::CrawlConfig;
use crate::extract::{extract_page_data, PageRecord};

/// What a finished crawl hands back
#[derive(Debug, Default)]
pub struct CrawlOutcome {
    /// normalized key -> page, only for pages fetched successfully
    pub pages: HashMap<String, PageRecord>,
    /// How many keys were claimed (successful or not)
    pub claimed: usize,
    /// Claimed pages whose fetch was cut short by the budget cancellation
    pub aborted: usize,
    /// True if the crawl stopped because the page budget ran out
    pub budget_reached: bool,
}

impl CrawlOutcome {
    // Claims that ended without a record for a reason other than the budget
    // cancellation (bad status, not HTML, network error)
    pub fn failed(&self) -> usize {
        self.claimed
            .saturating_sub(self.pages.len())
            .saturating_sub(self.aborted)
    }
}

// State shared by every branch of one crawl
struct Crawler {
    base_host: String,
    fetcher: Arc<dyn Fetcher>,
    limiter: FetchLimiter,
    ledger: Ledger,
    tracker: CompletionTracker,
    cancel: CancellationToken,
    aborted: AtomicUsize,
}

/// Crawls a website over HTTP
///
/// Fails only if the seed URL is unusable or the configuration is invalid;
/// per-page problems are logged and skipped.
pub async fn crawl_site(base_url: &str, config: &CrawlConfig) -> Result<CrawlOutcome> {
    let fetcher = HttpFetcher::new(config).context("Failed to create HTTP client")?;
    crawl_with(base_url, config, Arc::new(fetcher)).await
}

/// Same as crawl_site, with the page source supplied by the caller
pub async fn crawl_with(
    base_url: &str,
    config: &CrawlConfig,
    fetcher: Arc<dyn Fetcher>,
) -> Result<CrawlOutcome> {
    config.validate()?;

    let base = Url::parse(base_url).map_err(|e| anyhow!("Invalid URL '{}': {}", base_url, e))?;
    let base_host = base
        .host_str()
        .ok_or_else(|| anyhow!("URL has no host: {}", base_url))?
        .to_string();

    let ledger = Ledger::new(config.max_pages);
    let cancel = ledger.cancellation();
    let crawler = Arc::new(Crawler {
        base_host,
        fetcher,
        limiter: FetchLimiter::new(config.max_concurrency),
        ledger,
        tracker: CompletionTracker::new(),
        cancel,
        aborted: AtomicUsize::new(0),
    });

    info!(
        url = base_url,
        max_concurrency = config.max_concurrency,
        max_pages = config.max_pages,
        "Starting crawl"
    );

    let guard = crawler.tracker.register();
    let seed = crawler.clone();
    let seed_url = base.to_string();
    let root = tokio::spawn(async move {
        let _guard = guard;
        seed.visit(seed_url).await;
    });

    crawler.tracker.drain().await;
    if let Err(e) = root.await {
        warn!(error = %e, "Crawl root task ended abnormally");
    }

    let outcome = CrawlOutcome {
        pages: crawler.ledger.take_pages(),
        claimed: crawler.ledger.claimed_count(),
        aborted: crawler.aborted.load(Ordering::SeqCst),
        budget_reached: crawler.ledger.is_cancelled(),
    };
    info!(
        pages = outcome.pages.len(),
        claimed = outcome.claimed,
        "Crawl finished"
    );
    Ok(outcome)
}

impl Crawler {
    // One step of the crawl for a single URL
    //
    // Boxed because it spawns copies of itself.
    fn visit(self: Arc<Self>, url: String) -> BoxFuture<'static, ()> {
        async move {
            let parsed = match Url::parse(&url) {
                Ok(parsed) => parsed,
                Err(e) => {
                    debug!(url = %url, error = %e, "Skipping unparseable URL");
                    return;
                }
            };

            if parsed.host_str() != Some(self.base_host.as_str()) {
                debug!(url = %url, "Skipping off-site URL");
                return;
            }

            let key = normalize_url(&url);
            if key.is_empty() {
                return;
            }

            let claim = match self.ledger.claim(&key) {
                Some(claim) => claim,
                None => {
                    debug!(key = %key, "Already claimed or crawl stopped");
                    return;
                }
            };

            info!(url = %url, "Crawling");

            // The claim that used up the budget already tripped the signal;
            // its own fetch still goes ahead, everyone else's is aborted
            let cancel = match claim {
                Claim::Open => self.cancel.clone(),
                Claim::Final => CancellationToken::new(),
            };
            let fetched = self
                .limiter
                .run(&cancel, || self.fetcher.fetch(&parsed))
                .await;

            let html = match fetched {
                Ok(html) => html,
                Err(FetchError::Cancelled) => {
                    self.aborted.fetch_add(1, Ordering::SeqCst);
                    debug!(url = %url, "Fetch cancelled");
                    return;
                }
                Err(e) => {
                    warn!(url = %url, error = %e, "Failed to fetch page");
                    return;
                }
            };

            let page = extract_page_data(&html, &parsed);
            let links: Vec<String> = page.outgoing_links.iter().cloned().collect();
            self.ledger.record(&key, page);

            if self.cancel.is_cancelled() {
                return;
            }

            // Register each child before spawning it; its guard travels
            // with the task and deregisters however the task ends
            let children: Vec<_> = links
                .into_iter()
                .map(|link| {
                    let guard = self.tracker.register();
                    let crawler = self.clone();
                    tokio::spawn(async move {
                        let _guard = guard;
                        crawler.visit(link).await;
                    })
                })
                .collect();

            for result in join_all(children).await {
                if let Err(e) = result {
                    warn!(parent = %url, error = %e, "Crawl branch ended abnormally");
                }
            }
        }
        .boxed()
    }
}
