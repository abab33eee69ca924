// src/crawl/ledger.rs
// =============================================================================
// Shared record of what this crawl has claimed and what it has collected.
//
// - claimed: every normalized key a branch has reserved (fetch admitted,
//   whether or not it later succeeded)
// - pages: the PageRecord for each claimed key whose fetch succeeded
// - cancel: the crawl's stop signal, tripped when the page budget is reached
//
// One mutex guards claimed + pages. claim() is the only gate that decides
// whether a URL gets fetched, so check-and-insert must happen under one lock.
// =============================================================================

use std::collections::{HashMap, HashSet};

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::extract::PageRecord;

/// A successful claim
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Claim {
    /// Budget left after this one
    Open,
    /// This claim used up the budget and tripped the cancellation signal
    Final,
}

#[derive(Debug, Default)]
struct LedgerState {
    claimed: HashSet<String>,
    pages: HashMap<String, PageRecord>,
}

#[derive(Debug)]
pub struct Ledger {
    state: Mutex<LedgerState>,
    max_pages: usize,
    cancel: CancellationToken,
}

impl Ledger {
    pub fn new(max_pages: usize) -> Self {
        Self {
            state: Mutex::new(LedgerState::default()),
            max_pages,
            cancel: CancellationToken::new(),
        }
    }

    // The crawl-wide cancellation signal
    //
    // Readers get their own clone; only the ledger ever calls cancel().
    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    // Reserves `key` for the calling branch
    //
    // Returns None without touching anything when the crawl is cancelled,
    // the key is empty or already claimed, or the budget is used up.
    // Otherwise says whether this was the claim that used up the budget:
    // the final claim still succeeds, and trips the signal as its last step
    // so nothing after it can claim.
    pub fn claim(&self, key: &str) -> Option<Claim> {
        if key.is_empty() || self.cancel.is_cancelled() {
            return None;
        }

        let mut state = self.state.lock();
        if self.cancel.is_cancelled()
            || state.claimed.len() >= self.max_pages
            || state.claimed.contains(key)
        {
            return None;
        }

        state.claimed.insert(key.to_string());
        if state.claimed.len() >= self.max_pages {
            info!(max_pages = self.max_pages, "Page budget reached, stopping crawl");
            self.cancel.cancel();
            return Some(Claim::Final);
        }
        Some(Claim::Open)
    }

    // Stores the finished page for a key this crawl has claimed
    //
    // Panics if the key was never claimed: that means two branches disagree
    // about who owns the page, and the results can't be trusted.
    pub fn record(&self, key: &str, page: PageRecord) {
        let mut state = self.state.lock();
        assert!(
            state.claimed.contains(key),
            "recorded page for unclaimed key '{}'",
            key
        );
        state.pages.insert(key.to_string(), page);
    }

    pub fn claimed_count(&self) -> usize {
        self.state.lock().claimed.len()
    }

    // Yes/no form of claim()
    #[cfg(test)]
    pub fn try_claim(&self, key: &str) -> bool {
        self.claim(key).is_some()
    }

    // Hands back everything collected, leaving the ledger empty of pages
    pub fn take_pages(&self) -> HashMap<String, PageRecord> {
        std::mem::take(&mut self.state.lock().pages)
    }
}
