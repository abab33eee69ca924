// src/crawl/tracker.rs
// =============================================================================
// Knows how many crawl branches are still running, so the top-level call can
// wait for the whole tree of spawned work to finish.
//
// register() hands out a BranchGuard. The guard decrements the count when it
// is dropped, which happens however the branch ends: normal return, early
// return, panic, or the task being aborted.
//
// A parent registers its children before its own guard drops, so the count
// can only reach zero once no branch is left that could spawn more.
// =============================================================================

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

#[derive(Debug, Default)]
struct TrackerInner {
    pending: AtomicUsize,
    drained: Notify,
}

#[derive(Debug, Clone, Default)]
pub struct CompletionTracker {
    inner: Arc<TrackerInner>,
}

impl CompletionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    // Call before the branch's task is spawned, then move the guard into it
    pub fn register(&self) -> BranchGuard {
        self.inner.pending.fetch_add(1, Ordering::SeqCst);
        BranchGuard {
            inner: self.inner.clone(),
        }
    }

    pub fn pending(&self) -> usize {
        self.inner.pending.load(Ordering::SeqCst)
    }

    // Resolves once no registered branch is left
    pub async fn drain(&self) {
        loop {
            let notified = self.inner.drained.notified();
            tokio::pin!(notified);
            // Register interest before checking, so a wake-up between the
            // check and the await isn't lost
            notified.as_mut().enable();

            if self.pending() == 0 {
                return;
            }
            notified.await;
        }
    }
}

#[derive(Debug)]
pub struct BranchGuard {
    inner: Arc<TrackerInner>,
}

impl Drop for BranchGuard {
    fn drop(&mut self) {
        if self.inner.pending.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.inner.drained.notify_waiters();
        }
    }
}
