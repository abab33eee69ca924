// src/crawl/limiter.rs
// =============================================================================
// Caps how many fetches run at the same time across the whole crawl.
//
// A tokio Semaphore hands out permits in FIFO order, so requests are admitted
// in the order they queued. Every wait is raced against the crawl's
// CancellationToken: once the token fires, queued requests give up and
// running ones are dropped (which aborts the HTTP request underneath).
//
// The limiter never times anything out by itself.
// =============================================================================

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

use super::fetch::FetchError;

#[derive(Debug, Clone)]
pub struct FetchLimiter {
    permits: Arc<Semaphore>,
}

impl FetchLimiter {
    pub fn new(max_concurrency: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(max_concurrency.max(1))),
        }
    }

    // Runs `operation` once a permit is free, unless `cancel` fires first
    //
    // The operation is only constructed after admission, so a request that
    // was cancelled while queued never starts at all.
    pub async fn run<F, Fut, T>(&self, cancel: &CancellationToken, operation: F) -> Result<T, FetchError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        let _permit = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(FetchError::Cancelled),
            permit = self.permits.acquire() => {
                // The semaphore is never closed while the crawl is alive
                permit.map_err(|_| FetchError::Cancelled)?
            }
        };

        if cancel.is_cancelled() {
            return Err(FetchError::Cancelled);
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(FetchError::Cancelled),
            result = operation() => result,
        }
    }
}
