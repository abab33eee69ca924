// src/crawl/fetch.rs
// =============================================================================
// Downloads pages for the crawler.
//
// The crawler only talks to the Fetcher trait, so tests can swap the network
// for an in-memory site. HttpFetcher is the real implementation on top of
// reqwest.
//
// A fetch succeeds only for a 2xx response whose Content-Type is HTML.
// Everything else becomes a FetchError, which the crawler logs and moves on.
//
// Aborting: the limiter drops the fetch future when the crawl is cancelled.
// Dropping a reqwest future closes the request, so no extra plumbing is
// needed here.
// =============================================================================

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use thiserror::Error;
use url::Url;

use crate::config::CrawlConfig;

/// Why a page could not be fetched
#[derive(Debug, Error)]
pub enum FetchError {
    /// Request timed out
    #[error("request timed out")]
    Timeout,
    /// Could not connect (DNS failure, refused, unreachable)
    #[error("connection failed: {0}")]
    Connect(String),
    /// Any other transport-level failure
    #[error("request failed: {0}")]
    Request(String),
    /// Server answered with a non-2xx status
    #[error("HTTP {0}")]
    Status(u16),
    /// Response was not an HTML page
    #[error("not an HTML page (content-type: {0})")]
    NotHtml(String),
    /// The crawl was cancelled before the fetch finished
    #[error("cancelled")]
    Cancelled,
}

#[async_trait]
pub trait Fetcher: Send + Sync {
    // Returns the body of an HTML page
    async fn fetch(&self, url: &Url) -> Result<String, FetchError>;
}

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &CrawlConfig) -> anyhow::Result<Self> {
        // One client for the whole crawl (connection pooling)
        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(Duration::from_secs(5))
            .user_agent(config.user_agent.as_str())
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(categorize_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        check_content_type(&content_type)?;

        response.text().await.map_err(categorize_error)
    }
}

fn check_content_type(content_type: &str) -> Result<(), FetchError> {
    if content_type.to_ascii_lowercase().contains("text/html") {
        Ok(())
    } else if content_type.is_empty() {
        Err(FetchError::NotHtml("missing".to_string()))
    } else {
        Err(FetchError::NotHtml(content_type.to_string()))
    }
}

// Sorts a reqwest error into one of our buckets
fn categorize_error(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout
    } else if error.is_connect() {
        FetchError::Connect(error.to_string())
    } else {
        FetchError::Request(error.to_string())
    }
}
