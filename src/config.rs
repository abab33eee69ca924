// src/config.rs
// =============================================================================
// Crawl settings shared by the CLI and the crawler.
//
// Limits:
// - max_concurrency: how many page fetches may be in flight at once
// - max_pages: the page budget; every claimed URL counts, even if its fetch
//   fails afterwards
// =============================================================================

use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_MAX_CONCURRENCY: usize = 10;
pub const DEFAULT_MAX_PAGES: usize = 100;
pub const DEFAULT_REPORT_FILE: &str = "report.csv";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Max concurrency must be greater than 0, got {0}")]
    InvalidMaxConcurrency(usize),

    #[error("Max pages must be greater than 0, got {0}")]
    InvalidMaxPages(usize),
}

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub max_concurrency: usize,
    pub max_pages: usize,
    /// Per-request timeout handed to the HTTP client
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            max_pages: DEFAULT_MAX_PAGES,
            request_timeout: Duration::from_secs(10),
            user_agent: format!("site-harvest/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl CrawlConfig {
    pub fn new(max_concurrency: usize, max_pages: usize) -> Self {
        Self {
            max_concurrency,
            max_pages,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_concurrency == 0 {
            return Err(ConfigError::InvalidMaxConcurrency(self.max_concurrency));
        }
        if self.max_pages == 0 {
            return Err(ConfigError::InvalidMaxPages(self.max_pages));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CrawlConfig::default();
        assert_eq!(config.max_concurrency, 10);
        assert_eq!(config.max_pages, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_limits_rejected() {
        assert_eq!(
            CrawlConfig::new(0, 5).validate(),
            Err(ConfigError::InvalidMaxConcurrency(0))
        );
        assert_eq!(
            CrawlConfig::new(5, 0).validate(),
            Err(ConfigError::InvalidMaxPages(0))
        );
    }
}
