use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use super::Document;

/// Per-request timeout used when none is configured
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 10_000;

/// Why a single URL could not be fetched
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FetchError {
    #[error("HTTP status {0}")]
    Status(u16),

    #[error("Request timed out")]
    Timeout,

    #[error("Network error: {0}")]
    Network(String),
}

/// Outcome for one requested URL
pub type FetchOutcome = (String, Result<Document, FetchError>);

/// Fetches a set of URLs; one URL failing never aborts the others
#[async_trait]
pub trait ContentFetcher: Send + Sync + Debug {
    /// Fetch all URLs; the output has one entry per input URL, in input order
    async fn fetch(&self, urls: &[String], timeout: Duration) -> Vec<FetchOutcome>;
}
