//! HTTP content fetcher: concurrent GETs with a per-request timeout

use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use reqwest::Client;
use tracing::{debug, instrument, warn};

use crate::domain::fetch::{ContentFetcher, Document, FetchError, FetchOutcome};
use crate::domain::DomainError;

/// Desktop Chrome user agent; some documentation sites reject unknown clients
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Fetches URLs with reqwest; no retries
#[derive(Debug, Clone)]
pub struct HttpContentFetcher {
    client: Client,
}

impl HttpContentFetcher {
    pub fn new() -> Result<Self, DomainError> {
        let client = Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| DomainError::configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    async fn fetch_one(&self, url: &str, timeout: Duration) -> Result<Document, FetchError> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let content = response.text().await.map_err(classify)?;

        Ok(Document::new(url, content).with_status(status.as_u16()))
    }
}

fn classify(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout
    } else if let Some(status) = error.status() {
        FetchError::Status(status.as_u16())
    } else {
        FetchError::Network(error.to_string())
    }
}

#[async_trait]
impl ContentFetcher for HttpContentFetcher {
    #[instrument(skip_all, fields(urls = urls.len(), timeout_ms = timeout.as_millis() as u64))]
    async fn fetch(&self, urls: &[String], timeout: Duration) -> Vec<FetchOutcome> {
        let fetches = urls.iter().map(|url| async move {
            let result = self.fetch_one(url, timeout).await;

            match &result {
                Ok(document) => debug!(%url, bytes = document.content.len(), "Fetched"),
                Err(error) => warn!(%url, %error, "Fetch failed"),
            }

            (url.clone(), result)
        });

        join_all(fetches).await
    }
}
