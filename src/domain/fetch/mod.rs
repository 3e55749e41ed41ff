//! Content acquisition domain: fetched documents and the fetcher contract

mod document;
mod fetcher;

pub use document::Document;
pub use fetcher::{ContentFetcher, FetchError, FetchOutcome, DEFAULT_FETCH_TIMEOUT_MS};

#[cfg(test)]
pub use fetcher::mock::MockContentFetcher;
