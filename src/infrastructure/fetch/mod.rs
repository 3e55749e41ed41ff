//! Content fetcher implementations

mod http_fetcher;

pub use http_fetcher::{HttpContentFetcher, BROWSER_USER_AGENT};
