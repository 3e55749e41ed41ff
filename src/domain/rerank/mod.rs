//! Re-ranking contract

use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::vector_index::RetrievalResult;
use crate::domain::DomainError;

/// Reorders or filters retrieval results; output is a subset of the input
#[async_trait]
pub trait Reranker: Send + Sync + Debug {
    async fn rerank(&self, query: &str, results: RetrievalResult) -> Result<RetrievalResult, DomainError>;

    /// Get the re-ranker name
    fn reranker_name(&self) -> &'static str;
}
