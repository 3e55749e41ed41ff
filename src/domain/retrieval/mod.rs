//! Retrieval contract: documentation context for a routed question

use std::fmt::Debug;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::embedding::EmbeddingError;
use crate::domain::routing::Domain;
use crate::domain::vector_index::{IndexError, RetrievalResult};
use crate::domain::DomainError;

/// Errors raised by the retrieval pipeline
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RetrievalError {
    #[error("No content available for domain '{domain}': all {attempted} fetches failed")]
    NoContentAvailable { domain: Domain, attempted: usize },

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error("Re-ranking failed: {0}")]
    Rerank(#[from] DomainError),
}

/// Produces ranked documentation chunks for a question
#[async_trait]
pub trait ContextRetriever: Send + Sync + Debug {
    async fn retrieve(&self, domain: Domain, question: &str) -> Result<RetrievalResult, RetrievalError>;
}
