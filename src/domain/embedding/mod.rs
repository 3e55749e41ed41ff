//! Embedding provider domain models, traits and the embedding service

mod error;
mod provider;
mod service;
mod types;

pub use error::EmbeddingError;
pub use provider::EmbeddingProvider;
pub use service::{EmbeddingService, DEFAULT_EMBEDDING_DIMENSION, DEFAULT_EMBEDDING_MODEL};
pub use types::{Embedding, EmbeddingRequest, EmbeddingResponse, EmbeddingUsage};

#[cfg(test)]
pub use provider::mock::MockEmbeddingProvider;
