use thiserror::Error;

use crate::domain::DomainError;

/// Errors raised by the embedding service
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EmbeddingError {
    #[error("Input at index {index} is empty")]
    EmptyInput { index: usize },

    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Embedding count mismatch: sent {expected} inputs, got {actual} vectors")]
    CountMismatch { expected: usize, actual: usize },

    #[error(transparent)]
    Provider(#[from] DomainError),
}
