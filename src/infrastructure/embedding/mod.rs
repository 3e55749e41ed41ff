//! Embedding provider implementations

mod openai;

pub use openai::{model_dimension, OpenAiEmbeddingProvider};
