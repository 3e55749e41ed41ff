//! Infrastructure layer - External service implementations

pub mod answer;
pub mod artifact;
pub mod embedding;
pub mod fetch;
pub mod image;
pub mod ingestion;
pub mod llm;
pub mod logging;
pub mod rerank;
pub mod retrieval;
pub mod routing;
pub mod vector_index;
pub mod workflow;
