//! Domain layer - Core pipeline entities and contracts

pub mod agent;
pub mod answer;
pub mod artifact;
pub mod embedding;
pub mod error;
pub mod fetch;
pub mod image;
pub mod ingestion;
pub mod llm;
pub mod rerank;
pub mod retrieval;
pub mod routing;
pub mod vector_index;
pub mod workflow;

pub use agent::{Agent, AgentError};
pub use answer::{AnswerError, AnswerGenerator};
pub use artifact::{ArtifactRef, ArtifactStore};
pub use embedding::{EmbeddingError, EmbeddingProvider, EmbeddingService};
pub use error::DomainError;
pub use fetch::{ContentFetcher, Document, FetchError};
pub use image::{GeneratedImage, ImageGenerator};
pub use ingestion::{Chunk, DocumentChunker, StructuralMarker};
pub use llm::{LlmProvider, LlmRequest, LlmResponse, Message, MessageRole};
pub use rerank::Reranker;
pub use retrieval::{ContextRetriever, RetrievalError};
pub use routing::{AgentRouter, Domain, RoutingDecision, RoutingError};
pub use vector_index::{
    ChunkReference, IndexEntry, IndexError, RetrievalResult, ScoredChunk, SimilarityMetric,
    VectorIndex,
};
pub use workflow::{
    Step, StepError, StepInput, StepServices, Workflow, WorkflowContext, WorkflowError,
    WorkflowExecutor, WorkflowId, WorkflowOutcome,
};
