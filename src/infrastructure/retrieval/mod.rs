//! Retrieval-augmented context assembly

mod orchestrator;
mod sources;

pub use orchestrator::{chunk_key, RetrievalOrchestrator, DEFAULT_TOP_K};
pub use sources::DomainSources;
