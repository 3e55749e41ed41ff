//! Re-ranking implementations

mod llm;
mod threshold;

pub use llm::{LlmReranker, DEFAULT_LLM_RERANK_THRESHOLD};
pub use threshold::ThresholdReranker;
