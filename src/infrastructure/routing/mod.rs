//! Question routing

mod llm_router;

pub use llm_router::LlmAgentRouter;
