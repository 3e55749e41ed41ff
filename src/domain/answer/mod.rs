//! Grounded answer generation contract

use std::fmt::Debug;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::agent::AgentError;
use crate::domain::routing::RoutingDecision;
use crate::domain::vector_index::RetrievalResult;

/// Errors raised while generating an answer
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AnswerError {
    #[error("No agent can answer for routing decision '{0}'")]
    UnroutableDomain(String),

    #[error(transparent)]
    Agent(#[from] AgentError),
}

/// Answers a question with the agent bound to the routed domain
#[async_trait]
pub trait AnswerGenerator: Send + Sync + Debug {
    async fn generate(
        &self,
        decision: RoutingDecision,
        question: &str,
        retrieved: &RetrievalResult,
    ) -> Result<String, AnswerError>;
}
