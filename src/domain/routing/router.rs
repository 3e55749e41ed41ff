use std::fmt::Debug;

use async_trait::async_trait;
use thiserror::Error;

use super::RoutingDecision;
use crate::domain::agent::AgentError;

/// Errors raised while routing a question
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RoutingError {
    #[error("Missing input: {0}")]
    MissingInput(String),

    #[error(transparent)]
    Agent(#[from] AgentError),
}

/// Classifies a question into a documentation domain
#[async_trait]
pub trait AgentRouter: Send + Sync + Debug {
    /// Empty questions fail with `MissingInput` before any model call
    async fn route(&self, question: &str) -> Result<RoutingDecision, RoutingError>;
}
