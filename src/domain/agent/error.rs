use thiserror::Error;

use crate::domain::DomainError;

/// Errors raised at the agent boundary
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AgentError {
    #[error("Agent '{agent}' returned output violating its schema: {message}")]
    SchemaViolation { agent: String, message: String },

    #[error(transparent)]
    Provider(#[from] DomainError),
}

impl AgentError {
    pub fn schema_violation(agent: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SchemaViolation {
            agent: agent.into(),
            message: message.into(),
        }
    }
}
