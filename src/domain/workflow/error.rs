//! Workflow error types

use thiserror::Error;

use crate::domain::agent::AgentError;
use crate::domain::answer::AnswerError;
use crate::domain::embedding::EmbeddingError;
use crate::domain::retrieval::RetrievalError;
use crate::domain::routing::RoutingError;
use crate::domain::vector_index::IndexError;
use crate::domain::DomainError;

/// Errors that abort a workflow definition or a workflow run
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Invalid trigger data: {0}")]
    InvalidTrigger(String),

    #[error("Duplicate step id: {0}")]
    DuplicateStepId(String),

    #[error("Step '{step}' depends on '{dependency}', which is not declared before it")]
    UnknownDependency { step: String, dependency: String },

    #[error("Workflow has no steps: {0}")]
    EmptyWorkflow(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Step execution failed in '{step}': {source}")]
    StepFailed {
        step: String,
        #[source]
        source: StepError,
    },
}

impl WorkflowError {
    pub fn invalid_trigger(message: impl Into<String>) -> Self {
        Self::InvalidTrigger(message.into())
    }

    pub fn duplicate_step_id(step: impl Into<String>) -> Self {
        Self::DuplicateStepId(step.into())
    }

    pub fn unknown_dependency(step: impl Into<String>, dependency: impl Into<String>) -> Self {
        Self::UnknownDependency {
            step: step.into(),
            dependency: dependency.into(),
        }
    }

    pub fn empty_workflow(id: impl Into<String>) -> Self {
        Self::EmptyWorkflow(id.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn step_failed(step: impl Into<String>, source: StepError) -> Self {
        Self::StepFailed {
            step: step.into(),
            source,
        }
    }

    /// Id of the step that failed, if the run got that far
    pub fn failed_step(&self) -> Option<&str> {
        match self {
            Self::StepFailed { step, .. } => Some(step),
            _ => None,
        }
    }
}

/// Errors raised by an individual step
#[derive(Debug, Error)]
pub enum StepError {
    #[error("Step '{step}' requires the result of '{dependency}', which is not available")]
    MissingDependency { step: String, dependency: String },

    #[error("Missing input: {0}")]
    MissingInput(String),

    #[error("Unexpected step data: {0}")]
    InvalidData(String),

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error(transparent)]
    Routing(#[from] RoutingError),

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    #[error(transparent)]
    Answer(#[from] AnswerError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl StepError {
    pub fn missing_dependency(step: impl Into<String>, dependency: impl Into<String>) -> Self {
        Self::MissingDependency {
            step: step.into(),
            dependency: dependency.into(),
        }
    }

    pub fn missing_input(message: impl Into<String>) -> Self {
        Self::MissingInput(message.into())
    }

    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData(message.into())
    }
}
