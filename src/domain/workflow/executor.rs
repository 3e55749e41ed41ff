//! Step contract, executor trait and run outcome types

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::context::WorkflowContext;
use super::entity::Workflow;
use super::error::{StepError, WorkflowError};
use crate::domain::artifact::ArtifactStore;

/// Services shared by every step of a run
#[derive(Debug, Clone)]
pub struct StepServices {
    pub artifacts: Arc<dyn ArtifactStore>,
}

impl StepServices {
    pub fn new(artifacts: Arc<dyn ArtifactStore>) -> Self {
        Self { artifacts }
    }
}

/// Everything a step receives when it runs
#[derive(Debug, Clone, Copy)]
pub struct StepInput<'a> {
    pub step_id: &'a str,
    /// Ids the step declared in `depends_on`; only these are readable
    pub depends_on: &'a [&'static str],
    pub trigger: &'a Value,
    pub context: &'a WorkflowContext,
    pub services: &'a StepServices,
}

impl<'a> StepInput<'a> {
    /// Result of a declared dependency
    pub fn dependency(&self, id: &str) -> Result<&'a Value, StepError> {
        if !self.depends_on.contains(&id) {
            return Err(StepError::missing_dependency(self.step_id, id));
        }
        self.context.get_step_result(self.step_id, id)
    }

    /// Declared dependency decoded into its result type
    pub fn dependency_as<T: DeserializeOwned>(&self, id: &str) -> Result<T, StepError> {
        serde_json::from_value(self.dependency(id)?.clone())
            .map_err(|e| StepError::invalid_data(format!("result of '{}': {}", id, e)))
    }

    /// String field of the trigger data
    pub fn trigger_str(&self, field: &str) -> Result<&'a str, StepError> {
        self.trigger
            .get(field)
            .and_then(Value::as_str)
            .ok_or_else(|| StepError::missing_input(format!("trigger field '{}'", field)))
    }
}

/// Encode a typed step result for the workflow context
pub fn step_output<T: Serialize>(result: &T) -> Result<Value, StepError> {
    serde_json::to_value(result).map_err(|e| StepError::invalid_data(e.to_string()))
}

/// A unit of work inside a workflow
#[async_trait]
pub trait Step: Send + Sync + Debug {
    /// Unique id within the workflow
    fn id(&self) -> &str;

    /// Ids of steps whose results this step reads
    fn depends_on(&self) -> &[&'static str] {
        &[]
    }

    async fn execute(&self, input: StepInput<'_>) -> Result<Value, StepError>;
}

/// Execution record of a single step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub step_id: String,
    pub execution_time_ms: u64,
}

impl StepRecord {
    pub fn new(step_id: impl Into<String>, execution_time_ms: u64) -> Self {
        Self {
            step_id: step_id.into(),
            execution_time_ms,
        }
    }
}

/// Result of a completed workflow run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowOutcome {
    pub run_id: Uuid,
    pub workflow_id: String,

    /// Id of the terminal step
    pub step_id: String,

    /// Result recorded by the terminal step
    pub result: Value,

    pub steps: Vec<StepRecord>,
    pub execution_time_ms: u64,
}

/// Trait for workflow execution
#[async_trait]
pub trait WorkflowExecutor: Send + Sync + Debug {
    /// Run a workflow with the given trigger data
    async fn run(&self, workflow: &Workflow, trigger: Value)
        -> Result<WorkflowOutcome, WorkflowError>;
}
