//! Workflow execution context
//!
//! Holds the validated trigger data and the results recorded by steps that
//! have already run. Results are append-only: a step id can be recorded once.

use std::collections::HashMap;

use serde_json::Value;

use super::error::{StepError, WorkflowError};

/// Per-run context shared between steps
#[derive(Debug, Clone)]
pub struct WorkflowContext {
    /// Trigger data the run was started with
    trigger: Value,

    /// Recorded step results, keyed by step id
    step_results: HashMap<String, Value>,

    /// Step ids in the order their results were recorded
    order: Vec<String>,
}

impl WorkflowContext {
    /// Create a new context with the given trigger data
    pub fn new(trigger: Value) -> Self {
        Self {
            trigger,
            step_results: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Get the trigger data
    pub fn trigger(&self) -> &Value {
        &self.trigger
    }

    /// Record the result of a step; a second record for the same id is refused
    pub fn record(&mut self, step_id: impl Into<String>, result: Value) -> Result<(), WorkflowError> {
        let step_id = step_id.into();

        if self.step_results.contains_key(&step_id) {
            return Err(WorkflowError::duplicate_step_id(step_id));
        }

        self.order.push(step_id.clone());
        self.step_results.insert(step_id, result);
        Ok(())
    }

    /// Get the result of a step that already ran
    pub fn get_step_result(&self, requester: &str, dependency: &str) -> Result<&Value, StepError> {
        self.step_results
            .get(dependency)
            .ok_or_else(|| StepError::missing_dependency(requester, dependency))
    }

    /// Step ids in execution order
    pub fn completed_steps(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Result of the most recently recorded step
    pub fn last_result(&self) -> Option<(&str, &Value)> {
        let id = self.order.last()?;
        self.step_results.get(id).map(|v| (id.as_str(), v))
    }
}
