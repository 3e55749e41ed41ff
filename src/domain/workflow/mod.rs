//! Workflow domain module
//!
//! A workflow is an ordered list of steps started with trigger data. Each step
//! declares the steps it depends on; the declared order must already be a
//! topological order, which is checked when the workflow is built. The
//! executor runs steps one at a time, records each result in the
//! [`WorkflowContext`] and stops at the first failure.

mod context;
mod entity;
mod error;
mod executor;

pub use context::WorkflowContext;
pub use entity::{
    validate_workflow_id, FieldType, TriggerField, TriggerSchema, Workflow, WorkflowId,
    MAX_ID_LENGTH,
};
pub use error::{StepError, WorkflowError};
pub use executor::{
    step_output, Step, StepInput, StepRecord, StepServices, WorkflowExecutor, WorkflowOutcome,
};

#[cfg(test)]
pub use executor::mock::StaticStep;
