//! Step-graph executor implementation

use std::time::Instant;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::workflow::{
    StepInput, StepRecord, StepServices, Workflow, WorkflowContext, WorkflowError,
    WorkflowExecutor, WorkflowOutcome,
};

/// Runs workflow steps sequentially in declared order, failing fast
#[derive(Debug, Clone)]
pub struct StepGraphExecutor {
    services: StepServices,
}

impl StepGraphExecutor {
    pub fn new(services: StepServices) -> Self {
        Self { services }
    }

    pub fn services(&self) -> &StepServices {
        &self.services
    }
}

#[async_trait]
impl WorkflowExecutor for StepGraphExecutor {
    async fn run(&self, workflow: &Workflow, trigger: Value) -> Result<WorkflowOutcome, WorkflowError> {
        let start = Instant::now();
        let run_id = Uuid::new_v4();

        workflow.trigger_schema().validate(&trigger)?;

        info!(
            run_id = %run_id,
            workflow = %workflow.id(),
            steps = workflow.step_count(),
            "Starting workflow run"
        );

        let mut context = WorkflowContext::new(trigger);
        let mut records = Vec::with_capacity(workflow.step_count());

        for step in workflow.steps() {
            let step_start = Instant::now();

            debug!(run_id = %run_id, step = step.id(), "Executing step");

            let outcome = {
                let input = StepInput {
                    step_id: step.id(),
                    depends_on: step.depends_on(),
                    trigger: context.trigger(),
                    context: &context,
                    services: &self.services,
                };
                step.execute(input).await
            };

            let elapsed_ms = step_start.elapsed().as_millis() as u64;

            let result = match outcome {
                Ok(result) => result,
                Err(e) => {
                    warn!(
                        run_id = %run_id,
                        step = step.id(),
                        elapsed_ms,
                        error = %e,
                        "Step failed, aborting workflow"
                    );
                    return Err(WorkflowError::step_failed(step.id(), e));
                }
            };

            context.record(step.id(), result)?;
            records.push(StepRecord::new(step.id(), elapsed_ms));

            debug!(run_id = %run_id, step = step.id(), elapsed_ms, "Step completed");
        }

        let (step_id, result) = context
            .last_result()
            .map(|(id, value)| (id.to_string(), value.clone()))
            .ok_or_else(|| WorkflowError::empty_workflow(workflow.id().as_str()))?;

        let execution_time_ms = start.elapsed().as_millis() as u64;

        info!(
            run_id = %run_id,
            workflow = %workflow.id(),
            terminal_step = %step_id,
            execution_time_ms,
            "Workflow run completed"
        );

        Ok(WorkflowOutcome {
            run_id,
            workflow_id: workflow.id().to_string(),
            step_id,
            result,
            steps: records,
            execution_time_ms,
        })
    }
}
