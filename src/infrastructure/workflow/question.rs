//! Domain question workflow: route, retrieve, answer

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::domain::answer::AnswerGenerator;
use crate::domain::retrieval::ContextRetriever;
use crate::domain::routing::{AgentRouter, RoutingDecision};
use crate::domain::vector_index::RetrievalResult;
use crate::domain::workflow::{
    step_output, FieldType, Step, StepError, StepInput, TriggerSchema, Workflow, WorkflowError, WorkflowId,
};

pub const QUESTION_WORKFLOW_ID: &str = "question";

pub const ROUTE_QUESTION_STEP: &str = "route-question";
pub const RETRIEVE_CONTEXT_STEP: &str = "retrieve-context";
pub const GENERATE_ANSWER_STEP: &str = "generate-answer";

pub const QUESTION_FIELD: &str = "question";

/// Route, retrieve grounding context, then answer
pub fn question_workflow(
    router: Arc<dyn AgentRouter>,
    retriever: Arc<dyn ContextRetriever>,
    generator: Arc<dyn AnswerGenerator>,
) -> Result<Workflow, WorkflowError> {
    let steps: Vec<Arc<dyn Step>> = vec![
        Arc::new(RouteQuestionStep::new(router)),
        Arc::new(RetrieveContextStep::new(retriever)),
        Arc::new(GenerateAnswerStep::new(generator)),
    ];

    Ok(Workflow::new(
        WorkflowId::new(QUESTION_WORKFLOW_ID)?,
        TriggerSchema::new().required(QUESTION_FIELD, FieldType::String),
        steps,
    )?
    .with_description("Answer a question with the agent of its documentation domain"))
}

/// Result of `route-question`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResult {
    pub decision: RoutingDecision,
}

/// Result of `retrieve-context`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextResult {
    pub decision: RoutingDecision,
    pub results: RetrievalResult,
}

/// Result of `generate-answer`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerResult {
    pub decision: RoutingDecision,
    pub answer: String,
    pub sources: Vec<String>,
}

#[derive(Debug)]
pub struct RouteQuestionStep {
    router: Arc<dyn AgentRouter>,
}

impl RouteQuestionStep {
    pub fn new(router: Arc<dyn AgentRouter>) -> Self {
        Self { router }
    }
}

#[async_trait]
impl Step for RouteQuestionStep {
    fn id(&self) -> &str {
        ROUTE_QUESTION_STEP
    }

    async fn execute(&self, input: StepInput<'_>) -> Result<Value, StepError> {
        let question = input.trigger_str(QUESTION_FIELD)?;
        let decision = self.router.route(question).await?;

        step_output(&RouteResult { decision })
    }
}

/// Retrieves documentation for the routed domain; nothing for `unknown`
#[derive(Debug)]
pub struct RetrieveContextStep {
    retriever: Arc<dyn ContextRetriever>,
}

impl RetrieveContextStep {
    pub fn new(retriever: Arc<dyn ContextRetriever>) -> Self {
        Self { retriever }
    }
}

#[async_trait]
impl Step for RetrieveContextStep {
    fn id(&self) -> &str {
        RETRIEVE_CONTEXT_STEP
    }

    fn depends_on(&self) -> &[&'static str] {
        &[ROUTE_QUESTION_STEP]
    }

    async fn execute(&self, input: StepInput<'_>) -> Result<Value, StepError> {
        let question = input.trigger_str(QUESTION_FIELD)?;
        let route: RouteResult = input.dependency_as(ROUTE_QUESTION_STEP)?;

        let results = match route.decision {
            RoutingDecision::Routed(domain) => self.retriever.retrieve(domain, question).await?,
            RoutingDecision::Unknown => {
                info!("No domain for question, skipping retrieval");
                RetrievalResult::empty()
            }
        };

        step_output(&ContextResult {
            decision: route.decision,
            results,
        })
    }
}

#[derive(Debug)]
pub struct GenerateAnswerStep {
    generator: Arc<dyn AnswerGenerator>,
}

impl GenerateAnswerStep {
    pub fn new(generator: Arc<dyn AnswerGenerator>) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl Step for GenerateAnswerStep {
    fn id(&self) -> &str {
        GENERATE_ANSWER_STEP
    }

    fn depends_on(&self) -> &[&'static str] {
        &[ROUTE_QUESTION_STEP, RETRIEVE_CONTEXT_STEP]
    }

    async fn execute(&self, input: StepInput<'_>) -> Result<Value, StepError> {
        let question = input.trigger_str(QUESTION_FIELD)?;
        let route: RouteResult = input.dependency_as(ROUTE_QUESTION_STEP)?;
        let context: ContextResult = input.dependency_as(RETRIEVE_CONTEXT_STEP)?;

        let answer = self
            .generator
            .generate(route.decision, question, &context.results)
            .await?;

        let mut sources: Vec<String> = Vec::new();
        for result in context.results.iter() {
            if !sources.contains(&result.chunk.source) {
                sources.push(result.chunk.source.clone());
            }
        }

        step_output(&AnswerResult {
            decision: route.decision,
            answer,
            sources,
        })
    }
}
