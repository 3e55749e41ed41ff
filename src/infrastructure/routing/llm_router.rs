//! Classification-agent router

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};
use validator::Validate;

use crate::domain::agent::Agent;
use crate::domain::llm::{LlmJsonSchema, LlmProvider};
use crate::domain::routing::{AgentRouter, Domain, RoutingDecision, RoutingError};

/// Instructions for the default classification agent
const ROUTER_INSTRUCTIONS: &str = "You classify developer questions by topic. \
Answer with the single documentation domain the question belongs to: \
'mastra' for the Mastra TypeScript agent framework, 'rust' for the Rust language and standard library, \
'postgres' for PostgreSQL and the pgvector extension. \
If the question fits none of them, answer 'unknown'.";

#[derive(Debug, Deserialize, Validate)]
struct Classification {
    domain: RoutingDecision,
}

/// Router backed by a classification agent with a closed domain enum
#[derive(Debug, Clone)]
pub struct LlmAgentRouter {
    classifier: Agent,
}

impl LlmAgentRouter {
    pub fn new(classifier: Agent) -> Self {
        Self { classifier }
    }

    /// Router with the default classification agent
    pub fn from_provider(provider: Arc<dyn LlmProvider>, model: &str) -> Self {
        Self::new(Agent::new("Router Agent", ROUTER_INSTRUCTIONS, model, provider).with_temperature(0.0))
    }

    fn domain_values() -> Vec<Value> {
        Domain::ALL
            .iter()
            .map(|d| Value::from(d.as_str()))
            .chain(std::iter::once(Value::from(RoutingDecision::UNKNOWN)))
            .collect()
    }

    fn schema() -> LlmJsonSchema {
        LlmJsonSchema::new(
            "domain_classification",
            json!({
                "type": "object",
                "properties": {
                    "domain": { "type": "string", "enum": Self::domain_values() }
                },
                "required": ["domain"],
                "additionalProperties": false
            }),
        )
    }
}

#[async_trait]
impl AgentRouter for LlmAgentRouter {
    async fn route(&self, question: &str) -> Result<RoutingDecision, RoutingError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(RoutingError::MissingInput("question".to_string()));
        }

        debug!(agent = %self.classifier.name(), "Classifying question");

        let classification: Classification = self
            .classifier
            .generate_structured(question, Self::schema())
            .await?;

        info!(decision = %classification.domain, "Routed question");

        Ok(classification.domain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::agent::AgentError;
    use crate::domain::llm::MockLlmProvider;

    fn router(provider: Arc<MockLlmProvider>) -> LlmAgentRouter {
        LlmAgentRouter::from_provider(provider, "gpt-4o-mini")
    }

    #[tokio::test]
    async fn test_routes_to_domain() {
        let provider = Arc::new(MockLlmProvider::new("mock").with_content(r#"{"domain": "postgres"}"#));

        let decision = router(provider.clone())
            .route("How do I create an HNSW index with pgvector?")
            .await
            .unwrap();

        assert_eq!(decision, RoutingDecision::Routed(Domain::Postgres));

        let request = &provider.requests()[0];
        assert!(request.expects_json());
        assert_eq!(
            request.messages.last().unwrap().content_text(),
            "How do I create an HNSW index with pgvector?"
        );
    }

    #[tokio::test]
    async fn test_unknown_is_not_an_error() {
        let provider = Arc::new(MockLlmProvider::new("mock").with_content(r#"{"domain": "unknown"}"#));

        let decision = router(provider).route("What's a good pasta recipe?").await.unwrap();

        assert_eq!(decision, RoutingDecision::Unknown);
    }

    #[tokio::test]
    async fn test_blank_question_makes_no_call() {
        let provider = Arc::new(MockLlmProvider::new("mock").with_content(r#"{"domain": "rust"}"#));

        let result = router(provider.clone()).route("   ").await;

        assert!(matches!(result, Err(RoutingError::MissingInput(_))));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_out_of_enum_value_is_schema_violation() {
        let provider = Arc::new(MockLlmProvider::new("mock").with_content(r#"{"domain": "cooking"}"#));

        let result = router(provider).route("Best knives?").await;

        assert!(matches!(
            result,
            Err(RoutingError::Agent(AgentError::SchemaViolation { .. }))
        ));
    }

    #[test]
    fn test_schema_lists_domains_and_unknown() {
        let schema = LlmAgentRouter::schema();
        let values = &schema.schema["properties"]["domain"]["enum"];

        assert_eq!(values, &json!(["mastra", "rust", "postgres", "unknown"]));
    }
}
