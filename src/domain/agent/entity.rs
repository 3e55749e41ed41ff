use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use validator::Validate;

use super::error::AgentError;
use crate::domain::llm::{LlmJsonSchema, LlmProvider, LlmRequest, Message};

/// A named set of instructions bound to a model on a provider
#[derive(Debug, Clone)]
pub struct Agent {
    name: String,
    instructions: String,
    model: String,
    provider: Arc<dyn LlmProvider>,
    temperature: Option<f32>,
}

impl Agent {
    pub fn new(
        name: impl Into<String>,
        instructions: impl Into<String>,
        model: impl Into<String>,
        provider: Arc<dyn LlmProvider>,
    ) -> Self {
        Self {
            name: name.into(),
            instructions: instructions.into(),
            model: model.into(),
            provider,
            temperature: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, prompt: &str, context: &[Message], schema: Option<LlmJsonSchema>) -> LlmRequest {
        let mut builder = LlmRequest::builder().system(self.instructions.clone());

        for message in context {
            builder = builder.message(message.clone());
        }

        builder = builder.user(prompt);

        if let Some(temperature) = self.temperature {
            builder = builder.temperature(temperature);
        }
        if let Some(schema) = schema {
            builder = builder.json_schema(schema);
        }

        builder.build()
    }

    /// Generate a free-form answer; `context` holds earlier conversation turns
    pub async fn generate(&self, prompt: &str, context: &[Message]) -> Result<String, AgentError> {
        let request = self.build_request(prompt, context, None);

        debug!(agent = %self.name, model = %self.model, "Generating text");

        let response = self.provider.chat(&self.model, request).await?;
        Ok(response.content().to_string())
    }

    /// Generate an answer that must decode into `T` and pass its validation rules
    pub async fn generate_structured<T>(&self, prompt: &str, schema: LlmJsonSchema) -> Result<T, AgentError>
    where
        T: DeserializeOwned + Validate,
    {
        let request = self.build_request(prompt, &[], Some(schema));

        debug!(agent = %self.name, model = %self.model, "Generating structured output");

        let response = self.provider.chat(&self.model, request).await?;
        let content = response.content();
        let json_str = extract_json(content).unwrap_or(content);

        let value: T = serde_json::from_str(json_str).map_err(|e| {
            warn!(agent = %self.name, error = %e, "Structured output is not valid JSON for the schema");
            AgentError::schema_violation(&self.name, e.to_string())
        })?;

        value
            .validate()
            .map_err(|e| AgentError::schema_violation(&self.name, e.to_string()))?;

        Ok(value)
    }
}

/// Extract a JSON object from a string (handles markdown code blocks)
pub fn extract_json(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;

    if start < end {
        Some(&text[start..=end])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::llm::{MessageRole, MockLlmProvider};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    #[serde(rename_all = "camelCase")]
    struct FaqOutput {
        #[validate(length(min = 1))]
        faq_content: String,
    }

    fn schema() -> LlmJsonSchema {
        LlmJsonSchema::new("faq", serde_json::json!({"type": "object"}))
    }

    fn agent(provider: Arc<MockLlmProvider>) -> Agent {
        Agent::new("FAQ Agent", "Write FAQs.", "gpt-4o", provider)
    }

    #[test]
    fn test_extract_json_with_markdown() {
        let text = "```json\n{\"faqContent\": \"Q: A\"}\n```";
        assert_eq!(extract_json(text), Some("{\"faqContent\": \"Q: A\"}"));
        assert!(extract_json("no json").is_none());
    }

    #[tokio::test]
    async fn test_generate_sends_instructions_context_and_prompt() {
        let provider = Arc::new(MockLlmProvider::new("mock").with_content("Mastra is a framework."));
        let agent = agent(provider.clone()).with_temperature(0.2);

        let answer = agent
            .generate("What is Mastra?", &[Message::assistant("Earlier turn")])
            .await
            .unwrap();

        assert_eq!(answer, "Mastra is a framework.");

        let requests = provider.requests();
        let messages = &requests[0].messages;
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].role, MessageRole::System);
        assert_eq!(messages[0].content_text(), "Write FAQs.");
        assert_eq!(messages[1].content_text(), "Earlier turn");
        assert_eq!(messages[2].content_text(), "What is Mastra?");
        assert_eq!(requests[0].temperature, Some(0.2));
    }

    #[tokio::test]
    async fn test_generate_structured_decodes_and_sets_schema() {
        let provider = Arc::new(MockLlmProvider::new("mock").with_content(r#"{"faqContent": "Q: Why? A: Because."}"#));
        let agent = agent(provider.clone());

        let output: FaqOutput = agent.generate_structured("PRD", schema()).await.unwrap();

        assert_eq!(output.faq_content, "Q: Why? A: Because.");
        assert!(provider.requests()[0].expects_json());
    }

    #[tokio::test]
    async fn test_generate_structured_rejects_malformed_output() {
        let provider = Arc::new(MockLlmProvider::new("mock").with_content(r#"{"content": "wrong field"}"#));

        let result: Result<FaqOutput, _> = agent(provider).generate_structured("PRD", schema()).await;

        assert!(matches!(result, Err(AgentError::SchemaViolation { ref agent, .. }) if agent == "FAQ Agent"));
    }

    #[tokio::test]
    async fn test_generate_structured_runs_validation_rules() {
        let provider = Arc::new(MockLlmProvider::new("mock").with_content(r#"{"faqContent": ""}"#));

        let result: Result<FaqOutput, _> = agent(provider).generate_structured("PRD", schema()).await;

        assert!(matches!(result, Err(AgentError::SchemaViolation { .. })));
    }

    #[tokio::test]
    async fn test_provider_error_propagates() {
        let provider = Arc::new(MockLlmProvider::new("mock").with_error("rate limited"));

        let result = agent(provider).generate("hi", &[]).await;

        assert!(matches!(result, Err(AgentError::Provider(_))));
    }
}
