use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::agent::Agent;
use crate::domain::answer::{AnswerError, AnswerGenerator};
use crate::domain::llm::LlmProvider;
use crate::domain::routing::{Domain, RoutingDecision};
use crate::domain::vector_index::RetrievalResult;

/// Grounding text used when retrieval returned nothing
pub const NO_GROUNDING_NOTICE: &str = "No grounding context was found in the documentation for this question. \
Tell the user that the available documentation does not contain enough information to answer, \
and do not invent details.";

const MASTRA_INSTRUCTIONS: &str = "You are an expert on the Mastra TypeScript framework for building AI agents and workflows. \
Answer using the documentation excerpts provided and cite their sources.";

const RUST_INSTRUCTIONS: &str = "You are an expert Rust programmer. \
Answer using the Rust documentation excerpts provided and cite their sources.";

const POSTGRES_INSTRUCTIONS: &str = "You are an expert on PostgreSQL and the pgvector extension. \
Answer using the documentation excerpts provided and cite their sources.";

/// Render retrieved chunks, in retrieval order, as the prompt's grounding block
pub fn grounding_block(retrieved: &RetrievalResult) -> String {
    if retrieved.is_empty() {
        return NO_GROUNDING_NOTICE.to_string();
    }

    let mut block = String::from("Documentation excerpts:\n");
    for (i, result) in retrieved.iter().enumerate() {
        let chunk = &result.chunk;
        block.push_str(&format!(
            "\n[{}] {} (source: {}, score: {:.3})\n{}\n",
            i + 1,
            chunk.tag.as_deref().unwrap_or("Text"),
            chunk.source,
            result.score,
            chunk.text
        ));
    }
    block
}

/// Answers with one agent per documentation domain
#[derive(Debug, Clone)]
pub struct AgentAnswerGenerator {
    mastra: Agent,
    rust: Agent,
    postgres: Agent,
}

impl AgentAnswerGenerator {
    pub fn new(mastra: Agent, rust: Agent, postgres: Agent) -> Self {
        Self {
            mastra,
            rust,
            postgres,
        }
    }

    /// Build the default domain agents on one provider and model
    pub fn from_provider(provider: Arc<dyn LlmProvider>, model: &str) -> Self {
        Self::new(
            Agent::new("Mastra Agent", MASTRA_INSTRUCTIONS, model, provider.clone()),
            Agent::new("Rust Agent", RUST_INSTRUCTIONS, model, provider.clone()),
            Agent::new("Postgres Agent", POSTGRES_INSTRUCTIONS, model, provider),
        )
    }

    fn agent_for(&self, domain: Domain) -> &Agent {
        match domain {
            Domain::Mastra => &self.mastra,
            Domain::Rust => &self.rust,
            Domain::Postgres => &self.postgres,
        }
    }
}

#[async_trait]
impl AnswerGenerator for AgentAnswerGenerator {
    async fn generate(
        &self,
        decision: RoutingDecision,
        question: &str,
        retrieved: &RetrievalResult,
    ) -> Result<String, AnswerError> {
        let domain = match decision {
            RoutingDecision::Routed(domain) => domain,
            RoutingDecision::Unknown => {
                return Err(AnswerError::UnroutableDomain(decision.to_string()));
            }
        };

        let agent = self.agent_for(domain);
        let prompt = format!("{}\n\nQuestion: {}", grounding_block(retrieved), question);

        debug!(
            agent = %agent.name(),
            grounding = retrieved.len(),
            "Generating grounded answer"
        );

        let answer = agent.generate(&prompt, &[]).await?;

        info!(domain = %domain, answer_len = answer.len(), "Generated answer");

        Ok(answer)
    }
}
