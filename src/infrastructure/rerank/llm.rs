//! Grading-agent re-ranker

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};
use validator::Validate;

use crate::domain::agent::Agent;
use crate::domain::llm::{LlmJsonSchema, LlmProvider};
use crate::domain::rerank::Reranker;
use crate::domain::vector_index::{RetrievalResult, ScoredChunk};
use crate::domain::DomainError;

/// Normalized relevance below which a chunk is dropped
pub const DEFAULT_LLM_RERANK_THRESHOLD: f32 = 0.5;

const GRADER_INSTRUCTIONS: &str = "You grade how well a documentation excerpt answers a developer question. \
Be strict: excerpts that only mention the topic in passing score low.";

const GRADING_PROMPT: &str = r#"Rate how relevant the document is to the question on a scale from 0 to 10.

Question: ${query}

Document:
${document}

Respond with a JSON object: {"score": <0-10>, "reason": "<short reason>"}"#;

#[derive(Debug, Deserialize, Validate)]
struct Grade {
    score: f32,
    #[serde(default)]
    reason: Option<String>,
}

/// Re-ranker that asks an agent to grade each chunk from 0 to 10
#[derive(Debug, Clone)]
pub struct LlmReranker {
    grader: Agent,
    threshold: f32,
}

impl LlmReranker {
    pub fn new(grader: Agent) -> Self {
        Self {
            grader,
            threshold: DEFAULT_LLM_RERANK_THRESHOLD,
        }
    }

    /// Re-ranker with the default grading agent
    pub fn from_provider(provider: Arc<dyn LlmProvider>, model: &str) -> Self {
        Self::new(Agent::new("Relevance Grader", GRADER_INSTRUCTIONS, model, provider).with_temperature(0.0))
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    fn schema() -> LlmJsonSchema {
        LlmJsonSchema::new(
            "relevance_grade",
            json!({
                "type": "object",
                "properties": {
                    "score": { "type": "number" },
                    "reason": { "type": "string" }
                },
                "required": ["score", "reason"],
                "additionalProperties": false
            }),
        )
    }

    fn normalize_score(score: f32) -> f32 {
        (score / 10.0).clamp(0.0, 1.0)
    }

    /// Similarity score mapped onto the 0–1 grade scale. Embeddings are unit
    /// length, so cosine and inner product already fall in -1..=1.
    fn fallback_score(similarity: f32) -> f32 {
        similarity.clamp(0.0, 1.0)
    }

    async fn grade(&self, query: &str, chunk: &ScoredChunk) -> f32 {
        let prompt = GRADING_PROMPT
            .replace("${query}", query)
            .replace("${document}", &chunk.chunk.text);

        match self.grader.generate_structured::<Grade>(&prompt, Self::schema()).await {
            Ok(grade) => {
                let normalized = Self::normalize_score(grade.score);
                debug!(
                    source = %chunk.chunk.source,
                    position = chunk.chunk.position,
                    raw = grade.score,
                    normalized,
                    reason = grade.reason.as_deref().unwrap_or(""),
                    "Graded chunk"
                );
                normalized
            }
            Err(e) => {
                warn!(
                    source = %chunk.chunk.source,
                    position = chunk.chunk.position,
                    error = %e,
                    "Grading failed, falling back to similarity score"
                );
                Self::fallback_score(chunk.score)
            }
        }
    }
}

#[async_trait]
impl Reranker for LlmReranker {
    async fn rerank(&self, query: &str, results: RetrievalResult) -> Result<RetrievalResult, DomainError> {
        let mut graded = Vec::with_capacity(results.len());

        for result in results {
            let score = self.grade(query, &result).await;
            if score >= self.threshold {
                graded.push(ScoredChunk::new(result.chunk, score));
            }
        }

        // sort_by is stable, so equal grades keep retrieval order
        graded.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

        Ok(RetrievalResult::new(graded))
    }

    fn reranker_name(&self) -> &'static str {
        "llm"
    }
}
