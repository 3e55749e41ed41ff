//! Similarity-threshold re-ranker

use async_trait::async_trait;
use tracing::debug;

use crate::domain::rerank::Reranker;
use crate::domain::vector_index::RetrievalResult;
use crate::domain::DomainError;

/// Drops results below a minimum similarity score, keeping their order
#[derive(Debug, Clone)]
pub struct ThresholdReranker {
    min_score: f32,
    max_results: Option<usize>,
}

impl ThresholdReranker {
    pub fn new(min_score: f32) -> Self {
        Self {
            min_score,
            max_results: None,
        }
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = Some(max_results);
        self
    }

    pub fn min_score(&self) -> f32 {
        self.min_score
    }
}

#[async_trait]
impl Reranker for ThresholdReranker {
    async fn rerank(&self, _query: &str, results: RetrievalResult) -> Result<RetrievalResult, DomainError> {
        let before = results.len();
        let limit = self.max_results.unwrap_or(usize::MAX);

        let kept: Vec<_> = results
            .into_iter()
            .filter(|r| r.score >= self.min_score)
            .take(limit)
            .collect();

        debug!(
            before,
            after = kept.len(),
            min_score = self.min_score,
            "Applied threshold re-ranking"
        );

        Ok(RetrievalResult::new(kept))
    }

    fn reranker_name(&self) -> &'static str {
        "threshold"
    }
}
