use std::fmt::Debug;

use async_trait::async_trait;

use super::{IndexEntry, IndexError, IndexStats, RetrievalResult, SimilarityMetric};

/// Named vector indexes with similarity queries
#[async_trait]
pub trait VectorIndex: Send + Sync + Debug {
    /// Create an index; a no-op when it exists with the same dimension and metric
    async fn create_index(
        &self,
        name: &str,
        dimension: usize,
        metric: SimilarityMetric,
    ) -> Result<(), IndexError>;

    /// Insert or replace entries by key; returns the number written
    async fn upsert(&self, name: &str, entries: Vec<IndexEntry>) -> Result<usize, IndexError>;

    /// Up to `top_k` entries most similar to `vector`
    async fn query(
        &self,
        name: &str,
        vector: &[f32],
        top_k: usize,
    ) -> Result<RetrievalResult, IndexError>;

    async fn describe_index(&self, name: &str) -> Result<IndexStats, IndexError>;

    /// Get the store name
    fn store_name(&self) -> &'static str;
}
