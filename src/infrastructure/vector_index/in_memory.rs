//! In-memory vector index for tests and runs without PostgreSQL

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::vector_index::{
    ChunkReference, IndexEntry, IndexError, IndexStats, RetrievalResult, ScoredChunk,
    SimilarityMetric, VectorIndex,
};

/// In-memory vector index; every index lives in one map behind a single lock
#[derive(Debug, Default)]
pub struct InMemoryVectorIndex {
    indexes: RwLock<HashMap<String, StoredIndex>>,
}

#[derive(Debug)]
struct StoredIndex {
    dimension: usize,
    metric: SimilarityMetric,
    /// Entries in first-insertion order
    entries: Vec<StoredEntry>,
    positions: HashMap<String, usize>,
}

#[derive(Debug, Clone)]
struct StoredEntry {
    vector: Vec<f32>,
    chunk: ChunkReference,
}

impl InMemoryVectorIndex {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VectorIndex for InMemoryVectorIndex {
    async fn create_index(
        &self,
        name: &str,
        dimension: usize,
        metric: SimilarityMetric,
    ) -> Result<(), IndexError> {
        if dimension == 0 {
            return Err(IndexError::invalid_argument("dimension must be greater than 0"));
        }

        let mut indexes = self.indexes.write().await;

        if let Some(existing) = indexes.get(name) {
            if existing.dimension != dimension {
                return Err(IndexError::dimension_conflict(name, existing.dimension, dimension));
            }
            if existing.metric != metric {
                return Err(IndexError::MetricConflict {
                    index: name.to_string(),
                    existing: existing.metric.to_string(),
                    requested: metric.to_string(),
                });
            }
            return Ok(());
        }

        debug!(index = name, dimension, %metric, "Creating in-memory index");

        indexes.insert(
            name.to_string(),
            StoredIndex {
                dimension,
                metric,
                entries: Vec::new(),
                positions: HashMap::new(),
            },
        );

        Ok(())
    }

    async fn upsert(&self, name: &str, entries: Vec<IndexEntry>) -> Result<usize, IndexError> {
        let mut indexes = self.indexes.write().await;
        let index = indexes
            .get_mut(name)
            .ok_or_else(|| IndexError::index_not_found(name))?;

        if let Some(bad) = entries.iter().find(|e| e.vector.len() != index.dimension) {
            return Err(IndexError::dimension_conflict(name, index.dimension, bad.vector.len()));
        }

        let count = entries.len();

        for entry in entries {
            let stored = StoredEntry {
                vector: entry.vector,
                chunk: entry.chunk,
            };

            match index.positions.get(&entry.key) {
                Some(&position) => index.entries[position] = stored,
                None => {
                    index.positions.insert(entry.key, index.entries.len());
                    index.entries.push(stored);
                }
            }
        }

        debug!(index = name, count, total = index.entries.len(), "Upserted entries");

        Ok(count)
    }

    async fn query(
        &self,
        name: &str,
        vector: &[f32],
        top_k: usize,
    ) -> Result<RetrievalResult, IndexError> {
        if top_k == 0 {
            return Err(IndexError::invalid_argument("top_k must be greater than 0"));
        }

        let indexes = self.indexes.read().await;
        let index = indexes
            .get(name)
            .ok_or_else(|| IndexError::index_not_found(name))?;

        if vector.len() != index.dimension {
            return Err(IndexError::dimension_conflict(name, index.dimension, vector.len()));
        }

        let mut scored: Vec<ScoredChunk> = index
            .entries
            .iter()
            .map(|e| ScoredChunk::new(e.chunk.clone(), index.metric.score(&e.vector, vector)))
            .collect();

        // Stable sort keeps insertion order among equal scores
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        scored.truncate(top_k);

        Ok(RetrievalResult::new(scored))
    }

    async fn describe_index(&self, name: &str) -> Result<IndexStats, IndexError> {
        let indexes = self.indexes.read().await;
        let index = indexes
            .get(name)
            .ok_or_else(|| IndexError::index_not_found(name))?;

        Ok(IndexStats {
            name: name.to_string(),
            dimension: index.dimension,
            metric: index.metric,
            count: index.entries.len(),
        })
    }

    fn store_name(&self) -> &'static str {
        "in_memory"
    }
}
