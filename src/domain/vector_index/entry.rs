use serde::{Deserialize, Serialize};

use super::SimilarityMetric;

/// Chunk payload stored next to a vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkReference {
    pub text: String,
    pub source: String,
    pub position: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl ChunkReference {
    pub fn new(text: impl Into<String>, source: impl Into<String>, position: usize) -> Self {
        Self {
            text: text.into(),
            source: source.into(),
            position,
            tag: None,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }
}

/// A vector to store under a logical key
#[derive(Debug, Clone, PartialEq)]
pub struct IndexEntry {
    pub key: String,
    pub vector: Vec<f32>,
    pub chunk: ChunkReference,
}

impl IndexEntry {
    pub fn new(key: impl Into<String>, vector: Vec<f32>, chunk: ChunkReference) -> Self {
        Self {
            key: key.into(),
            vector,
            chunk,
        }
    }
}

/// A retrieved chunk with its similarity score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub chunk: ChunkReference,
    pub score: f32,
}

impl ScoredChunk {
    pub fn new(chunk: ChunkReference, score: f32) -> Self {
        Self { chunk, score }
    }
}

/// Ordered query results: descending score, ties in insertion order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RetrievalResult(Vec<ScoredChunk>);

impl RetrievalResult {
    /// Wrap results that are already ordered
    pub fn new(results: Vec<ScoredChunk>) -> Self {
        Self(results)
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScoredChunk> {
        self.0.iter()
    }

    pub fn chunks(&self) -> &[ScoredChunk] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<ScoredChunk> {
        self.0
    }
}

impl IntoIterator for RetrievalResult {
    type Item = ScoredChunk;
    type IntoIter = std::vec::IntoIter<ScoredChunk>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Description of an existing index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexStats {
    pub name: String,
    pub dimension: usize,
    pub metric: SimilarityMetric,
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_reference_serialization_skips_missing_tag() {
        let chunk = ChunkReference::new("text", "https://mastra.ai/docs", 0);
        let json = serde_json::to_value(&chunk).unwrap();
        assert!(json.get("tag").is_none());

        let tagged = chunk.with_tag("Header 1");
        let json = serde_json::to_value(&tagged).unwrap();
        assert_eq!(json["tag"], "Header 1");
    }

    #[test]
    fn test_retrieval_result_serializes_as_list() {
        let result = RetrievalResult::new(vec![ScoredChunk::new(
            ChunkReference::new("a", "s", 0),
            0.5,
        )]);

        let json = serde_json::to_value(&result).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["score"], 0.5);
    }
}
