//! Embedding request and response types

use serde::{Deserialize, Serialize};

/// Request to embed a batch of texts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingRequest {
    model: String,
    input: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
}

impl EmbeddingRequest {
    pub fn new(model: impl Into<String>, input: Vec<String>) -> Self {
        Self {
            model: model.into(),
            input,
            dimensions: None,
        }
    }

    /// Ask the provider to shorten vectors to the given dimension
    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = Some(dimensions);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn inputs(&self) -> &[String] {
        &self.input
    }

    pub fn dimensions(&self) -> Option<usize> {
        self.dimensions
    }
}

/// A single embedding vector with its position in the batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embedding {
    index: usize,
    embedding: Vec<f32>,
}

impl Embedding {
    pub fn new(index: usize, embedding: Vec<f32>) -> Self {
        Self { index, embedding }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn vector(&self) -> &[f32] {
        &self.embedding
    }

    pub fn dimensions(&self) -> usize {
        self.embedding.len()
    }

    pub fn into_vector(self) -> Vec<f32> {
        self.embedding
    }
}

/// Token usage reported for an embedding call
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmbeddingUsage {
    pub prompt_tokens: u32,
    pub total_tokens: u32,
}

/// Response from an embedding provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingResponse {
    model: String,
    data: Vec<Embedding>,
    usage: EmbeddingUsage,
}

impl EmbeddingResponse {
    pub fn new(model: impl Into<String>, data: Vec<Embedding>, usage: EmbeddingUsage) -> Self {
        Self {
            model: model.into(),
            data,
            usage,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn embeddings(&self) -> &[Embedding] {
        &self.data
    }

    pub fn usage(&self) -> &EmbeddingUsage {
        &self.usage
    }

    /// Vectors ordered by their batch index, whatever order the provider returned them in
    pub fn into_ordered_vectors(mut self) -> Vec<Vec<f32>> {
        self.data.sort_by_key(Embedding::index);
        self.data.into_iter().map(Embedding::into_vector).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_accessors() {
        let request = EmbeddingRequest::new("text-embedding-3-small", vec!["a".into(), "b".into()])
            .with_dimensions(256);

        assert_eq!(request.model(), "text-embedding-3-small");
        assert_eq!(request.inputs(), &["a".to_string(), "b".to_string()]);
        assert_eq!(request.dimensions(), Some(256));
    }

    #[test]
    fn test_response_orders_vectors_by_index() {
        let response = EmbeddingResponse::new(
            "m",
            vec![Embedding::new(1, vec![2.0]), Embedding::new(0, vec![1.0])],
            EmbeddingUsage::default(),
        );

        assert_eq!(response.into_ordered_vectors(), vec![vec![1.0], vec![2.0]]);
    }
}
