//! OpenAI embedding provider implementation

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::embedding::{
    Embedding, EmbeddingProvider, EmbeddingRequest, EmbeddingResponse, EmbeddingUsage,
};
use crate::domain::DomainError;
use crate::infrastructure::llm::{HttpClientTrait, DEFAULT_OPENAI_BASE_URL};

/// Known OpenAI embedding models and their dimensions
const EMBEDDING_MODELS: &[(&str, usize)] = &[
    ("text-embedding-3-small", 1536),
    ("text-embedding-3-large", 3072),
    ("text-embedding-ada-002", 1536),
];

/// Native dimension of a known OpenAI embedding model
pub fn model_dimension(model: &str) -> Option<usize> {
    EMBEDDING_MODELS
        .iter()
        .find(|(name, _)| *name == model)
        .map(|(_, dims)| *dims)
}

/// OpenAI embedding provider
#[derive(Debug)]
pub struct OpenAiEmbeddingProvider<C: HttpClientTrait> {
    client: C,
    auth_header: String,
    base_url: String,
}

impl<C: HttpClientTrait> OpenAiEmbeddingProvider<C> {
    pub fn new(client: C, api_key: impl Into<String>) -> Self {
        Self::with_base_url(client, api_key, DEFAULT_OPENAI_BASE_URL)
    }

    pub fn with_base_url(client: C, api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client,
            auth_header: format!("Bearer {}", api_key.into()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn embeddings_url(&self) -> String {
        format!("{}/v1/embeddings", self.base_url)
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("Authorization", self.auth_header.as_str()),
            ("Content-Type", "application/json"),
        ]
    }

    fn build_request(&self, request: &EmbeddingRequest) -> serde_json::Value {
        let mut body = serde_json::json!({
            "model": request.model(),
            "input": request.inputs(),
            "encoding_format": "float",
        });

        // Only the text-embedding-3 family accepts a shortened dimension
        if let Some(dims) = request.dimensions() {
            if model_dimension(request.model()) != Some(dims) {
                body["dimensions"] = serde_json::json!(dims);
            }
        }

        body
    }

    fn parse_response(&self, json: serde_json::Value) -> Result<EmbeddingResponse, DomainError> {
        let response: OpenAiEmbeddingResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::provider("openai", format!("Failed to parse embedding response: {}", e))
        })?;

        let embeddings: Vec<Embedding> = response
            .data
            .into_iter()
            .map(|d| Embedding::new(d.index, d.embedding))
            .collect();

        let usage = EmbeddingUsage {
            prompt_tokens: response.usage.prompt_tokens,
            total_tokens: response.usage.total_tokens,
        };

        Ok(EmbeddingResponse::new(response.model, embeddings, usage))
    }
}

#[async_trait]
impl<C: HttpClientTrait> EmbeddingProvider for OpenAiEmbeddingProvider<C> {
    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, DomainError> {
        let url = self.embeddings_url();
        let body = self.build_request(&request);
        let response = self.client.post_json(&url, self.headers(), &body).await?;

        self.parse_response(response)
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }
}

// OpenAI API types for embeddings

#[derive(Debug, Deserialize)]
struct OpenAiEmbeddingResponse {
    model: String,
    data: Vec<OpenAiEmbeddingData>,
    usage: OpenAiEmbeddingUsage,
}

#[derive(Debug, Deserialize)]
struct OpenAiEmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct OpenAiEmbeddingUsage {
    prompt_tokens: u32,
    total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::llm::MockHttpClient;

    const TEST_URL: &str = "https://api.openai.com/v1/embeddings";

    fn create_mock_response(indices: &[usize], dimensions: usize) -> serde_json::Value {
        let data: Vec<serde_json::Value> = indices
            .iter()
            .map(|&i| {
                let embedding: Vec<f32> = (0..dimensions).map(|j| (i + j) as f32 * 0.001).collect();
                serde_json::json!({ "index": i, "embedding": embedding, "object": "embedding" })
            })
            .collect();

        serde_json::json!({
            "model": "text-embedding-3-small",
            "data": data,
            "usage": { "prompt_tokens": 10, "total_tokens": 10 }
        })
    }

    #[tokio::test]
    async fn test_embed_batch_is_reordered_by_index() {
        let client = MockHttpClient::new().with_response(TEST_URL, create_mock_response(&[2, 0, 1], 4));
        let provider = OpenAiEmbeddingProvider::new(client, "test-api-key");

        let request = EmbeddingRequest::new(
            "text-embedding-3-small",
            vec!["Hello".into(), "World".into(), "Test".into()],
        );
        let vectors = provider.embed(request).await.unwrap().into_ordered_vectors();

        assert_eq!(vectors.len(), 3);
        assert_eq!(vectors[0][0], 0.0);
        assert_eq!(vectors[2][0], 0.002);
    }

    #[tokio::test]
    async fn test_request_body() {
        let client = MockHttpClient::new().with_response(TEST_URL, create_mock_response(&[0], 256));
        let provider = OpenAiEmbeddingProvider::new(client, "test-api-key");

        let request = EmbeddingRequest::new("text-embedding-3-small", vec!["Hello".into()]).with_dimensions(256);
        provider.embed(request).await.unwrap();

        let body = &provider.client.bodies()[0].1;
        assert_eq!(body["input"], serde_json::json!(["Hello"]));
        assert_eq!(body["dimensions"], 256);
    }

    #[tokio::test]
    async fn test_native_dimension_is_not_sent() {
        let client = MockHttpClient::new().with_response(TEST_URL, create_mock_response(&[0], 4));
        let provider = OpenAiEmbeddingProvider::new(client, "test-api-key");

        let request = EmbeddingRequest::new("text-embedding-3-small", vec!["Hello".into()]).with_dimensions(1536);
        provider.embed(request).await.unwrap();

        assert!(provider.client.bodies()[0].1.get("dimensions").is_none());
    }

    #[tokio::test]
    async fn test_embed_error() {
        let client = MockHttpClient::new().with_error(TEST_URL, "Rate limit exceeded");
        let provider = OpenAiEmbeddingProvider::new(client, "test-api-key");

        let request = EmbeddingRequest::new("text-embedding-3-small", vec!["Hello".into()]);
        assert!(provider.embed(request).await.is_err());
    }

    #[test]
    fn test_model_dimension() {
        assert_eq!(model_dimension("text-embedding-3-small"), Some(1536));
        assert_eq!(model_dimension("text-embedding-3-large"), Some(3072));
        assert_eq!(model_dimension("unknown-model"), None);
    }
}
