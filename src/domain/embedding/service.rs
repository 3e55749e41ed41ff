//! Embedding service: input checks and dimension guarantees on top of a provider

use std::sync::Arc;

use tracing::debug;

use super::{EmbeddingError, EmbeddingProvider, EmbeddingRequest};

/// Model used when none is configured
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// Vector dimension of the default model
pub const DEFAULT_EMBEDDING_DIMENSION: usize = 1536;

/// Embeds texts with a fixed model and checks every returned vector's dimension
#[derive(Debug, Clone)]
pub struct EmbeddingService {
    provider: Arc<dyn EmbeddingProvider>,
    model: String,
    dimension: usize,
}

impl EmbeddingService {
    pub fn new(provider: Arc<dyn EmbeddingProvider>, model: impl Into<String>, dimension: usize) -> Self {
        Self {
            provider,
            model: model.into(),
            dimension,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Dimension every returned vector has
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Embed a single text
    pub async fn embed_one(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut vectors = self.embed_many(&[text.to_string()]).await?;
        vectors.pop().ok_or(EmbeddingError::CountMismatch {
            expected: 1,
            actual: 0,
        })
    }

    /// Embed a batch of texts; output order matches input order
    pub async fn embed_many(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        if let Some(index) = texts.iter().position(|t| t.trim().is_empty()) {
            return Err(EmbeddingError::EmptyInput { index });
        }

        debug!(
            provider = self.provider.provider_name(),
            model = %self.model,
            count = texts.len(),
            "Embedding batch"
        );

        let request = EmbeddingRequest::new(self.model.clone(), texts.to_vec()).with_dimensions(self.dimension);
        let vectors = self.provider.embed(request).await?.into_ordered_vectors();

        if vectors.len() != texts.len() {
            return Err(EmbeddingError::CountMismatch {
                expected: texts.len(),
                actual: vectors.len(),
            });
        }

        if let Some(bad) = vectors.iter().find(|v| v.len() != self.dimension) {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.dimension,
                actual: bad.len(),
            });
        }

        Ok(vectors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::embedding::MockEmbeddingProvider;

    fn service(provider: Arc<MockEmbeddingProvider>, dimension: usize) -> EmbeddingService {
        EmbeddingService::new(provider, DEFAULT_EMBEDDING_MODEL, dimension)
    }

    #[tokio::test]
    async fn test_embed_many_preserves_order() {
        let provider = Arc::new(MockEmbeddingProvider::new("mock", 8));
        let service = service(provider.clone(), 8);
        let texts = vec!["first".to_string(), "second".to_string()];

        let vectors = service.embed_many(&texts).await.unwrap();

        assert_eq!(vectors.len(), 2);
        assert_eq!(vectors[0], provider.vector_for("first"));
        assert_eq!(vectors[1], provider.vector_for("second"));
    }

    #[tokio::test]
    async fn test_embed_one() {
        let provider = Arc::new(MockEmbeddingProvider::new("mock", 8));
        let vector = service(provider.clone(), 8).embed_one("question").await.unwrap();

        assert_eq!(vector, provider.vector_for("question"));
    }

    #[tokio::test]
    async fn test_empty_input_rejected_without_call() {
        let provider = Arc::new(MockEmbeddingProvider::new("mock", 8));
        let texts = vec!["ok".to_string(), "   ".to_string()];

        let err = service(provider.clone(), 8).embed_many(&texts).await.unwrap_err();

        assert_eq!(err, EmbeddingError::EmptyInput { index: 1 });
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_batch_makes_no_call() {
        let provider = Arc::new(MockEmbeddingProvider::new("mock", 8));

        let vectors = service(provider.clone(), 8).embed_many(&[]).await.unwrap();

        assert!(vectors.is_empty());
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_dimension_mismatch() {
        let provider = Arc::new(MockEmbeddingProvider::new("mock", 4));

        let err = service(provider, 8).embed_one("text").await.unwrap_err();

        assert_eq!(
            err,
            EmbeddingError::DimensionMismatch {
                expected: 8,
                actual: 4
            }
        );
    }

    #[tokio::test]
    async fn test_provider_error() {
        let provider = Arc::new(MockEmbeddingProvider::new("mock", 8).with_error("boom"));

        let err = service(provider, 8).embed_one("text").await.unwrap_err();

        assert!(matches!(err, EmbeddingError::Provider(_)));
    }
}
