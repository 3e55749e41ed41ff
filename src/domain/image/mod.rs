//! Image generation domain

use std::fmt::Debug;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// An image returned by an image model, base64 encoded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedImage {
    pub image_base64: String,
    pub description: Option<String>,
}

impl GeneratedImage {
    pub fn new(image_base64: impl Into<String>) -> Self {
        Self {
            image_base64: image_base64.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Decode the image bytes
    pub fn decode(&self) -> Result<Vec<u8>, DomainError> {
        STANDARD
            .decode(self.image_base64.trim())
            .map_err(|e| DomainError::validation(format!("Invalid base64 image data: {}", e)))
    }
}

/// Generates images from a text prompt
#[async_trait]
pub trait ImageGenerator: Send + Sync + Debug {
    async fn generate_images(&self, prompt: &str, count: usize) -> Result<Vec<GeneratedImage>, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Returns a fixed list of images regardless of the requested count
    #[derive(Debug)]
    pub struct MockImageGenerator {
        images: Vec<GeneratedImage>,
        calls: AtomicUsize,
    }

    impl MockImageGenerator {
        pub fn new(images: Vec<GeneratedImage>) -> Self {
            Self {
                images,
                calls: AtomicUsize::new(0),
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ImageGenerator for MockImageGenerator {
        async fn generate_images(&self, _prompt: &str, _count: usize) -> Result<Vec<GeneratedImage>, DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.images.clone())
        }

        fn provider_name(&self) -> &'static str {
            "mock"
        }
    }
}
