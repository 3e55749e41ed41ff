//! OpenAI images API provider

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::domain::image::{GeneratedImage, ImageGenerator};
use crate::domain::DomainError;
use crate::infrastructure::llm::{HttpClientTrait, DEFAULT_OPENAI_BASE_URL};

pub const DEFAULT_IMAGE_MODEL: &str = "dall-e-2";
pub const DEFAULT_IMAGE_SIZE: &str = "1024x1024";

/// OpenAI image generation provider returning base64 payloads
#[derive(Debug)]
pub struct OpenAiImageProvider<C: HttpClientTrait> {
    client: C,
    auth_header: String,
    base_url: String,
    model: String,
    size: String,
}

impl<C: HttpClientTrait> OpenAiImageProvider<C> {
    pub fn new(client: C, api_key: impl Into<String>) -> Self {
        Self::with_base_url(client, api_key, DEFAULT_OPENAI_BASE_URL)
    }

    pub fn with_base_url(client: C, api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client,
            auth_header: format!("Bearer {}", api_key.into()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: DEFAULT_IMAGE_MODEL.to_string(),
            size: DEFAULT_IMAGE_SIZE.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = size.into();
        self
    }

    fn images_url(&self) -> String {
        format!("{}/v1/images/generations", self.base_url)
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("Authorization", self.auth_header.as_str()),
            ("Content-Type", "application/json"),
        ]
    }

    fn build_request(&self, prompt: &str, count: usize) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "prompt": prompt,
            "n": count,
            "size": self.size,
            "response_format": "b64_json",
        })
    }

    fn parse_response(&self, prompt: &str, json: serde_json::Value) -> Result<Vec<GeneratedImage>, DomainError> {
        let response: OpenAiImageResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::provider("openai", format!("Failed to parse image response: {}", e))
        })?;

        response
            .data
            .into_iter()
            .map(|image| {
                let b64 = image
                    .b64_json
                    .ok_or_else(|| DomainError::provider("openai", "Image response missing b64_json"))?;
                let description = image.revised_prompt.unwrap_or_else(|| prompt.to_string());
                Ok(GeneratedImage::new(b64).with_description(description))
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiImageResponse {
    data: Vec<OpenAiImageData>,
}

#[derive(Debug, Deserialize)]
struct OpenAiImageData {
    b64_json: Option<String>,
    revised_prompt: Option<String>,
}

#[async_trait]
impl<C: HttpClientTrait> ImageGenerator for OpenAiImageProvider<C> {
    async fn generate_images(&self, prompt: &str, count: usize) -> Result<Vec<GeneratedImage>, DomainError> {
        let body = self.build_request(prompt, count);

        debug!(model = %self.model, count, "Requesting images");

        let json = self.client.post_json(&self.images_url(), self.headers(), &body).await?;
        self.parse_response(prompt, json)
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }
}
