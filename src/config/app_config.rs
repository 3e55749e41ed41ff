use serde::Deserialize;

use crate::domain::embedding::{DEFAULT_EMBEDDING_DIMENSION, DEFAULT_EMBEDDING_MODEL};
use crate::domain::fetch::DEFAULT_FETCH_TIMEOUT_MS;
use crate::domain::vector_index::SimilarityMetric;
use crate::infrastructure::image::DEFAULT_IMAGE_MODEL;
use crate::infrastructure::llm::DEFAULT_OPENAI_BASE_URL;
use crate::infrastructure::rerank::DEFAULT_LLM_RERANK_THRESHOLD;
use crate::infrastructure::retrieval::DEFAULT_TOP_K;

/// Connection string used when no vector store is configured
pub const DEFAULT_CONNECTION_STRING: &str = "default_connection_string";

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub openai: OpenAiConfig,
    pub vector_store: VectorStoreConfig,
    pub retrieval: RetrievalConfig,
    pub artifacts: ArtifactsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
    pub chat_model: String,
    /// Model used for routing and relevance grading
    pub utility_model: String,
    pub embedding_model: String,
    pub embedding_dimension: usize,
    pub image_model: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VectorStoreConfig {
    pub connection_string: String,
    pub metric: SimilarityMetric,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub fetch_timeout_ms: u64,
    pub top_k: usize,
    pub rerank_min_score: f32,
    pub rerank_max_results: Option<usize>,
    pub llm_rerank_threshold: f32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ArtifactsConfig {
    pub output_dir: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            chat_model: "gpt-4o".to_string(),
            utility_model: "gpt-4o-mini".to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            embedding_dimension: DEFAULT_EMBEDDING_DIMENSION,
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            request_timeout_secs: 120,
        }
    }
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            connection_string: DEFAULT_CONNECTION_STRING.to_string(),
            metric: SimilarityMetric::default(),
        }
    }
}

impl VectorStoreConfig {
    /// Whether the connection string is still the unconfigured placeholder
    pub fn is_placeholder(&self) -> bool {
        let value = self.connection_string.trim();
        value.is_empty() || value == DEFAULT_CONNECTION_STRING
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_ms: DEFAULT_FETCH_TIMEOUT_MS,
            top_k: DEFAULT_TOP_K,
            rerank_min_score: 0.3,
            rerank_max_results: None,
            llm_rerank_threshold: DEFAULT_LLM_RERANK_THRESHOLD,
        }
    }
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            output_dir: "output".to_string(),
        }
    }
}

impl AppConfig {
    /// Load `config/default`, `config/local` and `APP__*` variables, then the conventional overrides
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let loaded: Self = config.try_deserialize()?;
        Ok(loaded.with_env_overrides(|key| std::env::var(key).ok()))
    }

    /// Apply `OPENAI_API_KEY`, `OPENAI_BASE_URL`, `VECTOR_STORE_URL` and `POSTGRES_CONNECTION_STRING`
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(api_key) = non_empty("OPENAI_API_KEY") {
            self.openai.api_key = api_key;
        }

        if let Some(base_url) = non_empty("OPENAI_BASE_URL") {
            self.openai.base_url = base_url;
        }

        if let Some(url) = non_empty("VECTOR_STORE_URL").or_else(|| non_empty("POSTGRES_CONNECTION_STRING")) {
            self.vector_store.connection_string = url;
        }

        self
    }
}
