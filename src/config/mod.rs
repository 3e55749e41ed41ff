//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, ArtifactsConfig, LogFormat, LoggingConfig, OpenAiConfig, RetrievalConfig,
    VectorStoreConfig, DEFAULT_CONNECTION_STRING,
};
