use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

#[cfg(test)]
use mockall::automock;

/// Location of a persisted artifact (a path or URI)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactRef(String);

impl ArtifactRef {
    pub fn new(location: impl Into<String>) -> Self {
        Self(location.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtifactRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Seconds since the Unix epoch, used to name artifacts
pub fn artifact_timestamp() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Persists generated artifacts under a logical name
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ArtifactStore: Send + Sync + fmt::Debug {
    /// Persist text content
    async fn save_text(&self, name: &str, content: &str) -> Result<ArtifactRef, DomainError>;

    /// Persist binary content
    async fn save_binary(&self, name: &str, content: &[u8]) -> Result<ArtifactRef, DomainError>;
}
