//! Local filesystem artifact store

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::info;

use crate::domain::artifact::{ArtifactRef, ArtifactStore};
use crate::domain::DomainError;

pub const DEFAULT_TEXT_DIR: &str = "faqs";
pub const DEFAULT_BINARY_DIR: &str = "faq-images";

/// Writes text and binary artifacts into separate subdirectories of a root
#[derive(Debug, Clone)]
pub struct FileSystemArtifactStore {
    root: PathBuf,
    text_dir: String,
    binary_dir: String,
}

impl FileSystemArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            text_dir: DEFAULT_TEXT_DIR.to_string(),
            binary_dir: DEFAULT_BINARY_DIR.to_string(),
        }
    }

    pub fn with_text_dir(mut self, dir: impl Into<String>) -> Self {
        self.text_dir = dir.into();
        self
    }

    pub fn with_binary_dir(mut self, dir: impl Into<String>) -> Self {
        self.binary_dir = dir.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn validate_name(name: &str) -> Result<(), DomainError> {
        if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
            return Err(DomainError::validation(format!(
                "Invalid artifact name '{}'",
                name
            )));
        }
        Ok(())
    }

    async fn write(&self, dir: &str, name: &str, content: &[u8]) -> Result<ArtifactRef, DomainError> {
        Self::validate_name(name)?;

        let dir = self.root.join(dir);
        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            DomainError::storage(format!("Failed to create {}: {}", dir.display(), e))
        })?;

        let path = dir.join(name);
        tokio::fs::write(&path, content).await.map_err(|e| {
            DomainError::storage(format!("Failed to write {}: {}", path.display(), e))
        })?;

        info!(path = %path.display(), bytes = content.len(), "Saved artifact");

        Ok(ArtifactRef::new(path.to_string_lossy()))
    }
}

#[async_trait]
impl ArtifactStore for FileSystemArtifactStore {
    async fn save_text(&self, name: &str, content: &str) -> Result<ArtifactRef, DomainError> {
        self.write(&self.text_dir, name, content.as_bytes()).await
    }

    async fn save_binary(&self, name: &str, content: &[u8]) -> Result<ArtifactRef, DomainError> {
        self.write(&self.binary_dir, name, content).await
    }
}
