//! Artifact persistence

mod filesystem;

pub use filesystem::{FileSystemArtifactStore, DEFAULT_BINARY_DIR, DEFAULT_TEXT_DIR};
