//! Artifact persistence domain

mod store;

pub use store::{artifact_timestamp, ArtifactRef, ArtifactStore};

#[cfg(test)]
pub use store::MockArtifactStore;
