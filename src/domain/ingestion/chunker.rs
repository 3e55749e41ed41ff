//! Structural chunking types and trait

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::domain::fetch::Document;

/// Maps an HTML tag to the label given to chunks it produces
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralMarker {
    pub tag: String,
    pub label: String,
}

impl StructuralMarker {
    pub fn new(tag: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            label: label.into(),
        }
    }
}

/// Headings `h1`..`h6` labelled `Header N`, and `p` labelled `Paragraph`
pub fn default_markers() -> Vec<StructuralMarker> {
    let mut markers: Vec<StructuralMarker> = (1..=6)
        .map(|level| StructuralMarker::new(format!("h{}", level), format!("Header {}", level)))
        .collect();
    markers.push(StructuralMarker::new("p", "Paragraph"));
    markers
}

/// A piece of a document, in document order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    pub position: usize,
    pub tag: Option<String>,
    pub source: String,
}

impl Chunk {
    pub fn new(text: impl Into<String>, position: usize, source: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            position,
            tag: None,
            source: source.into(),
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Splits a document into chunks at structural markers
pub trait DocumentChunker: Send + Sync + Debug {
    /// Chunks in document order, positions from 0, no whitespace-only text
    fn chunk(&self, document: &Document, markers: &[StructuralMarker]) -> Vec<Chunk>;

    /// Get the chunker name
    fn name(&self) -> &'static str;
}

/// Drop chunks whose text is empty after trimming
pub fn filter_blank(chunks: Vec<Chunk>) -> Vec<Chunk> {
    chunks.into_iter().filter(|c| !c.is_blank()).collect()
}

/// Collapse runs of whitespace into single spaces and trim
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_markers() {
        let markers = default_markers();

        assert_eq!(markers.len(), 7);
        assert_eq!(markers[0], StructuralMarker::new("h1", "Header 1"));
        assert_eq!(markers[5], StructuralMarker::new("h6", "Header 6"));
        assert_eq!(markers[6], StructuralMarker::new("p", "Paragraph"));
    }

    #[test]
    fn test_filter_blank() {
        let chunks = vec![
            Chunk::new("keep", 0, "s"),
            Chunk::new("  \n\t", 1, "s"),
            Chunk::new("", 2, "s"),
        ];

        let kept = filter_blank(chunks);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].text, "keep");
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  a \n  b\tc "), "a b c");
        assert_eq!(normalize_whitespace("   "), "");
    }
}
