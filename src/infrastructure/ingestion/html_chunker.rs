//! HTML structure chunker

use scraper::{ElementRef, Html};

use crate::domain::fetch::Document;
use crate::domain::ingestion::{normalize_whitespace, Chunk, DocumentChunker, StructuralMarker};

/// Chunker that emits one chunk per element matching a structural marker
#[derive(Debug, Clone, Default)]
pub struct HtmlStructureChunker;

impl HtmlStructureChunker {
    /// Create a new HTML structure chunker
    pub fn new() -> Self {
        Self
    }

    fn marker_for<'m>(
        element: &ElementRef,
        markers: &'m [StructuralMarker],
    ) -> Option<&'m StructuralMarker> {
        let name = element.value().name();
        markers.iter().find(|m| m.tag.eq_ignore_ascii_case(name))
    }

    fn visible_text(element: &ElementRef, out: &mut String) {
        for node in element.children() {
            if let Some(el) = ElementRef::wrap(node) {
                if matches!(el.value().name(), "script" | "style" | "noscript" | "head") {
                    continue;
                }
                Self::visible_text(&el, out);
            } else if let Some(text) = node.value().as_text() {
                out.push(' ');
                out.push_str(text);
            }
        }
    }
}

impl DocumentChunker for HtmlStructureChunker {
    fn chunk(&self, document: &Document, markers: &[StructuralMarker]) -> Vec<Chunk> {
        if document.is_empty() {
            return vec![];
        }

        let html = Html::parse_document(&document.content);
        let mut chunks = Vec::new();

        // descendants() walks the tree in document order
        for node in html.root_element().descendants() {
            let Some(element) = ElementRef::wrap(node) else {
                continue;
            };
            let Some(marker) = Self::marker_for(&element, markers) else {
                continue;
            };

            let mut raw = String::new();
            Self::visible_text(&element, &mut raw);
            let text = normalize_whitespace(&raw);
            if text.is_empty() {
                continue;
            }

            chunks.push(Chunk::new(text, chunks.len(), &document.url).with_tag(&marker.label));
        }

        if !chunks.is_empty() {
            return chunks;
        }

        let mut raw = String::new();
        Self::visible_text(&html.root_element(), &mut raw);
        let text = normalize_whitespace(&raw);
        if text.is_empty() {
            return vec![];
        }

        vec![Chunk::new(text, 0, &document.url)]
    }

    fn name(&self) -> &'static str {
        "html_structure"
    }
}
