//! Document ingestion domain types and traits

pub mod chunker;

pub use chunker::{
    default_markers, filter_blank, normalize_whitespace, Chunk, DocumentChunker, StructuralMarker,
};
