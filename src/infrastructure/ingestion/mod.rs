//! Document chunking infrastructure

mod html_chunker;

pub use html_chunker::HtmlStructureChunker;
