//! Vector index domain: named indexes of chunk embeddings queried by similarity

mod entry;
mod error;
mod index;
mod metric;

pub use entry::{ChunkReference, IndexEntry, IndexStats, RetrievalResult, ScoredChunk};
pub use error::IndexError;
pub use index::VectorIndex;
pub use metric::{cosine_similarity, inner_product, SimilarityMetric};
