//! Vector index implementations

mod in_memory;
mod pgvector;

pub use in_memory::InMemoryVectorIndex;
pub use pgvector::PgVectorIndex;
