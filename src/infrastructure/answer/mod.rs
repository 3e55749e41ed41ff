//! Domain-bound answer generation

mod generator;

pub use generator::{grounding_block, AgentAnswerGenerator, NO_GROUNDING_NOTICE};
