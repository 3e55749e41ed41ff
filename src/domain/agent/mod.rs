//! Agents: named instructions bound to a chat model
//!
//! An [`Agent`] is the boundary to the generative model. Free-form answers go
//! through [`Agent::generate`]; structured answers go through
//! [`Agent::generate_structured`], which decodes the model output into a
//! typed value and validates it before handing it back.

mod entity;
mod error;

pub use entity::{extract_json, Agent};
pub use error::AgentError;
