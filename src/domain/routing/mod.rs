//! Question routing domain: the closed set of documentation domains

mod decision;
mod router;

pub use decision::{Domain, RoutingDecision};
pub use router::{AgentRouter, RoutingError};
