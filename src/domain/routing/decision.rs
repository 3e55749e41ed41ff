use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Documentation domains a question can be routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Mastra,
    Rust,
    Postgres,
}

impl Domain {
    pub const ALL: [Domain; 3] = [Domain::Mastra, Domain::Rust, Domain::Postgres];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mastra => "mastra",
            Self::Rust => "rust",
            Self::Postgres => "postgres",
        }
    }

    /// Name of the vector index holding this domain's documentation
    pub fn index_name(&self) -> String {
        format!("docs-{}", self.as_str())
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Domain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Domain::ALL
            .iter()
            .find(|d| d.as_str() == s)
            .copied()
            .ok_or_else(|| format!("unknown domain '{}'", s))
    }
}

/// Outcome of routing a question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RoutingDecision {
    Routed(Domain),
    Unknown,
}

impl RoutingDecision {
    pub const UNKNOWN: &'static str = "unknown";

    pub fn domain(&self) -> Option<Domain> {
        match self {
            Self::Routed(domain) => Some(*domain),
            Self::Unknown => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Routed(domain) => domain.as_str(),
            Self::Unknown => Self::UNKNOWN,
        }
    }
}

impl fmt::Display for RoutingDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<String> for RoutingDecision {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value == Self::UNKNOWN {
            return Ok(Self::Unknown);
        }
        value.parse().map(Self::Routed)
    }
}

impl From<RoutingDecision> for String {
    fn from(decision: RoutingDecision) -> Self {
        decision.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_names_and_index() {
        assert_eq!(Domain::Mastra.as_str(), "mastra");
        assert_eq!(Domain::Postgres.index_name(), "docs-postgres");
        assert_eq!("rust".parse::<Domain>().unwrap(), Domain::Rust);
        assert!("python".parse::<Domain>().is_err());
    }

    #[test]
    fn test_decision_serialization() {
        let json = serde_json::to_value(RoutingDecision::Routed(Domain::Mastra)).unwrap();
        assert_eq!(json, "mastra");

        let decision: RoutingDecision = serde_json::from_value("unknown".into()).unwrap();
        assert_eq!(decision, RoutingDecision::Unknown);
        assert_eq!(decision.domain(), None);

        let result: Result<RoutingDecision, _> = serde_json::from_value("cooking".into());
        assert!(result.is_err());
    }
}
