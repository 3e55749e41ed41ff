use thiserror::Error;

/// Errors raised by vector index operations
#[derive(Debug, Clone, Error, PartialEq)]
pub enum IndexError {
    #[error("Index not found: {0}")]
    IndexNotFound(String),

    #[error("Dimension conflict on index '{index}': index has {expected}, got {actual}")]
    DimensionConflict {
        index: String,
        expected: usize,
        actual: usize,
    },

    #[error("Metric conflict on index '{index}': index uses {existing}, requested {requested}")]
    MetricConflict {
        index: String,
        existing: String,
        requested: String,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl IndexError {
    pub fn index_not_found(name: impl Into<String>) -> Self {
        Self::IndexNotFound(name.into())
    }

    pub fn dimension_conflict(index: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::DimensionConflict {
            index: index.into(),
            expected,
            actual,
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IndexError::dimension_conflict("docs-mastra", 1536, 3);
        assert_eq!(
            err.to_string(),
            "Dimension conflict on index 'docs-mastra': index has 1536, got 3"
        );

        let err = IndexError::invalid_argument("top_k must be greater than 0");
        assert_eq!(err.to_string(), "Invalid argument: top_k must be greater than 0");
    }
}
