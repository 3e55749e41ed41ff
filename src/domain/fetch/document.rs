use serde::{Deserialize, Serialize};

/// Raw text fetched from a source URL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub url: String,
    pub status: u16,
    pub content: String,
}

impl Document {
    pub fn new(url: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status: 200,
            content: content.into(),
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }
}
