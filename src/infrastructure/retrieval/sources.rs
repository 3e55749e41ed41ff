use crate::domain::routing::Domain;

/// Documentation URLs crawled for each domain
#[derive(Debug, Clone)]
pub struct DomainSources {
    mastra: Vec<String>,
    rust: Vec<String>,
    postgres: Vec<String>,
}

impl Default for DomainSources {
    fn default() -> Self {
        Self {
            mastra: to_owned(&[
                "https://mastra.ai/docs",
                "https://mastra.ai/docs/agents/overview",
                "https://mastra.ai/docs/workflows/overview",
            ]),
            rust: to_owned(&[
                "https://doc.rust-lang.org/book/title-page.html",
                "https://doc.rust-lang.org/std/index.html",
            ]),
            postgres: to_owned(&[
                "https://www.postgresql.org/docs/current/intro-whatis.html",
                "https://github.com/pgvector/pgvector",
            ]),
        }
    }
}

impl DomainSources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the URL set of one domain
    pub fn with_urls(mut self, domain: Domain, urls: Vec<String>) -> Self {
        *self.urls_mut(domain) = urls;
        self
    }

    pub fn urls(&self, domain: Domain) -> &[String] {
        match domain {
            Domain::Mastra => &self.mastra,
            Domain::Rust => &self.rust,
            Domain::Postgres => &self.postgres,
        }
    }

    fn urls_mut(&mut self, domain: Domain) -> &mut Vec<String> {
        match domain {
            Domain::Mastra => &mut self.mastra,
            Domain::Rust => &mut self.rust,
            Domain::Postgres => &mut self.postgres,
        }
    }
}

fn to_owned(urls: &[&str]) -> Vec<String> {
    urls.iter().map(|u| u.to_string()).collect()
}
