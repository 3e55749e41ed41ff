//! Fetch, chunk, embed, index and query documentation for a routed domain

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument, warn};

use super::DomainSources;
use crate::domain::embedding::EmbeddingService;
use crate::domain::fetch::{ContentFetcher, Document, DEFAULT_FETCH_TIMEOUT_MS};
use crate::domain::ingestion::{
    default_markers, filter_blank, Chunk, DocumentChunker, StructuralMarker,
};
use crate::domain::rerank::Reranker;
use crate::domain::retrieval::{ContextRetriever, RetrievalError};
use crate::domain::routing::Domain;
use crate::domain::vector_index::{
    ChunkReference, IndexEntry, RetrievalResult, SimilarityMetric, VectorIndex,
};

/// Results returned per question unless configured otherwise
pub const DEFAULT_TOP_K: usize = 5;

/// Logical key of a chunk: hex SHA-256 of `source#position`
pub fn chunk_key(source: &str, position: usize) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("{}#{}", source, position).as_bytes());
    hex::encode(hasher.finalize())
}

/// Retrieval pipeline over a per-domain URL set and a shared vector index
#[derive(Debug)]
pub struct RetrievalOrchestrator {
    fetcher: Arc<dyn ContentFetcher>,
    chunker: Arc<dyn DocumentChunker>,
    embeddings: EmbeddingService,
    index: Arc<dyn VectorIndex>,
    sources: DomainSources,
    markers: Vec<StructuralMarker>,
    metric: SimilarityMetric,
    fetch_timeout: Duration,
    top_k: usize,
    reranker: Option<Arc<dyn Reranker>>,
}

impl RetrievalOrchestrator {
    pub fn new(
        fetcher: Arc<dyn ContentFetcher>,
        chunker: Arc<dyn DocumentChunker>,
        embeddings: EmbeddingService,
        index: Arc<dyn VectorIndex>,
    ) -> Self {
        Self {
            fetcher,
            chunker,
            embeddings,
            index,
            sources: DomainSources::default(),
            markers: default_markers(),
            metric: SimilarityMetric::default(),
            fetch_timeout: Duration::from_millis(DEFAULT_FETCH_TIMEOUT_MS),
            top_k: DEFAULT_TOP_K,
            reranker: None,
        }
    }

    pub fn with_sources(mut self, sources: DomainSources) -> Self {
        self.sources = sources;
        self
    }

    pub fn with_markers(mut self, markers: Vec<StructuralMarker>) -> Self {
        self.markers = markers;
        self
    }

    pub fn with_metric(mut self, metric: SimilarityMetric) -> Self {
        self.metric = metric;
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_reranker(mut self, reranker: Arc<dyn Reranker>) -> Self {
        self.reranker = Some(reranker);
        self
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    async fn fetch_documents(&self, domain: Domain) -> Result<Vec<Document>, RetrievalError> {
        let urls = self.sources.urls(domain);
        let outcomes = self.fetcher.fetch(urls, self.fetch_timeout).await;

        let mut documents = Vec::with_capacity(outcomes.len());
        for (url, outcome) in outcomes {
            match outcome {
                Ok(document) => documents.push(document),
                Err(e) => warn!(domain = %domain, url = %url, error = %e, "Skipping source"),
            }
        }

        if documents.is_empty() {
            return Err(RetrievalError::NoContentAvailable {
                domain,
                attempted: urls.len(),
            });
        }

        Ok(documents)
    }

    fn chunk_documents(&self, documents: &[Document]) -> Vec<Chunk> {
        let chunks = documents
            .iter()
            .flat_map(|document| self.chunker.chunk(document, &self.markers))
            .collect();
        filter_blank(chunks)
    }

    async fn index_chunks(&self, index_name: &str, chunks: Vec<Chunk>) -> Result<usize, RetrievalError> {
        if chunks.is_empty() {
            debug!(index = %index_name, "No chunks to index");
            return Ok(0);
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let vectors = self.embeddings.embed_many(&texts).await?;

        let entries: Vec<IndexEntry> = chunks
            .into_iter()
            .zip(vectors)
            .map(|(chunk, vector)| {
                let key = chunk_key(&chunk.source, chunk.position);
                let mut reference = ChunkReference::new(chunk.text, chunk.source, chunk.position);
                if let Some(tag) = chunk.tag {
                    reference = reference.with_tag(tag);
                }
                IndexEntry::new(key, vector, reference)
            })
            .collect();

        Ok(self.index.upsert(index_name, entries).await?)
    }
}

#[async_trait]
impl ContextRetriever for RetrievalOrchestrator {
    #[instrument(skip_all, fields(domain = %domain, top_k = self.top_k))]
    async fn retrieve(&self, domain: Domain, question: &str) -> Result<RetrievalResult, RetrievalError> {
        let start = Instant::now();
        let index_name = domain.index_name();

        let documents = self.fetch_documents(domain).await?;
        let chunks = self.chunk_documents(&documents);

        info!(
            documents = documents.len(),
            chunks = chunks.len(),
            "Fetched and chunked sources"
        );

        self.index
            .create_index(&index_name, self.embeddings.dimension(), self.metric)
            .await?;

        let written = self.index_chunks(&index_name, chunks).await?;

        let query_vector = self.embeddings.embed_one(question).await?;
        let mut results = self.index.query(&index_name, &query_vector, self.top_k).await?;

        if let Some(ref reranker) = self.reranker {
            let before = results.len();
            results = reranker.rerank(question, results).await?;
            debug!(
                reranker = reranker.reranker_name(),
                before,
                after = results.len(),
                "Re-ranked results"
            );
        }

        info!(
            index = %index_name,
            written,
            results = results.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Retrieved context"
        );

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::embedding::{EmbeddingError, MockEmbeddingProvider};
    use crate::domain::fetch::{FetchError, MockContentFetcher};
    use crate::infrastructure::ingestion::HtmlStructureChunker;
    use crate::infrastructure::rerank::ThresholdReranker;
    use crate::infrastructure::vector_index::InMemoryVectorIndex;

    const DIMS: usize = 8;
    const DOCS_URL: &str = "http://docs.local/guide";
    const SLOW_URL: &str = "http://docs.local/slow";

    const GUIDE: &str = "<html><body>\
        <h1>Agents</h1>\
        <p>Agents combine a model with tools and memory.</p>\
        <p>Workflows chain steps together.</p>\
        </body></html>";

    struct Fixture {
        fetcher: Arc<MockContentFetcher>,
        embedder: Arc<MockEmbeddingProvider>,
        index: Arc<InMemoryVectorIndex>,
    }

    impl Fixture {
        fn new(fetcher: MockContentFetcher) -> Self {
            Self {
                fetcher: Arc::new(fetcher),
                embedder: Arc::new(MockEmbeddingProvider::new("mock", DIMS)),
                index: Arc::new(InMemoryVectorIndex::new()),
            }
        }

        fn orchestrator(&self) -> RetrievalOrchestrator {
            let sources = DomainSources::new()
                .with_urls(Domain::Mastra, vec![DOCS_URL.to_string(), SLOW_URL.to_string()]);

            RetrievalOrchestrator::new(
                self.fetcher.clone(),
                Arc::new(HtmlStructureChunker::new()),
                EmbeddingService::new(self.embedder.clone(), "text-embedding-3-small", DIMS),
                self.index.clone(),
            )
            .with_sources(sources)
            .with_top_k(2)
        }
    }

    #[test]
    fn test_chunk_key_is_stable_hex_sha256() {
        let key = chunk_key("http://docs.local/guide", 3);

        assert_eq!(key.len(), 64);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(key, chunk_key("http://docs.local/guide", 3));
        assert_ne!(key, chunk_key("http://docs.local/guide", 4));
    }

    #[tokio::test]
    async fn test_proceeds_when_one_source_times_out() {
        let fixture = Fixture::new(
            MockContentFetcher::new()
                .with_document(DOCS_URL, GUIDE)
                .with_error(SLOW_URL, FetchError::Timeout),
        );

        let results = fixture
            .orchestrator()
            .retrieve(Domain::Mastra, "Workflows chain steps together.")
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
        let top = &results.chunks()[0];
        assert_eq!(top.chunk.text, "Workflows chain steps together.");
        assert_eq!(top.chunk.source, DOCS_URL);
        assert_eq!(top.chunk.tag.as_deref(), Some("Paragraph"));
        assert!((top.score - 1.0).abs() < 1e-5);

        let stats = fixture.index.describe_index("docs-mastra").await.unwrap();
        assert_eq!(stats.count, 3);
        assert_eq!(stats.dimension, DIMS);
    }

    #[tokio::test]
    async fn test_all_fetches_failed() {
        let fixture = Fixture::new(
            MockContentFetcher::new()
                .with_error(DOCS_URL, FetchError::Status(503))
                .with_error(SLOW_URL, FetchError::Network("connection reset".into())),
        );

        let result = fixture.orchestrator().retrieve(Domain::Mastra, "anything").await;

        assert_eq!(
            result.unwrap_err(),
            RetrievalError::NoContentAvailable {
                domain: Domain::Mastra,
                attempted: 2
            }
        );
        assert_eq!(fixture.embedder.call_count(), 0);
    }

    #[tokio::test]
    async fn test_rerun_overwrites_instead_of_duplicating() {
        let fixture = Fixture::new(MockContentFetcher::new().with_document(DOCS_URL, GUIDE));
        let orchestrator = fixture.orchestrator();

        orchestrator.retrieve(Domain::Mastra, "agents").await.unwrap();
        orchestrator.retrieve(Domain::Mastra, "workflows").await.unwrap();

        let stats = fixture.index.describe_index("docs-mastra").await.unwrap();
        assert_eq!(stats.count, 3);
    }

    #[tokio::test]
    async fn test_blank_chunks_never_reach_the_embedder() {
        let html = "<body><p>  </p><p>Real text</p><h2>\n</h2></body>";
        let fixture = Fixture::new(MockContentFetcher::new().with_document(DOCS_URL, html));

        fixture.orchestrator().retrieve(Domain::Mastra, "text").await.unwrap();

        let batches = fixture.embedder.batches();
        assert_eq!(batches[0], vec!["Real text".to_string()]);
        assert!(batches.iter().flatten().all(|t| !t.trim().is_empty()));
    }

    #[tokio::test]
    async fn test_zero_chunks_still_queries_existing_index() {
        let seeded = Fixture::new(MockContentFetcher::new().with_document(DOCS_URL, GUIDE));
        seeded.orchestrator().retrieve(Domain::Mastra, "agents").await.unwrap();

        let empty = Fixture {
            fetcher: Arc::new(MockContentFetcher::new().with_document(DOCS_URL, "   ")),
            embedder: seeded.embedder.clone(),
            index: seeded.index.clone(),
        };
        let calls_before = empty.embedder.call_count();

        let results = empty.orchestrator().retrieve(Domain::Mastra, "agents").await.unwrap();

        assert_eq!(results.len(), 2);
        // only the question was embedded
        assert_eq!(empty.embedder.call_count(), calls_before + 1);
    }

    #[tokio::test]
    async fn test_reranker_applied_after_query() {
        let fixture = Fixture::new(MockContentFetcher::new().with_document(DOCS_URL, GUIDE));

        let results = fixture
            .orchestrator()
            .with_top_k(3)
            .with_reranker(Arc::new(ThresholdReranker::new(0.999)))
            .retrieve(Domain::Mastra, "Agents")
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results.chunks()[0].chunk.text, "Agents");
    }

    #[tokio::test]
    async fn test_blank_question_is_rejected_by_embedding() {
        let fixture = Fixture::new(MockContentFetcher::new().with_document(DOCS_URL, GUIDE));

        let result = fixture.orchestrator().retrieve(Domain::Mastra, " ").await;

        assert_eq!(
            result.unwrap_err(),
            RetrievalError::Embedding(EmbeddingError::EmptyInput { index: 0 })
        );
    }
}
