//! Agent Pipelines
//!
//! Multi-step pipelines of generative agents run by a step-graph executor:
//! - FAQ generation from a PRD, with editorial review and illustrations
//! - Domain question answering, grounded by retrieval over crawled documentation

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::info;

use domain::{
    artifact::ArtifactStore,
    embedding::{EmbeddingProvider, EmbeddingService},
    fetch::ContentFetcher,
    image::ImageGenerator,
    llm::LlmProvider,
    rerank::Reranker,
    vector_index::VectorIndex,
    workflow::{StepServices, Workflow, WorkflowError, WorkflowExecutor, WorkflowOutcome},
};
use infrastructure::{
    answer::AgentAnswerGenerator,
    artifact::FileSystemArtifactStore,
    embedding::OpenAiEmbeddingProvider,
    fetch::HttpContentFetcher,
    image::OpenAiImageProvider,
    ingestion::HtmlStructureChunker,
    llm::{HttpClient, OpenAiProvider},
    rerank::{LlmReranker, ThresholdReranker},
    retrieval::RetrievalOrchestrator,
    routing::LlmAgentRouter,
    vector_index::{InMemoryVectorIndex, PgVectorIndex},
    workflow::{faq_images_workflow, faq_workflow, question_workflow, StepGraphExecutor},
};

/// Vector store backing the retrieval pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum VectorStoreKind {
    Memory,
    Postgres,
}

/// Optional re-ranking applied after the similarity query
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum RerankMode {
    #[default]
    None,
    Threshold,
    Llm,
}

/// Per-run options of the question workflow
#[derive(Debug, Clone, Default)]
pub struct QuestionOptions {
    pub top_k: Option<usize>,
    pub rerank: RerankMode,
}

/// Pick the vector store: an explicit request wins, otherwise PostgreSQL only when configured
pub fn resolve_vector_store(config: &AppConfig, requested: Option<VectorStoreKind>) -> VectorStoreKind {
    match requested {
        Some(kind) => kind,
        None if config.vector_store.is_placeholder() => VectorStoreKind::Memory,
        None => VectorStoreKind::Postgres,
    }
}

/// Providers and stores shared by every workflow
#[derive(Debug)]
pub struct AppServices {
    config: AppConfig,
    llm: Arc<dyn LlmProvider>,
    images: Arc<dyn ImageGenerator>,
    fetcher: Arc<dyn ContentFetcher>,
    embeddings: EmbeddingService,
    index: Arc<dyn VectorIndex>,
    executor: StepGraphExecutor,
}

impl AppServices {
    pub fn new(
        config: AppConfig,
        llm: Arc<dyn LlmProvider>,
        images: Arc<dyn ImageGenerator>,
        embedder: Arc<dyn EmbeddingProvider>,
        fetcher: Arc<dyn ContentFetcher>,
        index: Arc<dyn VectorIndex>,
        artifacts: Arc<dyn ArtifactStore>,
    ) -> Self {
        let embeddings = EmbeddingService::new(
            embedder,
            config.openai.embedding_model.clone(),
            config.openai.embedding_dimension,
        );

        Self {
            config,
            llm,
            images,
            fetcher,
            embeddings,
            index,
            executor: StepGraphExecutor::new(StepServices::new(artifacts)),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn faq_workflow(&self) -> Result<Workflow, WorkflowError> {
        faq_workflow(self.llm.clone(), &self.config.openai.chat_model)
    }

    pub fn faq_images_workflow(&self) -> Result<Workflow, WorkflowError> {
        faq_images_workflow(self.llm.clone(), &self.config.openai.chat_model, self.images.clone())
    }

    pub fn question_workflow(&self, options: &QuestionOptions) -> Result<Workflow, WorkflowError> {
        let retrieval = &self.config.retrieval;
        let utility_model = &self.config.openai.utility_model;

        let mut retriever = RetrievalOrchestrator::new(
            self.fetcher.clone(),
            Arc::new(HtmlStructureChunker::new()),
            self.embeddings.clone(),
            self.index.clone(),
        )
        .with_metric(self.config.vector_store.metric)
        .with_fetch_timeout(Duration::from_millis(retrieval.fetch_timeout_ms))
        .with_top_k(options.top_k.unwrap_or(retrieval.top_k));

        if let Some(reranker) = self.reranker(options.rerank) {
            retriever = retriever.with_reranker(reranker);
        }

        question_workflow(
            Arc::new(LlmAgentRouter::from_provider(self.llm.clone(), utility_model)),
            Arc::new(retriever),
            Arc::new(AgentAnswerGenerator::from_provider(
                self.llm.clone(),
                &self.config.openai.chat_model,
            )),
        )
    }

    fn reranker(&self, mode: RerankMode) -> Option<Arc<dyn Reranker>> {
        let retrieval = &self.config.retrieval;

        match mode {
            RerankMode::None => None,
            RerankMode::Threshold => {
                let mut reranker = ThresholdReranker::new(retrieval.rerank_min_score);
                if let Some(max) = retrieval.rerank_max_results {
                    reranker = reranker.with_max_results(max);
                }
                Some(Arc::new(reranker))
            }
            RerankMode::Llm => Some(Arc::new(
                LlmReranker::from_provider(self.llm.clone(), &self.config.openai.utility_model)
                    .with_threshold(retrieval.llm_rerank_threshold),
            )),
        }
    }

    /// Run a workflow on the shared executor
    pub async fn run(&self, workflow: &Workflow, trigger: Value) -> Result<WorkflowOutcome, WorkflowError> {
        self.executor.run(workflow, trigger).await
    }
}

/// Wire the OpenAI providers, HTTP fetcher, vector store and filesystem artifacts
pub fn create_services(
    config: &AppConfig,
    vector_store: Option<VectorStoreKind>,
) -> anyhow::Result<AppServices> {
    let openai = &config.openai;
    if openai.api_key.trim().is_empty() {
        anyhow::bail!("OPENAI_API_KEY is not set");
    }

    let http = HttpClient::with_timeout(Duration::from_secs(openai.request_timeout_secs))?;

    let llm = Arc::new(OpenAiProvider::with_base_url(
        http.clone(),
        openai.api_key.clone(),
        openai.base_url.clone(),
    ));
    let images = Arc::new(
        OpenAiImageProvider::with_base_url(http.clone(), openai.api_key.clone(), openai.base_url.clone())
            .with_model(openai.image_model.clone()),
    );
    let embedder = Arc::new(OpenAiEmbeddingProvider::with_base_url(
        http,
        openai.api_key.clone(),
        openai.base_url.clone(),
    ));

    let index: Arc<dyn VectorIndex> = match resolve_vector_store(config, vector_store) {
        VectorStoreKind::Memory => {
            info!("Using in-memory vector index");
            Arc::new(InMemoryVectorIndex::new())
        }
        VectorStoreKind::Postgres => {
            info!("Using pgvector index");
            Arc::new(PgVectorIndex::connect_lazy(&config.vector_store.connection_string))
        }
    };

    let artifacts = Arc::new(FileSystemArtifactStore::new(PathBuf::from(
        &config.artifacts.output_dir,
    )));

    Ok(AppServices::new(
        config.clone(),
        llm,
        images,
        embedder,
        Arc::new(HttpContentFetcher::new()?),
        index,
        artifacts,
    ))
}
