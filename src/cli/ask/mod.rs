//! Ask command - answer a question through routing, retrieval and generation

use clap::Args;
use serde_json::json;
use tracing::info;

use crate::infrastructure::workflow::question::QUESTION_FIELD;
use crate::{QuestionOptions, RerankMode, VectorStoreKind};

/// Arguments for the ask command
#[derive(Args, Clone, Debug)]
pub struct AskArgs {
    /// Question to answer
    pub question: String,

    /// Number of chunks to retrieve (overrides config)
    #[arg(long)]
    pub top_k: Option<usize>,

    /// Re-ranking applied to retrieved chunks
    #[arg(long, value_enum, default_value_t = RerankMode::None)]
    pub rerank: RerankMode,

    /// Vector store to index into (defaults to postgres when configured)
    #[arg(long, value_enum)]
    pub vector_store: Option<VectorStoreKind>,
}

pub async fn run(args: AskArgs) -> anyhow::Result<()> {
    let config = super::bootstrap();

    let services = crate::create_services(&config, args.vector_store)?;
    let workflow = services.question_workflow(&QuestionOptions {
        top_k: args.top_k,
        rerank: args.rerank,
    })?;

    info!(rerank = ?args.rerank, top_k = ?args.top_k, "Answering question");

    let outcome = services
        .run(&workflow, json!({ QUESTION_FIELD: args.question }))
        .await?;

    super::print_result(&outcome.result)
}
