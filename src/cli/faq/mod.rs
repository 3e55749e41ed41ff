//! FAQ commands - run the `faq` or `faq-images` workflow on a PRD file

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use serde_json::json;
use tracing::info;

use crate::infrastructure::workflow::faq::PRD_CONTENT_FIELD;

/// Arguments for the FAQ commands
#[derive(Args, Clone, Debug)]
pub struct FaqArgs {
    /// Path to the product requirements document
    #[arg(long)]
    pub prd: PathBuf,
}

/// Run the FAQ workflow, optionally followed by image generation
pub async fn run(args: FaqArgs, with_images: bool) -> anyhow::Result<()> {
    let config = super::bootstrap();

    let prd = tokio::fs::read_to_string(&args.prd)
        .await
        .with_context(|| format!("failed to read PRD from {}", args.prd.display()))?;

    let services = crate::create_services(&config, None)?;
    let workflow = if with_images {
        services.faq_images_workflow()?
    } else {
        services.faq_workflow()?
    };

    info!(workflow = %workflow.id(), prd = %args.prd.display(), "Running FAQ workflow");

    let outcome = services
        .run(&workflow, json!({ PRD_CONTENT_FIELD: prd }))
        .await?;

    super::print_result(&outcome.result)
}
