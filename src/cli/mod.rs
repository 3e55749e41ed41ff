//! CLI module for Agent Pipelines
//!
//! Provides one subcommand per workflow:
//! - `faq`: draft and review an FAQ from a PRD
//! - `faq-images`: draft an FAQ and illustrate it
//! - `ask`: answer a question from retrieved documentation

pub mod ask;
pub mod faq;

use clap::{Parser, Subcommand};
use serde_json::Value;

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Agent Pipelines - Multi-step generative agent workflows
#[derive(Parser)]
#[command(name = "agent-pipelines")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate and review an FAQ from a PRD
    Faq(faq::FaqArgs),

    /// Generate an FAQ and two illustrations for it
    FaqImages(faq::FaqArgs),

    /// Answer a question about Mastra, Rust or PostgreSQL
    Ask(ask::AskArgs),
}

/// Load `.env` and configuration, then install logging
fn bootstrap() -> AppConfig {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    logging::init_logging(&config.logging);
    config
}

fn print_result(result: &Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(result)?);
    Ok(())
}
