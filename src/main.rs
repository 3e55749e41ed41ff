use clap::Parser;
use agent_pipelines::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Faq(args) => cli::faq::run(args, false).await,
        Command::FaqImages(args) => cli::faq::run(args, true).await,
        Command::Ask(args) => cli::ask::run(args).await,
    }
}
