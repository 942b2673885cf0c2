//! clai - a command-line assistant that summarizes, visualizes, documents
//! and watches codebases with a local LLM.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod cmd;
mod config;
mod render;

use cli::{Cli, Commands, MonitorCommands};
use cmd::monitor::StartOptions;
use config::ClaiConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = ClaiConfig::load(cli.config.as_deref())?.with_overrides(cli.model, cli.ollama_url);

    match cli.command {
        Commands::Monitor(MonitorCommands::Start {
            path,
            debounce,
            ignore,
        }) => {
            cmd::monitor::start(
                &config,
                StartOptions {
                    path,
                    debounce,
                    ignore,
                },
            )
            .await
        }
        Commands::Tree { path, max_depth } => cmd::tree::run(&path, max_depth),
        Commands::Export {
            path,
            output,
            max_depth,
        } => cmd::export::run(&path, &output, max_depth),
        Commands::Visualize { path, output } => cmd::visualize::run(&path, &output),
        Commands::Summarize { path, max_depth } => {
            cmd::summarize::run(&config, &path, max_depth).await
        }
        Commands::Docs { path, output } => cmd::docs::run(&config, &path, output.as_deref()).await,
    }
}

/// Log to stderr; `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
