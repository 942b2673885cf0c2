//! Generate markdown documentation for source files.

use std::path::Path;

use anyhow::{Context, Result};
use clai_llm::{ChatModel, prompts};
use clai_structure::{collect_source_files, concatenate_sources};
use owo_colors::OwoColorize;
use tracing::info;

use crate::cmd::{chat_model, print_reply};
use crate::config::ClaiConfig;

pub async fn run(config: &ClaiConfig, path: &Path, output: Option<&Path>) -> Result<()> {
    let files = collect_source_files(path)
        .with_context(|| format!("Failed to collect source files under {}", path.display()))?;
    if files.is_empty() {
        println!("No code files found to document.");
        return Ok(());
    }
    info!("Documenting {} source files", files.len());

    let request = prompts::markdown_docs(&concatenate_sources(&files));
    let model = chat_model(&config.llm)?;

    match output {
        Some(output) => {
            let markdown = model
                .chat(request)
                .await
                .with_context(|| format!("Request to {} failed", model.name()))?;
            std::fs::write(output, markdown)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            println!(
                "{} {}",
                "Documentation written to".green(),
                output.display().to_string().bold()
            );
            Ok(())
        }
        None => print_reply(&model, request).await,
    }
}
