//! Summarize the codebase from its structure.

use std::path::Path;

use anyhow::{Context, Result};
use clai_llm::prompts;
use owo_colors::OwoColorize;
use tracing::debug;

use crate::cmd::{chat_model, print_reply};
use crate::config::ClaiConfig;

pub async fn run(config: &ClaiConfig, path: &Path, max_depth: Option<usize>) -> Result<()> {
    let structure = clai_structure::structure_json(path, max_depth)
        .with_context(|| format!("Failed to scan {}", path.display()))?;
    let request =
        prompts::structure_summary(&structure).context("Failed to encode project structure")?;
    debug!("Structure prompt has {} messages", request.messages.len());

    let model = chat_model(&config.llm)?;
    println!("{}", "Creating codebase summary now.".bold());
    print_reply(&model, request).await
}
