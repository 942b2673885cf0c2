//! Command implementations.

pub mod docs;
pub mod export;
pub mod monitor;
pub mod summarize;
pub mod tree;
pub mod visualize;

use std::io::Write;

use anyhow::{Context, Result};
use futures::StreamExt;

use clai_llm::{ChatModel, ChatRequest, OllamaClient};

use crate::config::LlmSettings;

/// Build the chat model client from the resolved settings.
pub fn chat_model(settings: &LlmSettings) -> Result<OllamaClient> {
    let client = match &settings.base_url {
        Some(base_url) => OllamaClient::with_base_url(settings.model.as_str(), base_url.as_str()),
        None => OllamaClient::new(settings.model.as_str()),
    };
    client.context("Invalid model backend configuration")
}

/// Stream a reply to stdout as it arrives.
pub async fn print_reply(model: &impl ChatModel, request: ChatRequest) -> Result<()> {
    let mut stream = model
        .chat_stream(request)
        .await
        .with_context(|| format!("Request to {} failed", model.name()))?;

    let mut stdout = std::io::stdout();
    while let Some(fragment) = stream.next().await {
        let fragment = fragment.context("Model stream failed")?;
        write!(stdout, "{fragment}")?;
        stdout.flush()?;
    }
    writeln!(stdout)?;
    Ok(())
}
