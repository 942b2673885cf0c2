//! Prompt construction.
//!
//! Every prompt is a system message describing the assistant's job followed
//! by a single user message carrying the material to work on.

use std::path::Path;

use crate::analyzer::ChangeKind;
use crate::provider::{ChatMessage, ChatRequest};

const CHANGE_ANALYSIS_SYSTEM: &str = "You are a code analysis assistant monitoring a codebase. \
Analyze file changes and provide concise insights about:
1. What changed or was added
2. Potential impact on the codebase
3. Any concerns or suggestions
Keep responses brief but informative.";

const STRUCTURE_SUMMARY_SYSTEM: &str =
    "You are a helpful assistant analyzing project structures.";

const MARKDOWN_DOCS_SYSTEM: &str = "You are an expert technical writer. Your task is to generate \
clear and concise markdown documentation for the provided source code files. Analyze the code \
and produce documentation in a technical documentation style. Focus on explaining the purpose \
of the code, its components, and how they work together.";

/// Ask for the likely impact of a changed file.
pub fn change_analysis(path: &Path, kind: ChangeKind, content: &str) -> ChatRequest {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let user = format!(
        "A file was {kind}:\nFile: {name}\nPath: {}\n\nContent:\n{content}\n\n\
         Please analyze this change and provide insights.",
        path.display()
    );

    ChatRequest::new(vec![
        ChatMessage::system(CHANGE_ANALYSIS_SYSTEM),
        ChatMessage::user(user),
    ])
    .with_temperature(0.1)
}

/// Ask for a summary of a project's directory structure.
pub fn structure_summary(structure: &serde_json::Value) -> serde_json::Result<ChatRequest> {
    let json = serde_json::to_string_pretty(structure)?;
    let user = format!(
        "Analyze the following project structure JSON:\n{json}\n\nPlease provide:\n\
         1. A brief summary of what the project might be.\n\
         2. A list of main components.\n\
         3. Any concerns or unusual patterns."
    );

    Ok(ChatRequest::new(vec![
        ChatMessage::system(STRUCTURE_SUMMARY_SYSTEM),
        ChatMessage::user(user),
    ])
    .with_temperature(0.0))
}

/// Ask for markdown documentation of concatenated source files.
pub fn markdown_docs(sources: &str) -> ChatRequest {
    ChatRequest::new(vec![
        ChatMessage::system(MARKDOWN_DOCS_SYSTEM),
        ChatMessage::user(sources),
    ])
    .with_temperature(0.0)
}
