//! # LLM
//!
//! Chat model backends and the prompts clai sends to them.
//!
//! ## Features
//!
//! - **Chat Models**: A narrow `ChatModel` trait with an Ollama implementation
//! - **Streaming**: Replies arrive as a lazy stream of text fragments
//! - **Prompts**: Change analysis, structure summaries and documentation
//! - **Change Analyzer**: Turns a changed file into an analysis stream
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         LLM Layer                               │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  ChangeAnalyzer ──► prompts ──► ChatModel ──► ChatStream        │
//! │       │                             │                           │
//! │       ▼                             ▼                           │
//! │  LlmChangeAnalyzer            OllamaClient                      │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod analyzer;
pub mod error;
pub mod ollama;
pub mod prompts;
pub mod provider;

pub use analyzer::{ChangeAnalyzer, ChangeKind, FragmentStream, LlmChangeAnalyzer};
pub use error::{LlmError, Result};
pub use ollama::OllamaClient;
pub use provider::{ChatMessage, ChatModel, ChatRequest, ChatStream, Role};

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "llama3.2";
