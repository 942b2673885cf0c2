//! Change analysis.
//!
//! A `ChangeAnalyzer` turns one changed file into a lazy, finite stream of
//! text fragments describing the change's likely impact.

use std::fmt;
use std::path::Path;
use std::pin::Pin;

use async_trait::async_trait;
use futures::{Stream, StreamExt, future, stream};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{debug, warn};

use crate::error::{LlmError, Result};
use crate::prompts;
use crate::provider::ChatModel;

/// Content longer than this many characters is truncated before submission.
pub const MAX_CONTENT_CHARS: usize = 4000;

/// Appended to truncated content.
pub const TRUNCATION_MARKER: &str = "\n... (truncated)";

/// Stream of analysis fragments.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// Kind of change that triggers an analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// File was created.
    Created,

    /// File was modified.
    Modified,
}

impl ChangeKind {
    /// Lowercase name of the kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Modified => "modified",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trait for change analyzers.
#[async_trait]
pub trait ChangeAnalyzer: Send + Sync {
    /// Analyze the current content of `path` after a change of `kind`.
    async fn analyze(&self, path: &Path, kind: ChangeKind) -> Result<FragmentStream>;
}

/// Analyzer backed by a chat model.
///
/// Failures never propagate: a missing file, an unreadable file or a broken
/// backend each come back as a single descriptive fragment.
pub struct LlmChangeAnalyzer<M> {
    model: M,
}

impl<M: ChatModel> LlmChangeAnalyzer<M> {
    /// Create an analyzer on top of a chat model.
    pub fn new(model: M) -> Self {
        Self { model }
    }

    /// Get the underlying chat model.
    pub fn model(&self) -> &M {
        &self.model
    }
}

#[async_trait]
impl<M: ChatModel> ChangeAnalyzer for LlmChangeAnalyzer<M> {
    async fn analyze(&self, path: &Path, kind: ChangeKind) -> Result<FragmentStream> {
        match fs::try_exists(path).await {
            Ok(true) => {}
            Ok(false) => {
                return Ok(single(format!(
                    "File {} no longer exists.",
                    path.display()
                )));
            }
            Err(e) => {
                warn!("Failed to check {}: {e}", path.display());
                return Ok(single(format!("Error analyzing file: {e}")));
            }
        }

        let content = match fs::read(path).await {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                warn!("Failed to read {}: {e}", path.display());
                return Ok(single(format!("Error analyzing file: {e}")));
            }
        };

        let content = truncate_content(&content);
        debug!(
            "Analyzing {kind} file {} ({} chars) with {}",
            path.display(),
            content.chars().count(),
            self.model.model()
        );

        let request = prompts::change_analysis(path, kind, &content);
        match self.model.chat_stream(request).await {
            // The first failed fragment is reported in place and ends the stream.
            Ok(fragments) => Ok(Box::pin(fragments.scan(false, |failed, fragment| {
                if *failed {
                    return future::ready(None);
                }
                let text = fragment.unwrap_or_else(|e| {
                    *failed = true;
                    format!("Error analyzing file: {e}")
                });
                future::ready(Some(Ok::<_, LlmError>(text)))
            }))),
            Err(e) => {
                warn!("Model request failed for {}: {e}", path.display());
                Ok(single(format!("Error analyzing file: {e}")))
            }
        }
    }
}

/// Cut `content` to `MAX_CONTENT_CHARS` characters, marking the cut.
pub fn truncate_content(content: &str) -> String {
    match content.char_indices().nth(MAX_CONTENT_CHARS) {
        Some((byte_index, _)) => {
            let mut truncated = content[..byte_index].to_string();
            truncated.push_str(TRUNCATION_MARKER);
            truncated
        }
        None => content.to_string(),
    }
}

fn single(fragment: String) -> FragmentStream {
    Box::pin(stream::once(async move { Ok(fragment) }))
}
