//! Events flowing into and out of the monitor.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use notify::event::{ModifyKind, RenameMode};
use serde::{Deserialize, Serialize};

use clai_llm::ChangeKind;

/// A raw file change reported by the watcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEvent {
    /// The kind of change.
    pub kind: ChangeKind,

    /// Path to the affected file.
    pub path: PathBuf,

    /// When the event was observed.
    pub timestamp: DateTime<Utc>,
}

impl FileEvent {
    /// Create a new file event stamped with the current time.
    pub fn new(kind: ChangeKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
            timestamp: Utc::now(),
        }
    }

    /// Shorthand for a creation event.
    pub fn created(path: impl Into<PathBuf>) -> Self {
        Self::new(ChangeKind::Created, path)
    }

    /// Shorthand for a modification event.
    pub fn modified(path: impl Into<PathBuf>) -> Self {
        Self::new(ChangeKind::Modified, path)
    }
}

/// Map a notify event kind onto the changes the monitor cares about.
///
/// Removals, metadata updates and accesses are not changes worth analyzing.
/// An editor that saves by renaming a temp file over the target produces a
/// rename-to, which counts as a fresh file.
pub fn change_kind(kind: &notify::EventKind) -> Option<ChangeKind> {
    match kind {
        notify::EventKind::Create(_) => Some(ChangeKind::Created),
        notify::EventKind::Modify(modify_kind) => match modify_kind {
            ModifyKind::Name(RenameMode::To) => Some(ChangeKind::Created),
            ModifyKind::Name(_) | ModifyKind::Metadata(_) => None,
            _ => Some(ChangeKind::Modified),
        },
        _ => None,
    }
}

/// Notification delivered to the monitor's observer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MonitorEvent {
    /// An eligible change was seen. Liveness only; may not lead to analysis.
    ChangeDetected { path: PathBuf, kind: ChangeKind },

    /// The debounce window closed and analysis begins.
    AnalysisStarted { path: PathBuf, kind: ChangeKind },

    /// One fragment of analyzer output.
    AnalysisChunk { path: PathBuf, text: String },

    /// The analyzer's output was fully drained.
    AnalysisFinished { path: PathBuf },

    /// Analysis failed; monitoring continues.
    AnalysisError { path: PathBuf, message: String },
}

impl MonitorEvent {
    /// Path the event refers to.
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::ChangeDetected { path, .. }
            | Self::AnalysisStarted { path, .. }
            | Self::AnalysisChunk { path, .. }
            | Self::AnalysisFinished { path }
            | Self::AnalysisError { path, .. } => path,
        }
    }
}
