//! Configuration for a monitoring session.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::debounce::MAX_WINDOW;
use crate::error::{MonitorError, Result};
use crate::ignore::IgnoreRules;

/// Default quiet period before a change is analyzed.
pub const DEFAULT_DEBOUNCE_SECS: f64 = 2.0;

/// Configuration for one monitoring session.
///
/// Read once at session start; the monitor never mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Root directory to watch.
    pub root: PathBuf,

    /// Ignore patterns. Empty means the default set.
    pub ignore_patterns: Vec<String>,

    /// Quiet period in seconds.
    pub debounce_secs: f64,

    /// Model identifier used by the analyzer.
    pub model: String,
}

impl MonitorConfig {
    /// Create a config for `root` with default values.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ignore_patterns: Vec::new(),
            debounce_secs: DEFAULT_DEBOUNCE_SECS,
            model: clai_llm::DEFAULT_MODEL.to_string(),
        }
    }

    /// Set the quiet period in seconds.
    pub fn with_debounce_secs(mut self, secs: f64) -> Self {
        self.debounce_secs = secs;
        self
    }

    /// Add an ignore pattern.
    pub fn ignore(mut self, pattern: impl Into<String>) -> Self {
        self.ignore_patterns.push(pattern.into());
        self
    }

    /// Set the model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Quiet period as a `Duration`.
    ///
    /// Rejects negative and non-finite values and anything longer than
    /// [`MAX_WINDOW`].
    pub fn debounce(&self) -> Result<Duration> {
        let debounce = Duration::try_from_secs_f64(self.debounce_secs).map_err(|_| {
            MonitorError::Config(format!(
                "debounce must be a non-negative number of seconds, got {}",
                self.debounce_secs
            ))
        })?;

        if debounce > MAX_WINDOW {
            return Err(MonitorError::Config(format!(
                "debounce must be at most {} seconds, got {}",
                MAX_WINDOW.as_secs(),
                self.debounce_secs
            )));
        }

        Ok(debounce)
    }

    /// Ignore rules for this session.
    pub fn ignore_rules(&self) -> IgnoreRules {
        IgnoreRules::from_patterns(self.ignore_patterns.iter().cloned())
    }

    /// Check that the session can start.
    pub fn validate(&self) -> Result<()> {
        validate_root(&self.root)?;
        self.debounce()?;

        if self.model.trim().is_empty() {
            return Err(MonitorError::Config("model name is empty".to_string()));
        }

        Ok(())
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self::new(".")
    }
}

/// Check that `root` exists and is a directory.
pub(crate) fn validate_root(root: &Path) -> Result<()> {
    if !root.exists() {
        return Err(MonitorError::DirectoryNotFound(root.display().to_string()));
    }

    if !root.is_dir() {
        return Err(MonitorError::NotADirectory(root.display().to_string()));
    }

    Ok(())
}
