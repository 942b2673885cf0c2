//! User configuration loaded from TOML.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use clai_monitor::config::DEFAULT_DEBOUNCE_SECS;

/// Settings for the chat model backend.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Model name.
    pub model: String,

    /// Ollama server URL. `None` uses `OLLAMA_HOST` or the local default.
    pub base_url: Option<String>,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: clai_llm::DEFAULT_MODEL.to_string(),
            base_url: None,
        }
    }
}

/// Settings for `clai monitor`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MonitorSettings {
    /// Quiet period in seconds.
    pub debounce_secs: f64,

    /// Ignore patterns. Empty means the built-in set.
    pub ignore_patterns: Vec<String>,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            debounce_secs: DEFAULT_DEBOUNCE_SECS,
            ignore_patterns: Vec::new(),
        }
    }
}

/// Complete clai configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClaiConfig {
    pub llm: LlmSettings,
    pub monitor: MonitorSettings,
}

impl ClaiConfig {
    /// Default config file location.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("clai").join("config.toml"))
    }

    /// Load the config.
    ///
    /// An explicit path must exist. Without one, the default location is
    /// read when present and built-in defaults are used otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::from_file(&path),
                _ => {
                    debug!("No config file found; using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    /// Read and parse a config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_toml(&text)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse a config from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Apply command-line overrides.
    pub fn with_overrides(mut self, model: Option<String>, base_url: Option<String>) -> Self {
        if let Some(model) = model {
            self.llm.model = model;
        }
        if base_url.is_some() {
            self.llm.base_url = base_url;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = ClaiConfig::default();
        assert_eq!(config.llm.model, "llama3.2");
        assert_eq!(config.llm.base_url, None);
        assert_eq!(config.monitor.debounce_secs, 2.0);
        assert!(config.monitor.ignore_patterns.is_empty());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = ClaiConfig::from_toml(
            r#"
            [monitor]
            ignore_patterns = ["target", ".lock"]
            "#,
        )
        .unwrap();

        assert_eq!(config.llm, LlmSettings::default());
        assert_eq!(config.monitor.debounce_secs, 2.0);
        assert_eq!(config.monitor.ignore_patterns, vec!["target", ".lock"]);
    }

    #[test]
    fn test_full_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
            [llm]
            model = "codellama"
            base_url = "http://gpu-box:11434"

            [monitor]
            debounce_secs = 0.5
            "#,
        )
        .unwrap();

        let config = ClaiConfig::load(Some(&path)).unwrap();
        assert_eq!(config.llm.model, "codellama");
        assert_eq!(config.llm.base_url.as_deref(), Some("http://gpu-box:11434"));
        assert_eq!(config.monitor.debounce_secs, 0.5);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = ClaiConfig::load(Some(&temp_dir.path().join("absent.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(ClaiConfig::from_toml("[monitor]\ndebounce_secs = \"soon\"").is_err());
    }

    #[test]
    fn test_overrides() {
        let config = ClaiConfig::default()
            .with_overrides(Some("mistral".to_string()), None)
            .with_overrides(None, Some("http://other:11434".to_string()));

        assert_eq!(config.llm.model, "mistral");
        assert_eq!(config.llm.base_url.as_deref(), Some("http://other:11434"));
    }
}
