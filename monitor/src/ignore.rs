//! Ignore rules deciding which paths are eligible for monitoring.
//!
//! A path is ignored when any pattern occurs as a substring of its string
//! form, when a pattern equals its suffix (`.pyc`), or when its suffix is not
//! one of the recognized source-code extensions.

use std::path::Path;

/// Patterns used when a session configures none.
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[
    ".git",
    "__pycache__",
    ".pyc",
    ".log",
    ".tmp",
    "node_modules",
    ".env",
    ".DS_Store",
    ".vscode",
    ".idea",
];

/// Suffixes of files worth analyzing. Compared case-insensitively.
pub const CODE_EXTENSIONS: &[&str] = &[
    ".py", ".js", ".ts", ".jsx", ".tsx", ".java", ".cpp", ".c", ".h", ".cs", ".php", ".rb", ".go",
    ".rs", ".swift", ".kt", ".scala", ".sql", ".yaml", ".yml", ".json", ".xml", ".html", ".css",
    ".scss",
];

/// Fixed set of ignore patterns for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoreRules {
    patterns: Vec<String>,
}

impl IgnoreRules {
    /// Create rules from exactly these patterns. Empty patterns are dropped.
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns: patterns
                .into_iter()
                .map(Into::into)
                .filter(|p: &String| !p.is_empty())
                .collect(),
        }
    }

    /// Create rules from configured patterns, falling back to the defaults
    /// when none are given.
    pub fn from_patterns<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let rules = Self::new(patterns);
        if rules.patterns.is_empty() {
            Self::default()
        } else {
            rules
        }
    }

    /// Configured patterns.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Check if a path should be ignored.
    pub fn is_ignored(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();
        let suffix = suffix(path);

        if self
            .patterns
            .iter()
            .any(|pattern| path_str.contains(pattern.as_str()) || suffix == *pattern)
        {
            return true;
        }

        !is_code_suffix(&suffix)
    }
}

impl Default for IgnoreRules {
    fn default() -> Self {
        Self::new(DEFAULT_IGNORE_PATTERNS.iter().copied())
    }
}

/// Extension with its leading dot, or an empty string.
fn suffix(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}

fn is_code_suffix(suffix: &str) -> bool {
    let lower = suffix.to_lowercase();
    CODE_EXTENSIONS.contains(&lower.as_str())
}
