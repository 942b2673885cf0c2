//! Error types for structure scanning.

use thiserror::Error;

/// Result type alias for structure operations.
pub type Result<T> = std::result::Result<T, StructureError>;

/// Errors that can occur while scanning or exporting a project.
#[derive(Error, Debug)]
pub enum StructureError {
    /// Path not found.
    #[error("path not found: {0}")]
    NotFound(String),

    /// Path exists but is not a directory.
    #[error("not a directory: {0}")]
    NotADirectory(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory walk error.
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Graphviz rendering failed.
    #[error("graphviz error: {0}")]
    Graphviz(String),
}
