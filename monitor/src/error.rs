//! Error types for the change monitor.

use thiserror::Error;

/// Result type alias for monitor operations.
pub type Result<T> = std::result::Result<T, MonitorError>;

/// Errors that can occur while setting up or running the monitor.
///
/// Only startup problems surface through this type. Failures while analyzing
/// a single change are reported to the observer instead.
#[derive(Error, Debug)]
pub enum MonitorError {
    /// Directory not found.
    #[error("directory not found: {0}")]
    DirectoryNotFound(String),

    /// Watched path exists but is not a directory.
    #[error("not a directory: {0}")]
    NotADirectory(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Notify error.
    #[error("notify error: {0}")]
    Notify(#[from] notify::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
