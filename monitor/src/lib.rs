//! # Change Monitor
//!
//! This crate watches a codebase for file changes and narrates each change
//! through an LLM-backed analyzer.
//!
//! ## Features
//!
//! - **Real-time Watching**: Recursive file-system notifications
//! - **Ignore Rules**: Skip build output, VCS metadata and non-code files
//! - **Debouncing**: Bursts of edits to one file collapse into one analysis
//! - **Streaming Analysis**: Analyzer output reaches the observer as it arrives
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      Change Monitor                             │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  FsWatcher ──► FileEvent ──► ChangeMonitor ──► MonitorEvent     │
//! │                                  │                              │
//! │                                  ▼                              │
//! │                  IgnoreRules  Debouncer  ChangeAnalyzer         │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod debounce;
pub mod error;
pub mod event;
pub mod ignore;
pub mod monitor;
pub mod watcher;

pub use clai_llm::{ChangeAnalyzer, ChangeKind};
pub use config::MonitorConfig;
pub use debounce::{Debouncer, PendingChange, Recorded};
pub use error::{MonitorError, Result};
pub use event::{FileEvent, MonitorEvent};
pub use ignore::IgnoreRules;
pub use monitor::ChangeMonitor;
pub use watcher::FsWatcher;
