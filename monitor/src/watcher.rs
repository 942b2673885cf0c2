//! File-system watcher feeding the monitor.

use std::path::{Path, PathBuf};

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::config::validate_root;
use crate::error::Result;
use crate::event::{FileEvent, change_kind};

/// Capacity of the channel between the native watcher and the monitor.
const EVENT_BUFFER: usize = 1000;

/// Recursive watcher over one root directory.
pub struct FsWatcher {
    /// Watched root.
    root: PathBuf,

    /// Internal notify watcher.
    watcher: Option<RecommendedWatcher>,
}

impl FsWatcher {
    /// Start watching `root` recursively.
    ///
    /// Returns the watcher and the receiving end of its file events. Only
    /// file creations and modifications are forwarded; directory events are
    /// dropped here.
    pub fn start(root: impl Into<PathBuf>) -> Result<(Self, mpsc::Receiver<FileEvent>)> {
        let root = root.into();
        validate_root(&root)?;

        let (event_tx, event_rx) = mpsc::channel(EVENT_BUFFER);

        let mut watcher = notify::recommended_watcher(
            move |res: std::result::Result<notify::Event, notify::Error>| match res {
                Ok(event) => {
                    for file_event in file_events(event) {
                        if let Err(e) = event_tx.blocking_send(file_event) {
                            debug!("Monitor gone, dropping file event: {e}");
                        }
                    }
                }
                Err(e) => {
                    error!("Watch error: {e}");
                }
            },
        )?;

        watcher.watch(&root, RecursiveMode::Recursive)?;
        info!("Watching {}", root.display());

        Ok((
            Self {
                root,
                watcher: Some(watcher),
            },
            event_rx,
        ))
    }

    /// Watched root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Check if the watcher is running.
    pub fn is_running(&self) -> bool {
        self.watcher.is_some()
    }

    /// Stop watching. The event channel closes once the native watcher is
    /// dropped.
    pub fn stop(&mut self) {
        if let Some(mut watcher) = self.watcher.take() {
            if let Err(e) = watcher.unwatch(&self.root) {
                warn!("Failed to unwatch {}: {e}", self.root.display());
            }
            info!("Stopped watching {}", self.root.display());
        }
    }
}

impl Drop for FsWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Translate one notify event into file events the monitor accepts.
fn file_events(event: notify::Event) -> Vec<FileEvent> {
    let Some(kind) = change_kind(&event.kind) else {
        return Vec::new();
    };

    event
        .paths
        .into_iter()
        .filter(|path| !path.is_dir())
        .map(|path| FileEvent::new(kind, path))
        .collect()
}
