//! The debounced change monitor.
//!
//! `ChangeMonitor` owns the pending-change table and runs as a single task:
//! it ingests file events, waits out each path's debounce window and spawns
//! one analysis per coalesced change. Analyses of different paths may run at
//! the same time; analyses of the same path never overlap.

use std::collections::HashSet;
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use futures::{FutureExt, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

use clai_llm::{ChangeAnalyzer, ChangeKind};

use crate::config::MonitorConfig;
use crate::debounce::{Debouncer, Recorded};
use crate::error::Result;
use crate::event::{FileEvent, MonitorEvent};
use crate::ignore::IgnoreRules;

/// Debounced monitor driving a change analyzer.
pub struct ChangeMonitor<A> {
    /// Which paths are eligible.
    rules: IgnoreRules,

    /// Pending changes and their timers.
    debouncer: Debouncer,

    /// Analyzer invoked once per coalesced change.
    analyzer: Arc<A>,

    /// Where notifications go.
    observer: mpsc::UnboundedSender<MonitorEvent>,

    /// Paths with an analysis currently running.
    in_flight: HashSet<PathBuf>,

    /// Running analyses; each resolves to its path.
    analyses: JoinSet<PathBuf>,
}

impl<A: ChangeAnalyzer + 'static> ChangeMonitor<A> {
    /// Create a monitor.
    pub fn new(
        rules: IgnoreRules,
        debounce: Duration,
        analyzer: A,
        observer: mpsc::UnboundedSender<MonitorEvent>,
    ) -> Self {
        Self {
            rules,
            debouncer: Debouncer::new(debounce),
            analyzer: Arc::new(analyzer),
            observer,
            in_flight: HashSet::new(),
            analyses: JoinSet::new(),
        }
    }

    /// Create a monitor from a session config.
    pub fn from_config(
        config: &MonitorConfig,
        analyzer: A,
        observer: mpsc::UnboundedSender<MonitorEvent>,
    ) -> Result<Self> {
        Ok(Self::new(
            config.ignore_rules(),
            config.debounce()?,
            analyzer,
            observer,
        ))
    }

    /// Check if a path is eligible for monitoring.
    pub fn is_ignored(&self, path: &Path) -> bool {
        self.rules.is_ignored(path)
    }

    /// Run until `cancel` fires, or until `events` closes and all pending
    /// work has finished.
    ///
    /// Cancellation abandons pending changes and aborts running analyses.
    pub async fn run(mut self, mut events: mpsc::Receiver<FileEvent>, cancel: CancellationToken) {
        info!(
            "Change monitor started (debounce {:?})",
            self.debouncer.window()
        );
        let mut events_open = true;

        loop {
            if !events_open && self.debouncer.is_empty() && self.analyses.is_empty() {
                debug!("Event source closed and all changes handled");
                break;
            }

            tokio::select! {
                biased;

                _ = cancel.cancelled() => {
                    info!(
                        "Stop requested; abandoning {} pending changes and {} running analyses",
                        self.debouncer.len(),
                        self.analyses.len()
                    );
                    break;
                }

                Some(path) = self.debouncer.next_due() => self.on_due(path),

                Some(joined) = self.analyses.join_next() => match joined {
                    Ok(path) => self.on_finished(path),
                    Err(e) => error!("Analysis task failed to join: {e}"),
                },

                event = events.recv(), if events_open => match event {
                    Some(event) => self.on_event(event),
                    None => {
                        debug!("Event source closed");
                        events_open = false;
                    }
                },

                else => break,
            }
        }

        self.debouncer.clear();
        self.analyses.abort_all();
        info!("Change monitor stopped");
    }

    /// Ingest one raw event.
    fn on_event(&mut self, event: FileEvent) {
        let FileEvent { kind, path, .. } = event;

        if self.rules.is_ignored(&path) {
            trace!("Ignoring {kind} event for {}", path.display());
            return;
        }

        match self.debouncer.record(path.clone(), kind, Instant::now()) {
            Recorded::Scheduled => debug!(
                "Scheduled analysis of {} in {:?}",
                path.display(),
                self.debouncer.window()
            ),
            Recorded::Refreshed => debug!("Refreshed pending {kind} for {}", path.display()),
        }

        self.emit(MonitorEvent::ChangeDetected { path, kind });
    }

    /// A path's debounce window closed.
    fn on_due(&mut self, path: PathBuf) {
        if self.in_flight.contains(&path) {
            debug!(
                "Analysis of {} still running; deferring next one",
                path.display()
            );
            return;
        }

        if let Some(change) = self.debouncer.take_due(&path) {
            self.launch(path, change.kind);
        }
    }

    /// An analysis finished; start the next one for the path if it is due.
    fn on_finished(&mut self, path: PathBuf) {
        self.in_flight.remove(&path);

        if let Some(change) = self.debouncer.take_due(&path) {
            self.launch(path, change.kind);
        }
    }

    fn launch(&mut self, path: PathBuf, kind: ChangeKind) {
        info!("Analyzing {kind} file {}", path.display());
        self.in_flight.insert(path.clone());

        let analyzer = Arc::clone(&self.analyzer);
        let observer = self.observer.clone();

        self.analyses.spawn(async move {
            let outcome =
                AssertUnwindSafe(analyze(analyzer.as_ref(), &path, kind, &observer))
                    .catch_unwind()
                    .await;

            if outcome.is_err() {
                error!("Analyzer panicked while handling {}", path.display());
                emit(
                    &observer,
                    MonitorEvent::AnalysisError {
                        path: path.clone(),
                        message: "analyzer panicked".to_string(),
                    },
                );
            }

            path
        });
    }

    fn emit(&self, event: MonitorEvent) {
        emit(&self.observer, event);
    }
}

/// Run one analysis and stream its output to the observer.
async fn analyze<A: ChangeAnalyzer + ?Sized>(
    analyzer: &A,
    path: &Path,
    kind: ChangeKind,
    observer: &mpsc::UnboundedSender<MonitorEvent>,
) {
    emit(
        observer,
        MonitorEvent::AnalysisStarted {
            path: path.to_path_buf(),
            kind,
        },
    );

    let mut fragments = match analyzer.analyze(path, kind).await {
        Ok(fragments) => fragments,
        Err(e) => {
            warn!("Error analyzing {}: {e}", path.display());
            emit(
                observer,
                MonitorEvent::AnalysisError {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                },
            );
            return;
        }
    };

    while let Some(fragment) = fragments.next().await {
        match fragment {
            Ok(text) => emit(
                observer,
                MonitorEvent::AnalysisChunk {
                    path: path.to_path_buf(),
                    text,
                },
            ),
            Err(e) => {
                warn!("Analysis stream for {} failed: {e}", path.display());
                emit(
                    observer,
                    MonitorEvent::AnalysisError {
                        path: path.to_path_buf(),
                        message: e.to_string(),
                    },
                );
                return;
            }
        }
    }

    emit(
        observer,
        MonitorEvent::AnalysisFinished {
            path: path.to_path_buf(),
        },
    );
}

fn emit(observer: &mpsc::UnboundedSender<MonitorEvent>, event: MonitorEvent) {
    if observer.send(event).is_err() {
        trace!("Observer dropped; discarding monitor event");
    }
}
