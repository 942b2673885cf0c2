//! Per-path debouncing.
//!
//! Each path with a recent change owns one `PendingChange` and one timer.
//! A new event for a pending path overwrites its kind and pushes its timer
//! back, so a burst of edits produces a single due change once the path has
//! been quiet for a full window.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::{Path, PathBuf};
use std::time::Duration;

use futures::StreamExt;
use tokio::time::Instant;
use tokio_util::time::DelayQueue;
use tokio_util::time::delay_queue::Key;

use clai_llm::ChangeKind;

/// Longest supported quiet period.
pub const MAX_WINDOW: Duration = Duration::from_secs(24 * 60 * 60);

/// A change waiting out its debounce window.
#[derive(Debug, Clone)]
pub struct PendingChange {
    /// Most recent kind observed for the path.
    pub kind: ChangeKind,

    /// When the most recent event for the path arrived.
    pub last_event: Instant,

    /// Timer handle; `None` once the window has closed.
    timer: Option<Key>,
}

impl PendingChange {
    /// Whether the debounce window has closed.
    pub fn is_due(&self) -> bool {
        self.timer.is_none()
    }
}

/// Outcome of recording an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recorded {
    /// First event for the path; a new window was opened.
    Scheduled,

    /// The path was already pending; its kind and window were refreshed.
    Refreshed,
}

/// Table of pending changes plus their timers.
///
/// At most one entry exists per path. An entry leaves the table only through
/// `take_due`, after its window has closed.
pub struct Debouncer {
    window: Duration,
    pending: HashMap<PathBuf, PendingChange>,
    timers: DelayQueue<PathBuf>,
}

impl Debouncer {
    /// Create a debouncer with the given quiet period, capped at
    /// [`MAX_WINDOW`].
    pub fn new(window: Duration) -> Self {
        Self {
            window: window.min(MAX_WINDOW),
            pending: HashMap::new(),
            timers: DelayQueue::new(),
        }
    }

    /// Quiet period.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Number of pending paths.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Check if nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Look up the pending change for a path.
    pub fn get(&self, path: &Path) -> Option<&PendingChange> {
        self.pending.get(path)
    }

    /// Record an event for `path` observed at `at`.
    ///
    /// The path's window closes `window` after the latest event. A due entry
    /// that is still waiting to be taken gets a fresh window as well.
    pub fn record(&mut self, path: PathBuf, kind: ChangeKind, at: Instant) -> Recorded {
        let deadline = at.checked_add(self.window).unwrap_or(at);

        match self.pending.entry(path) {
            Entry::Occupied(mut entry) => {
                let path = entry.key().clone();
                let change = entry.get_mut();
                change.kind = kind;
                change.last_event = at;

                match change.timer.as_ref() {
                    Some(key) => self.timers.reset_at(key, deadline),
                    None => change.timer = Some(self.timers.insert_at(path, deadline)),
                }

                Recorded::Refreshed
            }
            Entry::Vacant(entry) => {
                let key = self.timers.insert_at(entry.key().clone(), deadline);
                entry.insert(PendingChange {
                    kind,
                    last_event: at,
                    timer: Some(key),
                });

                Recorded::Scheduled
            }
        }
    }

    /// Wait for the next window to close and mark that path due.
    ///
    /// Returns `None` right away when no timer is running.
    pub async fn next_due(&mut self) -> Option<PathBuf> {
        let expired = self.timers.next().await?;
        let path = expired.into_inner();

        if let Some(change) = self.pending.get_mut(&path) {
            change.timer = None;
        }

        Some(path)
    }

    /// Remove and return the change for `path` if its window has closed.
    pub fn take_due(&mut self, path: &Path) -> Option<PendingChange> {
        match self.pending.get(path) {
            Some(change) if change.is_due() => self.pending.remove(path),
            _ => None,
        }
    }

    /// Drop every pending change and timer.
    pub fn clear(&mut self) {
        self.pending.clear();
        self.timers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn path(p: &str) -> PathBuf {
        PathBuf::from(p)
    }

    /// Timers round up to the next millisecond tick.
    fn assert_elapsed(start: Instant, secs: u64) {
        let elapsed = start.elapsed();
        let expected = Duration::from_secs(secs);
        assert!(
            elapsed >= expected && elapsed < expected + Duration::from_millis(10),
            "elapsed {elapsed:?}, expected about {expected:?}"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_event_due_after_window() {
        let mut debouncer = Debouncer::new(Duration::from_secs(2));
        let start = Instant::now();

        let recorded = debouncer.record(path("/proj/a.py"), ChangeKind::Modified, start);
        assert_eq!(recorded, Recorded::Scheduled);
        assert!(!debouncer.get(Path::new("/proj/a.py")).unwrap().is_due());
        assert!(debouncer.take_due(Path::new("/proj/a.py")).is_none());

        let due = debouncer.next_due().await.unwrap();
        assert_eq!(due, path("/proj/a.py"));
        assert_elapsed(start, 2);

        let change = debouncer.take_due(&due).unwrap();
        assert_eq!(change.kind, ChangeKind::Modified);
        assert!(debouncer.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_pushes_window_back_and_keeps_latest_kind() {
        let mut debouncer = Debouncer::new(Duration::from_secs(2));
        let start = Instant::now();

        debouncer.record(path("/proj/a.py"), ChangeKind::Created, start);
        tokio::time::sleep(Duration::from_secs(1)).await;
        let recorded = debouncer.record(path("/proj/a.py"), ChangeKind::Modified, Instant::now());
        assert_eq!(recorded, Recorded::Refreshed);
        assert_eq!(debouncer.len(), 1);

        let due = debouncer.next_due().await.unwrap();
        assert_elapsed(start, 3);

        let change = debouncer.take_due(&due).unwrap();
        assert_eq!(change.kind, ChangeKind::Modified);
    }

    #[tokio::test(start_paused = true)]
    async fn test_paths_debounce_independently() {
        let mut debouncer = Debouncer::new(Duration::from_secs(2));
        let start = Instant::now();

        debouncer.record(path("/proj/a.py"), ChangeKind::Modified, start);
        debouncer.record(
            path("/proj/b.rs"),
            ChangeKind::Created,
            start + Duration::from_secs(1),
        );

        assert_eq!(debouncer.next_due().await.unwrap(), path("/proj/a.py"));
        assert_eq!(debouncer.next_due().await.unwrap(), path("/proj/b.rs"));
        assert_elapsed(start, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_due_entry_refreshed_gets_new_window() {
        let mut debouncer = Debouncer::new(Duration::from_secs(2));

        debouncer.record(path("/proj/a.py"), ChangeKind::Modified, Instant::now());
        let due = debouncer.next_due().await.unwrap();
        assert!(debouncer.get(&due).unwrap().is_due());

        // Not taken yet (e.g. a previous analysis is still running).
        debouncer.record(path("/proj/a.py"), ChangeKind::Created, Instant::now());
        assert!(!debouncer.get(&due).unwrap().is_due());
        assert!(debouncer.take_due(&due).is_none());

        let due = debouncer.next_due().await.unwrap();
        assert_eq!(debouncer.take_due(&due).unwrap().kind, ChangeKind::Created);
    }

    #[tokio::test]
    async fn test_next_due_on_empty_returns_none() {
        let mut debouncer = Debouncer::new(Duration::from_secs(2));
        assert!(debouncer.next_due().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_drops_everything() {
        let mut debouncer = Debouncer::new(Duration::from_secs(2));
        debouncer.record(path("/proj/a.py"), ChangeKind::Modified, Instant::now());
        debouncer.clear();

        assert!(debouncer.is_empty());
        assert!(debouncer.next_due().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_oversized_window_is_capped() {
        let mut debouncer = Debouncer::new(Duration::from_secs_f64(1e19));
        assert_eq!(debouncer.window(), MAX_WINDOW);

        let start = Instant::now();
        debouncer.record(path("/proj/a.py"), ChangeKind::Modified, start);

        assert_eq!(debouncer.next_due().await.unwrap(), path("/proj/a.py"));
        assert_elapsed(start, MAX_WINDOW.as_secs());
    }
}
