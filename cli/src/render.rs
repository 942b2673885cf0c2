//! Terminal rendering of monitor events.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use owo_colors::OwoColorize;

use clai_monitor::MonitorEvent;

const RULE_WIDTH: usize = 50;

/// Turns monitor events into terminal text.
///
/// One analysis at a time streams live; its fragments are written without
/// line breaks so the model's output reads as it arrives. Analyses that start
/// while another is streaming are held back in start order. A held analysis
/// is written as one block when it ends, or goes live once the streaming one
/// is done.
#[derive(Debug)]
pub struct MonitorPrinter {
    color: bool,
    live: Option<PathBuf>,
    held: Vec<(PathBuf, String)>,
}

impl MonitorPrinter {
    pub fn new(color: bool) -> Self {
        Self {
            color,
            live: None,
            held: Vec::new(),
        }
    }

    /// Render one event observed now.
    pub fn render(&mut self, event: &MonitorEvent) -> String {
        self.render_at(event, Local::now())
    }

    /// Render one event observed at `now`.
    pub fn render_at(&mut self, event: &MonitorEvent, now: DateTime<Local>) -> String {
        match event {
            MonitorEvent::ChangeDetected { path, kind } => {
                format!("📝 Detected {kind}: {}\n", self.path(path))
            }
            MonitorEvent::AnalysisStarted { path, kind } => {
                let timestamp = now.format("%Y-%m-%d %H:%M:%S");
                let header = format!(
                    "\n🔍 [{timestamp}] Analyzing {kind} file: {}\n📊 Analysis Result:\n{}\n",
                    self.path(Path::new(file_name(path))),
                    rule()
                );
                if self.live.is_none() {
                    self.live = Some(path.clone());
                    header
                } else {
                    self.held.push((path.clone(), header));
                    String::new()
                }
            }
            MonitorEvent::AnalysisChunk { path, text } => {
                if let Some(buffer) = self.held_mut(path) {
                    buffer.push_str(text);
                    String::new()
                } else {
                    text.clone()
                }
            }
            MonitorEvent::AnalysisFinished { path } => {
                let footer = format!(
                    "\n{}\n{}\n\n",
                    rule(),
                    self.ok("✅ Monitoring continues...")
                );
                self.close(path, footer)
            }
            MonitorEvent::AnalysisError { path, message } => {
                let line = format!("❌ Error analyzing {}: {message}", path.display());
                let footer = format!("{}\n", self.error(&line));
                if self.is_open(path) {
                    self.close(path, format!("\n{footer}"))
                } else {
                    footer
                }
            }
        }
    }

    fn is_open(&self, path: &Path) -> bool {
        self.live.as_deref() == Some(path) || self.held.iter().any(|(p, _)| p == path)
    }

    fn held_mut(&mut self, path: &Path) -> Option<&mut String> {
        self.held
            .iter_mut()
            .find(|(p, _)| p == path)
            .map(|(_, buffer)| buffer)
    }

    /// End the analysis of `path` with `footer`.
    ///
    /// A held analysis is written out whole. When the live one ends, the
    /// oldest held analysis goes live with everything buffered so far.
    fn close(&mut self, path: &Path, footer: String) -> String {
        if let Some(index) = self.held.iter().position(|(p, _)| p == path) {
            let (_, mut block) = self.held.remove(index);
            block.push_str(&footer);
            return block;
        }

        let mut out = footer;
        if self.live.as_deref() == Some(path) {
            self.live = None;
            if !self.held.is_empty() {
                let (next, buffer) = self.held.remove(0);
                out.push_str(&buffer);
                self.live = Some(next);
            }
        }
        out
    }

    fn path(&self, path: &Path) -> String {
        if self.color {
            path.display().cyan().to_string()
        } else {
            path.display().to_string()
        }
    }

    fn ok(&self, text: &str) -> String {
        if self.color {
            text.green().to_string()
        } else {
            text.to_string()
        }
    }

    fn error(&self, text: &str) -> String {
        if self.color {
            text.red().to_string()
        } else {
            text.to_string()
        }
    }
}

fn rule() -> String {
    "-".repeat(RULE_WIDTH)
}

fn file_name(path: &Path) -> &str {
    path.file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default()
}
