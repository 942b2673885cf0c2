//! Watch a project and analyze each change with the model.

use std::io::{IsTerminal, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clai_llm::LlmChangeAnalyzer;
use clai_monitor::{ChangeMonitor, FsWatcher, MonitorConfig};
use owo_colors::OwoColorize;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::cmd::chat_model;
use crate::config::{ClaiConfig, LlmSettings};
use crate::render::MonitorPrinter;

/// Options for `clai monitor start`.
#[derive(Debug, Clone)]
pub struct StartOptions {
    pub path: PathBuf,
    pub debounce: Option<f64>,
    pub ignore: Vec<String>,
}

/// Merge command-line options over the config file.
pub fn session_config(config: &ClaiConfig, options: StartOptions) -> MonitorConfig {
    let ignore_patterns = if options.ignore.is_empty() {
        config.monitor.ignore_patterns.clone()
    } else {
        options.ignore
    };

    MonitorConfig {
        root: options.path,
        ignore_patterns,
        debounce_secs: options.debounce.unwrap_or(config.monitor.debounce_secs),
        model: config.llm.model.clone(),
    }
}

/// Run the monitor until Ctrl-C.
pub async fn start(config: &ClaiConfig, options: StartOptions) -> Result<()> {
    let session = session_config(config, options);
    session.validate().context("Cannot start monitoring")?;

    let model = chat_model(&LlmSettings {
        model: session.model.clone(),
        base_url: config.llm.base_url.clone(),
    })?;
    let analyzer = LlmChangeAnalyzer::new(model);

    let (mut watcher, events) =
        FsWatcher::start(&session.root).context("Failed to start file watcher")?;

    let (observer, mut observed) = mpsc::unbounded_channel();
    let monitor = ChangeMonitor::from_config(&session, analyzer, observer)
        .context("Cannot start monitoring")?;

    let cancel = CancellationToken::new();
    let monitor_task = tokio::spawn(monitor.run(events, cancel.clone()));

    let color = std::io::stdout().is_terminal();
    let printer_task = tokio::spawn(async move {
        let mut printer = MonitorPrinter::new(color);
        let mut stdout = std::io::stdout();
        while let Some(event) = observed.recv().await {
            let text = printer.render(&event);
            if let Err(e) = write!(stdout, "{text}").and_then(|()| stdout.flush()) {
                warn!("Failed to write monitor output: {e}");
            }
        }
    });

    println!(
        "{} {} (debounce {}s, model {})",
        "Monitoring commencing on".bold(),
        session.root.display().to_string().cyan(),
        session.debounce_secs,
        session.model
    );
    println!("{}", "Press Ctrl-C to stop.".dimmed());

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;
    info!("Interrupt received");

    cancel.cancel();
    watcher.stop();
    monitor_task.await.context("Monitor task failed")?;
    printer_task.await.context("Output task failed")?;

    println!("\n{}", "Monitoring terminated.".bold());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn options(ignore: Vec<String>, debounce: Option<f64>) -> StartOptions {
        StartOptions {
            path: PathBuf::from("proj"),
            debounce,
            ignore,
        }
    }

    #[test]
    fn test_session_uses_config_file_values() {
        let mut config = ClaiConfig::default();
        config.monitor.debounce_secs = 1.5;
        config.monitor.ignore_patterns = vec!["target".to_string()];
        config.llm.model = "codellama".to_string();

        let session = session_config(&config, options(Vec::new(), None));
        assert_eq!(session.root, PathBuf::from("proj"));
        assert_eq!(session.debounce_secs, 1.5);
        assert_eq!(session.ignore_patterns, vec!["target".to_string()]);
        assert_eq!(session.model, "codellama");
    }

    #[test]
    fn test_session_flags_override_config() {
        let mut config = ClaiConfig::default();
        config.monitor.ignore_patterns = vec!["target".to_string()];

        let session = session_config(&config, options(vec!["dist".to_string()], Some(0.25)));
        assert_eq!(session.debounce_secs, 0.25);
        assert_eq!(session.ignore_patterns, vec!["dist".to_string()]);
    }

    #[tokio::test]
    async fn test_start_rejects_missing_root() {
        let config = ClaiConfig::default();
        let result = start(
            &config,
            StartOptions {
                path: PathBuf::from("/nonexistent/path/12345"),
                debounce: None,
                ignore: Vec::new(),
            },
        )
        .await;

        let message = format!("{:#}", result.unwrap_err());
        assert!(message.contains("directory not found"), "{message}");
    }
}
