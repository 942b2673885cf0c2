//! Render the project structure as a flowchart image.

use std::path::Path;

use anyhow::{Context, Result};
use clai_structure::ProjectGraph;
use owo_colors::OwoColorize;

pub fn run(path: &Path, output: &str) -> Result<()> {
    println!("Creating a flowchart for codebase visualization.");

    let graph = ProjectGraph::scan(path)
        .with_context(|| format!("Failed to scan {}", path.display()))?;
    let image = graph
        .render_png(path, output)
        .context("Failed to render flowchart")?;

    println!(
        "{} {}",
        "Flowchart has been saved to".green(),
        image.display().to_string().bold()
    );
    Ok(())
}
