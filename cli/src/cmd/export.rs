//! Export the project structure as JSON.

use std::path::Path;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;

pub fn run(path: &Path, output: &Path, max_depth: Option<usize>) -> Result<()> {
    clai_structure::export_json(output, path, max_depth)
        .with_context(|| format!("Failed to export structure of {}", path.display()))?;

    println!(
        "{} {}",
        "Structure exported to".green(),
        output.display().to_string().bold()
    );
    Ok(())
}
