//! Print the directory tree.

use std::path::Path;

use anyhow::{Context, Result};
use clai_structure::DirTree;

pub fn run(path: &Path, max_depth: usize) -> Result<()> {
    let tree = DirTree::scan(path, max_depth)
        .with_context(|| format!("Failed to scan {}", path.display()))?;
    print!("{}", tree.render());
    Ok(())
}
