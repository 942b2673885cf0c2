//! Directory tree scanning and text rendering.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use crate::error::{Result, StructureError};

/// Default depth for tree listings.
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Kind of entry in a scanned tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Directory,
    File,
}

/// One entry in a scanned tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirNode {
    /// File name of the entry.
    pub name: String,

    /// Whether the entry is a directory or a file.
    pub kind: EntryKind,

    /// Children, sorted by name. Always empty for files.
    pub children: Vec<DirNode>,
}

impl DirNode {
    fn new(name: String, kind: EntryKind) -> Self {
        Self {
            name,
            kind,
            children: Vec::new(),
        }
    }

    /// Check if the entry is a directory.
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// Snapshot of a directory's visible contents.
///
/// Hidden entries (names starting with `.`) are skipped along with
/// everything under them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirTree {
    /// Scanned root.
    pub root: PathBuf,

    /// Display name of the root.
    pub name: String,

    /// Direct children of the root.
    pub children: Vec<DirNode>,
}

impl DirTree {
    /// Scan `root` down to `max_depth` levels. Depth 1 is the root's direct
    /// children.
    pub fn scan(root: impl Into<PathBuf>, max_depth: usize) -> Result<Self> {
        let root = root.into();
        ensure_dir(&root)?;

        // Open directories from the root down to the current entry's parent.
        let mut open = vec![DirNode::new(String::new(), EntryKind::Directory)];

        for entry in visible_entries(&root, max_depth) {
            let entry = entry?;
            let depth = entry.depth();

            while open.len() > depth {
                close_last(&mut open);
            }

            let kind = if entry.file_type().is_dir() {
                EntryKind::Directory
            } else {
                EntryKind::File
            };
            let node = DirNode::new(entry_name(&entry), kind);

            match kind {
                EntryKind::Directory => open.push(node),
                EntryKind::File => {
                    if let Some(parent) = open.last_mut() {
                        parent.children.push(node);
                    }
                }
            }
        }

        while open.len() > 1 {
            close_last(&mut open);
        }
        let children = open.pop().map(|root| root.children).unwrap_or_default();

        debug!(
            "Scanned {} top-level entries under {}",
            children.len(),
            root.display()
        );

        Ok(Self {
            name: display_name(&root),
            root,
            children,
        })
    }

    /// Render the tree as text with box-drawing connectors.
    ///
    /// ```text
    /// project/
    /// ├── src/
    /// │   └── main.rs
    /// └── Cargo.toml
    /// ```
    pub fn render(&self) -> String {
        let mut out = format!("{}/\n", self.name);
        render_children(&self.children, "", &mut out);
        out
    }
}

fn render_children(children: &[DirNode], prefix: &str, out: &mut String) {
    let count = children.len();
    for (i, child) in children.iter().enumerate() {
        let last = i + 1 == count;
        let connector = if last { "└── " } else { "├── " };
        let slash = if child.is_dir() { "/" } else { "" };
        out.push_str(&format!("{prefix}{connector}{}{slash}\n", child.name));

        if child.is_dir() {
            let guide = if last { "    " } else { "│   " };
            render_children(&child.children, &format!("{prefix}{guide}"), out);
        }
    }
}

/// Pop the innermost open directory and attach it to its parent.
fn close_last(open: &mut Vec<DirNode>) {
    if let Some(done) = open.pop() {
        if let Some(parent) = open.last_mut() {
            parent.children.push(done);
        }
    }
}

/// Check that `path` exists and is a directory.
pub(crate) fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(StructureError::NotFound(path.display().to_string()));
    }
    if !path.is_dir() {
        return Err(StructureError::NotADirectory(path.display().to_string()));
    }
    Ok(())
}

/// Walk the visible entries below `root` in sorted, depth-first order.
pub(crate) fn visible_entries(
    root: &Path,
    max_depth: usize,
) -> impl Iterator<Item = walkdir::Result<DirEntry>> {
    WalkDir::new(root)
        .min_depth(1)
        .max_depth(max_depth)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry))
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

pub(crate) fn entry_name(entry: &DirEntry) -> String {
    entry.file_name().to_string_lossy().into_owned()
}

/// Name shown for a root; `.` resolves to the directory's real name.
pub(crate) fn display_name(root: &Path) -> String {
    root.file_name()
        .map(ToOwned::to_owned)
        .or_else(|| {
            std::fs::canonicalize(root)
                .ok()
                .and_then(|p| p.file_name().map(ToOwned::to_owned))
        })
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn fixture() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("src/core")).unwrap();
        fs::create_dir_all(root.join(".git/objects")).unwrap();
        fs::write(root.join("Cargo.toml"), "").unwrap();
        fs::write(root.join(".env"), "").unwrap();
        fs::write(root.join("src/main.rs"), "").unwrap();
        fs::write(root.join("src/core/mod.rs"), "").unwrap();
        temp_dir
    }

    #[test]
    fn test_scan_skips_hidden_and_sorts() {
        let temp_dir = fixture();
        let tree = DirTree::scan(temp_dir.path(), DEFAULT_MAX_DEPTH).unwrap();

        let names: Vec<&str> = tree.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Cargo.toml", "src"]);

        let src = &tree.children[1];
        assert!(src.is_dir());
        let names: Vec<&str> = src.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["core", "main.rs"]);
        assert_eq!(src.children[0].children[0].name, "mod.rs");
    }

    #[test]
    fn test_render() {
        let temp_dir = fixture();
        let tree = DirTree::scan(temp_dir.path(), DEFAULT_MAX_DEPTH).unwrap();
        let name = tree.name.clone();

        assert_eq!(
            tree.render(),
            format!(
                "{name}/\n\
                 ├── Cargo.toml\n\
                 └── src/\n    \
                 ├── core/\n    \
                 │   └── mod.rs\n    \
                 └── main.rs\n"
            )
        );
    }

    #[test]
    fn test_max_depth_limits_listing() {
        let temp_dir = fixture();
        let tree = DirTree::scan(temp_dir.path(), 1).unwrap();

        let src = tree.children.iter().find(|c| c.name == "src").unwrap();
        assert!(src.is_dir());
        assert!(src.children.is_empty());
    }

    #[test]
    fn test_scan_errors() {
        assert!(matches!(
            DirTree::scan("/nonexistent/path/12345", DEFAULT_MAX_DEPTH),
            Err(StructureError::NotFound(_))
        ));

        let temp_dir = fixture();
        assert!(matches!(
            DirTree::scan(temp_dir.path().join("Cargo.toml"), DEFAULT_MAX_DEPTH),
            Err(StructureError::NotADirectory(_))
        ));
    }

    #[test]
    fn test_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let tree = DirTree::scan(temp_dir.path(), DEFAULT_MAX_DEPTH).unwrap();
        assert!(tree.children.is_empty());
        assert_eq!(tree.render(), format!("{}/\n", tree.name));
    }

    #[test]
    fn test_display_name_resolves_relative_roots() {
        let temp_dir = fixture();
        let root = temp_dir.path();
        let expected = root.file_name().unwrap().to_string_lossy().into_owned();

        assert_eq!(display_name(root), expected);
        assert_eq!(display_name(&root.join("src").join("..")), expected);

        let cwd = std::env::current_dir().unwrap();
        let cwd_name = cwd.file_name().unwrap().to_string_lossy().into_owned();
        assert_eq!(display_name(Path::new(".")), cwd_name);
    }
}
