//! Graphviz rendering of a project's structure.

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use crate::error::{Result, StructureError};
use crate::tree::{display_name, ensure_dir, entry_name, visible_entries};

/// Graphviz executable used to render images.
const DOT_BINARY: &str = "dot";

/// Graphviz node shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Box,
    Folder,
}

impl Shape {
    fn as_str(self) -> &'static str {
        match self {
            Shape::Box => "box",
            Shape::Folder => "folder",
        }
    }
}

/// One node of the structure graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    /// Path relative to the root; the root node uses its own name.
    pub id: String,
    pub label: String,
    pub shape: Shape,
}

/// Parent/child graph of every visible entry under a root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectGraph {
    root: PathBuf,
    nodes: Vec<GraphNode>,
    edges: Vec<(String, String)>,
}

impl ProjectGraph {
    /// Scan `root` without a depth limit.
    pub fn scan(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        ensure_dir(&root)?;

        let root_name = display_name(&root);
        let mut nodes = vec![GraphNode {
            id: root_name.clone(),
            label: format!("{root_name}/"),
            shape: Shape::Folder,
        }];
        let mut edges = Vec::new();

        for entry in visible_entries(&root, usize::MAX) {
            let entry = entry?;
            let relative = entry.path().strip_prefix(&root).unwrap_or(entry.path());
            let id = relative.to_string_lossy().into_owned();

            let parent_id = match relative.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => {
                    parent.to_string_lossy().into_owned()
                }
                _ => root_name.clone(),
            };

            let is_dir = entry.file_type().is_dir();
            let name = entry_name(&entry);
            nodes.push(GraphNode {
                id: id.clone(),
                label: if is_dir { format!("{name}/") } else { name },
                shape: if is_dir { Shape::Folder } else { Shape::Box },
            });
            edges.push((parent_id, id));
        }

        debug!("Built graph with {} nodes for {}", nodes.len(), root.display());
        Ok(Self { root, nodes, edges })
    }

    /// Scanned root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    /// Parent/child pairs of node ids.
    pub fn edges(&self) -> &[(String, String)] {
        &self.edges
    }

    /// Render the graph in DOT format.
    pub fn to_dot(&self) -> String {
        let mut dot = String::from("// Project Structure\ndigraph {\n");
        for node in &self.nodes {
            let _ = writeln!(
                dot,
                "\t{} [label={} shape={}]",
                quote(&node.id),
                quote(&node.label),
                node.shape.as_str()
            );
        }
        for (parent, child) in &self.edges {
            let _ = writeln!(dot, "\t{} -> {}", quote(parent), quote(child));
        }
        dot.push_str("}\n");
        dot
    }

    /// Write `<name>.dot` into `dir` and render `<name>.png` next to it with
    /// the Graphviz `dot` executable. Returns the image path.
    pub fn render_png(&self, dir: &Path, name: &str) -> Result<PathBuf> {
        let dot_path = dir.join(format!("{name}.dot"));
        let png_path = dir.join(format!("{name}.png"));
        fs::write(&dot_path, self.to_dot())?;

        let output = Command::new(DOT_BINARY)
            .arg("-Tpng")
            .arg(&dot_path)
            .arg("-o")
            .arg(&png_path)
            .output()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => StructureError::Graphviz(format!(
                    "`{DOT_BINARY}` executable not found; install Graphviz to render images"
                )),
                _ => StructureError::Graphviz(format!("failed to run `{DOT_BINARY}`: {e}")),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(StructureError::Graphviz(format!(
                "`{DOT_BINARY}` exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        info!("Rendered structure graph to {}", png_path.display());
        Ok(png_path)
    }
}

/// Quote a DOT identifier.
fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}
