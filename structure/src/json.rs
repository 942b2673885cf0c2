//! Nested JSON view of a project's structure.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde_json::{Map, Value};
use tracing::info;

use crate::error::Result;
use crate::tree::{DirNode, DirTree};

/// Build a nested JSON object for `root`.
///
/// Directories map to objects and files map to `null`. With a `max_depth`,
/// a directory sitting more than `max_depth` levels below the root maps to
/// an empty object.
pub fn structure_json(root: &Path, max_depth: Option<usize>) -> Result<Value> {
    let walk_depth = max_depth.map_or(usize::MAX, |depth| depth.saturating_add(1));
    let tree = DirTree::scan(root, walk_depth)?;
    Ok(Value::Object(children_object(&tree.children)))
}

/// Write the structure of `root` to `output` as pretty-printed JSON.
pub fn export_json(output: &Path, root: &Path, max_depth: Option<usize>) -> Result<()> {
    let structure = structure_json(root, max_depth)?;

    let mut writer = BufWriter::new(File::create(output)?);
    serde_json::to_writer_pretty(&mut writer, &structure)?;
    writer.flush()?;

    info!(
        "Exported structure of {} to {}",
        root.display(),
        output.display()
    );
    Ok(())
}

fn children_object(children: &[DirNode]) -> Map<String, Value> {
    children
        .iter()
        .map(|child| {
            let value = if child.is_dir() {
                Value::Object(children_object(&child.children))
            } else {
                Value::Null
            };
            (child.name.clone(), value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn fixture() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("src/core/deep")).unwrap();
        fs::write(root.join("README.md"), "").unwrap();
        fs::write(root.join(".hidden"), "").unwrap();
        fs::write(root.join("src/main.py"), "").unwrap();
        fs::write(root.join("src/core/llm.py"), "").unwrap();
        temp_dir
    }

    #[test]
    fn test_unbounded_structure() {
        let temp_dir = fixture();
        let value = structure_json(temp_dir.path(), None).unwrap();

        assert_eq!(
            value,
            json!({
                "README.md": null,
                "src": {
                    "core": {
                        "deep": {},
                        "llm.py": null
                    },
                    "main.py": null
                }
            })
        );
    }

    #[test]
    fn test_depth_limited_structure() {
        let temp_dir = fixture();

        assert_eq!(
            structure_json(temp_dir.path(), Some(0)).unwrap(),
            json!({ "README.md": null, "src": {} })
        );
        assert_eq!(
            structure_json(temp_dir.path(), Some(1)).unwrap(),
            json!({
                "README.md": null,
                "src": { "core": {}, "main.py": null }
            })
        );
    }

    #[test]
    fn test_export_writes_pretty_json() {
        let temp_dir = fixture();
        let output = temp_dir.path().join(".out.json");

        export_json(&output, temp_dir.path(), Some(0)).unwrap();

        let written = fs::read_to_string(&output).unwrap();
        assert!(written.contains("\n  \"README.md\": null"));
        let parsed: Value = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed, json!({ "README.md": null, "src": {} }));
    }
}
