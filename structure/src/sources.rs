//! Source file collection for documentation generation.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{Result, StructureError};

/// Extensions of files included in generated documentation.
pub const SOURCE_EXTENSIONS: &[&str] = &[
    ".py", ".js", ".ts", ".html", ".css", ".java", ".c", ".cpp", ".h", ".hpp", ".rs", ".go", ".php",
    ".rb", ".swift", ".kt", ".kts", ".scala", ".m", ".sh", ".pl", ".pm", ".r", ".lua", ".sql",
    ".json", ".xml", ".yaml", ".yml", ".md",
];

/// Path components that exclude everything beneath them.
pub const IGNORED_COMPONENTS: &[&str] = &[
    ".git",
    ".venv",
    "venv",
    "__pycache__",
    "node_modules",
    ".env",
    ".gitignore",
    "dist",
    "build",
];

/// Collect documentable source files under `path`, sorted by path.
///
/// A file argument yields itself when its extension is recognized.
pub fn collect_source_files(path: &Path) -> Result<Vec<PathBuf>> {
    if !path.exists() {
        return Err(StructureError::NotFound(path.display().to_string()));
    }

    if path.is_file() {
        let keep = has_source_extension(path) && !has_ignored_component(path);
        return Ok(if keep { vec![path.to_path_buf()] } else { Vec::new() });
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(path)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0 || !is_ignored_name(&entry.file_name().to_string_lossy())
        });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry: {e}");
                continue;
            }
        };
        if entry.file_type().is_file() && has_source_extension(entry.path()) {
            files.push(entry.into_path());
        }
    }

    debug!("Collected {} source files under {}", files.len(), path.display());
    Ok(files)
}

/// Concatenate files into one blob, each under a `--- <path> ---` header.
///
/// Unreadable files contribute an error line instead of their content.
pub fn concatenate_sources(files: &[PathBuf]) -> String {
    let mut content = String::new();
    for file in files {
        content.push_str(&format!("--- {} ---\n", file.display()));
        match fs::read_to_string(file) {
            Ok(text) => content.push_str(&text),
            Err(e) => {
                warn!("Failed to read {}: {e}", file.display());
                content.push_str(&format!("Error reading file: {e}"));
            }
        }
        content.push_str("\n\n");
    }
    content
}

fn has_source_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .is_some_and(|suffix| SOURCE_EXTENSIONS.contains(&suffix.as_str()))
}

fn has_ignored_component(path: &Path) -> bool {
    path.components()
        .any(|c| is_ignored_name(&c.as_os_str().to_string_lossy()))
}

fn is_ignored_name(name: &str) -> bool {
    IGNORED_COMPONENTS.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn fixture() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("src")).unwrap();
        fs::create_dir_all(root.join("node_modules/pkg")).unwrap();
        fs::create_dir_all(root.join("build")).unwrap();
        fs::write(root.join("README.md"), "# Demo").unwrap();
        fs::write(root.join("logo.png"), "").unwrap();
        fs::write(root.join("src/app.py"), "print('hi')").unwrap();
        fs::write(root.join("src/Main.PY"), "").unwrap();
        fs::write(root.join("node_modules/pkg/index.js"), "").unwrap();
        fs::write(root.join("build/out.js"), "").unwrap();
        temp_dir
    }

    #[test]
    fn test_collect_filters_extensions_and_ignored_dirs() {
        let temp_dir = fixture();
        let root = temp_dir.path();

        let files = collect_source_files(root).unwrap();
        assert_eq!(files, vec![root.join("README.md"), root.join("src/app.py")]);
    }

    #[test]
    fn test_collect_single_file() {
        let temp_dir = fixture();
        let root = temp_dir.path();

        let app = root.join("src/app.py");
        assert_eq!(collect_source_files(&app).unwrap(), vec![app]);
        assert!(collect_source_files(&root.join("logo.png")).unwrap().is_empty());
    }

    #[test]
    fn test_collect_missing_path() {
        assert!(matches!(
            collect_source_files(Path::new("/nonexistent/path/12345")),
            Err(StructureError::NotFound(_))
        ));
    }

    #[test]
    fn test_concatenate_sources() {
        let temp_dir = fixture();
        let root = temp_dir.path();
        let readme = root.join("README.md");
        let missing = root.join("gone.py");

        let blob = concatenate_sources(&[readme.clone(), missing.clone()]);

        assert!(blob.starts_with(&format!("--- {} ---\n# Demo\n\n", readme.display())));
        assert!(blob.contains(&format!("--- {} ---\nError reading file: ", missing.display())));
        assert!(blob.ends_with("\n\n"));
    }
}
