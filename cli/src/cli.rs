//! Command-line definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// clai - understand, document and watch your codebase with a local LLM
#[derive(Debug, Parser)]
#[command(name = "clai")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Model to use (overrides the config file)
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Ollama server URL
    #[arg(long, global = true, env = "OLLAMA_HOST")]
    pub ollama_url: Option<String>,

    /// Path to a config file (default: <config dir>/clai/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Monitor the project for changes
    #[command(subcommand)]
    Monitor(MonitorCommands),

    /// Print the directory tree
    Tree {
        /// Project directory
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Deepest level to list
        #[arg(long, default_value_t = clai_structure::DEFAULT_MAX_DEPTH)]
        max_depth: usize,
    },

    /// Export the project structure as JSON
    Export {
        /// Project directory
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output file
        #[arg(short, long, default_value = "structure.json")]
        output: PathBuf,

        /// Deepest level to expand (default: unlimited)
        #[arg(long)]
        max_depth: Option<usize>,
    },

    /// Render the project structure as a Graphviz flowchart
    Visualize {
        /// Project directory
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output name, without extension
        #[arg(short, long, default_value = "project_structure")]
        output: String,
    },

    /// Summarize the codebase from its structure
    Summarize {
        /// Project directory
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Deepest level to expand (default: unlimited)
        #[arg(long)]
        max_depth: Option<usize>,
    },

    /// Generate markdown documentation for the source files
    Docs {
        /// Project directory or a single file
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Write the documentation here instead of printing it
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Subcommand)]
pub enum MonitorCommands {
    /// Start monitoring; stop with Ctrl-C
    Start {
        /// Project directory
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Quiet period in seconds before a change is analyzed
        #[arg(long)]
        debounce: Option<f64>,

        /// Ignore paths containing this pattern (repeatable)
        #[arg(long = "ignore", value_name = "PATTERN")]
        ignore: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_monitor_start_defaults() {
        let cli = Cli::try_parse_from(["clai", "monitor", "start"]).unwrap();
        match cli.command {
            Commands::Monitor(MonitorCommands::Start {
                path,
                debounce,
                ignore,
            }) => {
                assert_eq!(path, PathBuf::from("."));
                assert_eq!(debounce, None);
                assert!(ignore.is_empty());
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert!(!cli.verbose);
    }

    #[test]
    fn test_monitor_start_with_options() {
        let cli = Cli::try_parse_from([
            "clai",
            "monitor",
            "start",
            "src",
            "--debounce",
            "0.5",
            "--ignore",
            "target",
            "--ignore",
            ".lock",
            "--model",
            "qwen2.5-coder",
            "-v",
        ])
        .unwrap();

        assert_eq!(cli.model.as_deref(), Some("qwen2.5-coder"));
        assert!(cli.verbose);
        match cli.command {
            Commands::Monitor(MonitorCommands::Start {
                path,
                debounce,
                ignore,
            }) => {
                assert_eq!(path, PathBuf::from("src"));
                assert_eq!(debounce, Some(0.5));
                assert_eq!(ignore, vec!["target".to_string(), ".lock".to_string()]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_structure_commands() {
        let cli = Cli::try_parse_from(["clai", "tree", "--max-depth", "2"]).unwrap();
        assert!(matches!(cli.command, Commands::Tree { max_depth: 2, .. }));

        let cli = Cli::try_parse_from(["clai", "export", "proj", "-o", "out.json"]).unwrap();
        match cli.command {
            Commands::Export {
                path,
                output,
                max_depth,
            } => {
                assert_eq!(path, PathBuf::from("proj"));
                assert_eq!(output, PathBuf::from("out.json"));
                assert_eq!(max_depth, None);
            }
            other => panic!("unexpected command {other:?}"),
        }

        let cli = Cli::try_parse_from(["clai", "visualize"]).unwrap();
        assert!(
            matches!(cli.command, Commands::Visualize { ref output, .. } if output == "project_structure")
        );
    }

    #[test]
    fn test_monitor_requires_subcommand() {
        assert!(Cli::try_parse_from(["clai", "monitor"]).is_err());
        assert!(Cli::try_parse_from(["clai", "monitor", "start", "--debounce", "soon"]).is_err());
    }
}
