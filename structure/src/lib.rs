//! # clai Structure
//!
//! Read-only views of a project directory: a text tree, a nested JSON
//! object, a Graphviz graph and the concatenated source files used for
//! documentation.
//!
//! Every view skips hidden entries and lists children sorted by name.

pub mod error;
pub mod graph;
pub mod json;
pub mod sources;
pub mod tree;

pub use error::{Result, StructureError};
pub use graph::{GraphNode, ProjectGraph, Shape};
pub use json::{export_json, structure_json};
pub use sources::{collect_source_files, concatenate_sources};
pub use tree::{DEFAULT_MAX_DEPTH, DirNode, DirTree, EntryKind};
