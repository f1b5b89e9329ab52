//! Repotree: GitHub Repository Trees
//!
//! Turns the flat path listing of a GitHub repository into a nested directory
//! tree whose directories carry the total size of their files, and writes it
//! as a JSON document for visualization.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod sink;
pub mod source;
pub mod tree;
pub mod types;

pub use error::{ApiError, HierarchyError, SinkError, SourceError};
pub use tree::{build_hierarchy, ConflictPolicy, HierarchyBuilder, NodeType, TreeNode};
pub use types::{FlatRecord, RecordKind};
