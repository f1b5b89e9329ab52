//! Repository Tree
//!
//! Rebuilds the nested directory structure of a repository from its flat path
//! listing. Each directory carries the total size of the files beneath it.

pub mod builder;
pub mod node;
pub mod path;

pub use builder::{build_hierarchy, ConflictPolicy, HierarchyBuilder};
pub use node::{NodeKind, NodeType, TreeNode, ROOT_NAME};
