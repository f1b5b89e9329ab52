//! Tree node types and size aggregation

use crate::tree::path;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Name given to the synthetic root directory
pub const ROOT_NAME: &str = "/";

/// Node type as it appears in the serialized tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    File,
    Directory,
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeType::File => write!(f, "file"),
            NodeType::Directory => write!(f, "directory"),
        }
    }
}

/// Node payload: a leaf file or a directory owning its children
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    File {
        size: u64,
        extension: Option<String>,
    },
    Directory {
        /// Sum of descendant file sizes, valid after `aggregate_sizes`
        size: u64,
        /// Children in first-insertion order, unique by name
        children: Vec<TreeNode>,
    },
}

/// A file or directory in the repository tree
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "NodeRecord")]
pub struct TreeNode {
    pub name: String,
    pub kind: NodeKind,
}

impl TreeNode {
    /// File node; the extension is derived from the name
    pub fn file(name: impl Into<String>, size: u64) -> Self {
        let name = name.into();
        let extension = path::extension_of(&name).map(str::to_string);
        Self {
            name,
            kind: NodeKind::File { size, extension },
        }
    }

    /// Empty directory node with zero size
    pub fn directory(name: impl Into<String>) -> Self {
        Self::directory_with_children(name, Vec::new())
    }

    /// Directory node with the given children; size stays zero until aggregated
    pub fn directory_with_children(name: impl Into<String>, children: Vec<TreeNode>) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Directory { size: 0, children },
        }
    }

    /// The synthetic root directory
    pub fn root() -> Self {
        Self::directory(ROOT_NAME)
    }

    pub fn node_type(&self) -> NodeType {
        match self.kind {
            NodeKind::File { .. } => NodeType::File,
            NodeKind::Directory { .. } => NodeType::Directory,
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self.kind, NodeKind::File { .. })
    }

    pub fn is_directory(&self) -> bool {
        matches!(self.kind, NodeKind::Directory { .. })
    }

    /// Declared size for files, aggregated size for directories
    pub fn size(&self) -> u64 {
        match self.kind {
            NodeKind::File { size, .. } | NodeKind::Directory { size, .. } => size,
        }
    }

    /// File extension; always `None` for directories
    pub fn extension(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::File { extension, .. } => extension.as_deref(),
            NodeKind::Directory { .. } => None,
        }
    }

    /// Children of a directory; `None` for files
    pub fn children(&self) -> Option<&[TreeNode]> {
        match &self.kind {
            NodeKind::File { .. } => None,
            NodeKind::Directory { children, .. } => Some(children),
        }
    }

    /// Direct child with the given name
    pub fn child(&self, name: &str) -> Option<&TreeNode> {
        self.children()?.iter().find(|child| child.name == name)
    }

    /// Descendant at a slash-separated path relative to this node
    pub fn find(&self, relative: &str) -> Option<&TreeNode> {
        path::split_segments(relative)
            .into_iter()
            .try_fold(self, |node, segment| node.child(segment))
    }

    /// Recompute directory sizes bottom-up and return this node's size
    ///
    /// Each directory becomes the sum of its children's sizes, saturating at
    /// `u64::MAX`. The result only depends on file sizes, so running it again
    /// changes nothing.
    pub fn aggregate_sizes(&mut self) -> u64 {
        match &mut self.kind {
            NodeKind::File { size, .. } => *size,
            NodeKind::Directory { size, children } => {
                *size = children
                    .iter_mut()
                    .map(TreeNode::aggregate_sizes)
                    .fold(0u64, u64::saturating_add);
                *size
            }
        }
    }

    /// Number of file nodes below (or at) this node
    pub fn file_count(&self) -> usize {
        match &self.kind {
            NodeKind::File { .. } => 1,
            NodeKind::Directory { children, .. } => children.iter().map(TreeNode::file_count).sum(),
        }
    }

    /// Number of directory nodes strictly below this node
    pub fn directory_count(&self) -> usize {
        self.children()
            .map(|children| {
                children
                    .iter()
                    .filter(|child| child.is_directory())
                    .map(|child| 1 + child.directory_count())
                    .sum()
            })
            .unwrap_or(0)
    }
}

// Files carry no `children` key at all; `extension` is always present (null
// for directories and extension-less files).
impl Serialize for TreeNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let children = self.children();
        let field_count = if children.is_some() { 5 } else { 4 };
        let mut state = serializer.serialize_struct("TreeNode", field_count)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("type", &self.node_type())?;
        state.serialize_field("size", &self.size())?;
        state.serialize_field("extension", &self.extension())?;
        if let Some(children) = children {
            state.serialize_field("children", children)?;
        }
        state.end()
    }
}

/// Wire shape of a node, used when reading a saved tree back
#[derive(Deserialize)]
struct NodeRecord {
    name: String,
    #[serde(rename = "type")]
    node_type: NodeType,
    #[serde(default)]
    size: u64,
    #[serde(default)]
    extension: Option<String>,
    #[serde(default)]
    children: Option<Vec<TreeNode>>,
}

impl TryFrom<NodeRecord> for TreeNode {
    type Error = String;

    fn try_from(record: NodeRecord) -> Result<Self, Self::Error> {
        let kind = match record.node_type {
            NodeType::File => {
                if record.children.is_some() {
                    return Err(format!("file node '{}' must not have children", record.name));
                }
                NodeKind::File {
                    size: record.size,
                    extension: record.extension,
                }
            }
            NodeType::Directory => NodeKind::Directory {
                size: record.size,
                children: record.children.unwrap_or_default(),
            },
        };
        Ok(Self {
            name: record.name,
            kind,
        })
    }
}
