//! Core types for the repository tree builder.

use serde::{Deserialize, Serialize};

/// Kind of a flat listing entry, named after git object types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    /// File contents
    Blob,
    /// Directory marker
    Tree,
}

/// One entry of a flat repository listing
///
/// Deserializes straight from a git-trees API entry; fields such as `mode`,
/// `sha` and `url` are ignored. `size` is only meaningful for blobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatRecord {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: RecordKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

impl FlatRecord {
    /// File record with a declared size
    pub fn blob(path: impl Into<String>, size: u64) -> Self {
        Self {
            path: path.into(),
            kind: RecordKind::Blob,
            size: Some(size),
        }
    }

    /// Directory marker record
    pub fn tree(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: RecordKind::Tree,
            size: None,
        }
    }

    /// Declared size, zero when absent
    pub fn declared_size(&self) -> u64 {
        self.size.unwrap_or(0)
    }
}
