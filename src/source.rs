//! Path Record Sources
//!
//! Suppliers of the flat repository listing that the hierarchy builder consumes:
//! the GitHub git-trees API, or a listing previously saved to disk.

use crate::error::SourceError;
use crate::types::{FlatRecord, RecordKind};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

pub mod file;
pub mod github;
pub mod repo;

pub use file::JsonFileSource;
pub use github::{GitHubConfig, GitHubTreeSource};
pub use repo::RepoRef;

/// Supplier of flat repository records
#[async_trait]
pub trait PathRecordSource: Send + Sync {
    /// Fetch the complete, unordered listing
    async fn fetch_records(&self) -> Result<Vec<FlatRecord>, SourceError>;

    /// Human-readable description of where records come from
    fn describe(&self) -> String;

    /// Short name for progress output; defaults to `describe`
    fn display_name(&self) -> String {
        self.describe()
    }
}

/// Git-trees listing as returned by `GET /repos/{owner}/{repo}/git/trees/{sha}`
#[derive(Debug, Clone, Deserialize)]
pub struct TreeListing {
    #[serde(default)]
    pub sha: Option<String>,
    pub tree: Vec<ListingEntry>,
    #[serde(default)]
    pub truncated: bool,
}

/// One raw listing entry; `kind` is `blob`, `tree` or `commit` (submodule)
#[derive(Debug, Clone, Deserialize)]
pub struct ListingEntry {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub size: Option<u64>,
}

impl ListingEntry {
    /// Convert to a flat record; entries other than blobs and trees yield `None`
    pub fn into_record(self) -> Option<FlatRecord> {
        let kind = match self.kind.as_str() {
            "blob" => RecordKind::Blob,
            "tree" => RecordKind::Tree,
            other => {
                debug!(path = %self.path, kind = other, "Skipping listing entry");
                return None;
            }
        };
        Some(FlatRecord {
            path: self.path,
            kind,
            size: self.size,
        })
    }
}

/// Keep only blob and tree entries
pub fn records_from_entries(entries: Vec<ListingEntry>) -> Vec<FlatRecord> {
    entries
        .into_iter()
        .filter_map(ListingEntry::into_record)
        .collect()
}
