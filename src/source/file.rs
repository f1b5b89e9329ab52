//! Saved listing source: a git-trees response (or bare entry array) read from disk

use crate::error::SourceError;
use crate::source::{records_from_entries, ListingEntry, PathRecordSource, TreeListing};
use crate::types::FlatRecord;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Deserialize)]
#[serde(untagged)]
enum SavedListing {
    Listing(TreeListing),
    Entries(Vec<ListingEntry>),
}

/// Records read from a JSON file
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse listing text; accepts the API response object or a bare array
    pub fn parse(text: &str) -> Result<Vec<FlatRecord>, SourceError> {
        let saved: SavedListing = serde_json::from_str(text)
            .map_err(|e| SourceError::MalformedResponse(format!("Invalid listing JSON: {}", e)))?;
        let entries = match saved {
            SavedListing::Listing(listing) => {
                if listing.truncated {
                    warn!("Saved listing is marked truncated; the result is incomplete");
                }
                listing.tree
            }
            SavedListing::Entries(entries) => entries,
        };
        Ok(records_from_entries(entries))
    }
}

#[async_trait]
impl PathRecordSource for JsonFileSource {
    async fn fetch_records(&self) -> Result<Vec<FlatRecord>, SourceError> {
        let text = std::fs::read_to_string(&self.path).map_err(|e| {
            SourceError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read listing {}: {}", self.path.display(), e),
            ))
        })?;
        let records = Self::parse(&text)?;
        info!(
            path = %self.path.display(),
            records = records.len(),
            "Loaded saved listing"
        );
        Ok(records)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
