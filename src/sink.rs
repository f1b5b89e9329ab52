//! Tree persistence: JSON documents for downstream visualization

use crate::error::SinkError;
use crate::tree::TreeNode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Destination of the tree document
    #[serde(default = "default_output_path")]
    pub path: PathBuf,

    /// Pretty-print with two-space indentation
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

fn default_output_path() -> PathBuf {
    PathBuf::from("public").join("tree.json")
}

fn default_pretty() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            pretty: default_pretty(),
        }
    }
}

impl OutputConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.path.as_os_str().is_empty() {
            return Err("Output path cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Destination for a finished tree
pub trait TreeSink {
    fn store(&self, tree: &TreeNode) -> Result<(), SinkError>;

    /// Where stored trees end up, for progress output
    fn describe(&self) -> String;
}

/// Writes the tree as a JSON file, creating parent directories first
///
/// The document is written next to the target and renamed into place, so a
/// failed write never leaves a half-written tree behind.
pub struct JsonFileSink {
    path: PathBuf,
    pretty: bool,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            pretty: true,
        }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl TreeSink for JsonFileSink {
    #[instrument(skip(self, tree), fields(path = %self.path.display()))]
    fn store(&self, tree: &TreeNode) -> Result<(), SinkError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut bytes = if self.pretty {
            serde_json::to_vec_pretty(tree)?
        } else {
            serde_json::to_vec(tree)?
        };
        bytes.push(b'\n');

        let staging = self.staging_path();
        debug!(staging = %staging.display(), bytes = bytes.len(), "Writing tree document");
        fs::write(&staging, &bytes)?;
        if let Err(e) = fs::rename(&staging, &self.path) {
            let _ = fs::remove_file(&staging);
            return Err(e.into());
        }

        info!(bytes = bytes.len(), "Tree document saved");
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Read a previously saved tree document
///
/// Every directory adds an object and a `children` array, so the parser's
/// default nesting limit would reject trees deeper than about 64 levels.
pub fn read_tree(path: &Path) -> Result<TreeNode, SinkError> {
    let text = fs::read_to_string(path)?;
    let mut deserializer = serde_json::Deserializer::from_str(&text);
    deserializer.disable_recursion_limit();
    let tree = TreeNode::deserialize(&mut deserializer).map_err(SinkError::Deserialize)?;
    deserializer.end().map_err(SinkError::Deserialize)?;
    Ok(tree)
}
