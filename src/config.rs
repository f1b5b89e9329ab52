//! Configuration System
//!
//! Layered configuration: built-in defaults, a user-level file, workspace files
//! and `REPOTREE__*` environment variables, merged with the `config` crate.

use crate::logging::LoggingConfig;
use crate::tree::ConflictPolicy;
use serde::{Deserialize, Serialize};

mod facade;
mod merge;
mod sources;

pub use crate::sink::OutputConfig;
pub use crate::source::GitHubConfig;
pub use facade::ConfigLoader;
pub use sources::global_file::global_config_path;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepoTreeConfig {
    /// GitHub API access
    #[serde(default)]
    pub github: GitHubConfig,

    /// Where the tree document is written
    #[serde(default)]
    pub output: OutputConfig,

    /// Hierarchy construction
    #[serde(default)]
    pub hierarchy: HierarchyConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Hierarchy construction settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HierarchyConfig {
    /// `first-wins` keeps the first node on a file/directory clash, `reject` fails
    #[serde(default)]
    pub conflict_policy: ConflictPolicy,
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    GitHub(String),
    Output(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::GitHub(msg) => write!(f, "GitHub: {}", msg),
            ValidationError::Output(msg) => write!(f, "Output: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl RepoTreeConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.github.validate() {
            errors.push(ValidationError::GitHub(e));
        }
        if let Err(e) = self.output.validate() {
            errors.push(ValidationError::Output(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
