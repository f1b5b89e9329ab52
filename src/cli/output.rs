//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::{ApiError, SourceError};

/// Map domain/service errors to a string for CLI output.
pub fn map_error(e: &ApiError) -> String {
    match e {
        ApiError::Source(SourceError::InvalidRepository(_)) => format!(
            "{}\nUsage: repotree <github_repo_url> (e.g. https://github.com/owner/repo or owner/repo)",
            e
        ),
        ApiError::Source(SourceError::AuthFailed(_)) => format!(
            "{}\nSet GITHUB_TOKEN or github.token in the configuration for private repositories.",
            e
        ),
        _ => e.to_string(),
    }
}
