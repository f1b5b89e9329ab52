//! Error types for the repository tree builder.

use crate::tree::node::NodeType;
use thiserror::Error;

/// Hierarchy construction errors
///
/// Only raised when the builder runs with `ConflictPolicy::Reject`; the default
/// policy keeps the first-created node and never fails.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HierarchyError {
    #[error("Type conflict at {path}: existing {existing} node, record requested {requested}")]
    TypeConflict {
        path: String,
        existing: NodeType,
        requested: NodeType,
    },
}

/// Record source errors (remote listing or saved listing file)
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Invalid GitHub URL: {0}")]
    InvalidRepository(String),

    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Source I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Tree persistence errors
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to write tree: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize tree: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to read tree: {0}")]
    Deserialize(serde_json::Error),
}

/// Top-level errors surfaced by the CLI
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Hierarchy(#[from] HierarchyError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Sink(#[from] SinkError),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
