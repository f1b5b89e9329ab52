//! Build summary presentation: text and JSON formatters.

use crate::cli::route::BuildSummary;
use crate::error::{ApiError, SinkError};
use serde_json::json;

pub fn format_build_summary_text(summary: &BuildSummary) -> String {
    format!(
        "✔ File tree saved to {}\n  Files: {}\n  Directories: {}\n  Total size: {} bytes",
        summary.destination,
        summary.files,
        summary.directories,
        summary.total_size
    )
}

pub fn format_build_summary_json(summary: &BuildSummary) -> Result<String, ApiError> {
    let out = json!({
        "source": summary.source,
        "destination": summary.destination,
        "files": summary.files,
        "directories": summary.directories,
        "total_size": summary.total_size,
    });
    serde_json::to_string_pretty(&out).map_err(|e| ApiError::Sink(SinkError::Serialize(e)))
}
