//! CLI parse: clap types for repotree. No behavior; definitions only.

use clap::Parser;
use std::path::PathBuf;

/// Repotree CLI - GitHub repository trees with aggregated sizes
#[derive(Parser, Debug)]
#[command(name = "repotree", version)]
#[command(about = "Build a size-aggregated directory tree of a GitHub repository as JSON")]
pub struct Cli {
    /// Repository URL (https://github.com/<owner>/<repo>) or <owner>/<repo>
    #[arg(required_unless_present = "from_file")]
    pub repo: Option<String>,

    /// Branch to read (default: github.default_branch, "main")
    #[arg(long)]
    pub branch: Option<String>,

    /// Output file (default: output.path, "public/tree.json")
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Build from a saved git-trees API response instead of the network
    #[arg(long)]
    pub from_file: Option<PathBuf>,

    /// Fail when a path is both a file and a directory
    #[arg(long)]
    pub strict: bool,

    /// Write compact JSON instead of two-space indentation
    #[arg(long)]
    pub compact: bool,

    /// Summary format (text or json)
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub format: String,

    /// Workspace root used for config discovery
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Disable logging
    #[arg(long)]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}
