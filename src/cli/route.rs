//! CLI route: run context that wires source, builder and sink for one invocation.

use crate::cli::parse::Cli;
use crate::cli::presentation::{format_build_summary_json, format_build_summary_text};
use crate::config::{ConfigLoader, RepoTreeConfig};
use crate::error::{ApiError, SourceError};
use crate::sink::{JsonFileSink, TreeSink};
use crate::source::{GitHubTreeSource, JsonFileSource, PathRecordSource, RepoRef};
use crate::tree::{ConflictPolicy, HierarchyBuilder};
use crate::types::FlatRecord;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info};

/// Outcome of one build, for presentation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSummary {
    pub source: String,
    pub destination: String,
    pub files: usize,
    pub directories: usize,
    pub total_size: u64,
}

fn check_format(format: &str) -> Result<(), ApiError> {
    match format {
        "text" | "json" => Ok(()),
        _ => Err(ApiError::ConfigError(format!(
            "Invalid format: '{}'. Must be 'text' or 'json'.",
            format
        ))),
    }
}

/// Render a summary in the requested format
pub fn format_summary(summary: &BuildSummary, format: &str) -> Result<String, ApiError> {
    check_format(format)?;
    match format {
        "json" => format_build_summary_json(summary),
        _ => Ok(format_build_summary_text(summary)),
    }
}

/// Runtime context for CLI execution: workspace and merged configuration.
pub struct RunContext {
    config: RepoTreeConfig,
    workspace_root: PathBuf,
}

impl RunContext {
    /// Create run context from workspace root and optional config path. Uses ConfigLoader only.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = match config_path {
            Some(ref cfg_path) => ConfigLoader::load_from_file(cfg_path)?,
            None => ConfigLoader::load(&workspace_root)?,
        };
        Self::from_config(workspace_root, config)
    }

    /// Create run context from an already merged configuration.
    pub fn from_config(workspace_root: PathBuf, config: RepoTreeConfig) -> Result<Self, ApiError> {
        config.validate().map_err(|errors| {
            ApiError::ConfigError(
                errors
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; "),
            )
        })?;
        Ok(Self {
            config,
            workspace_root,
        })
    }

    pub fn config(&self) -> &RepoTreeConfig {
        &self.config
    }

    /// Output path: CLI flag as given, configured path relative to the workspace.
    pub fn output_path(&self, cli: &Cli) -> PathBuf {
        match &cli.output {
            Some(path) => path.clone(),
            None if self.config.output.path.is_relative() => {
                self.workspace_root.join(&self.config.output.path)
            }
            None => self.config.output.path.clone(),
        }
    }

    pub fn conflict_policy(&self, cli: &Cli) -> ConflictPolicy {
        if cli.strict {
            ConflictPolicy::Reject
        } else {
            self.config.hierarchy.conflict_policy
        }
    }

    /// Record source selected by the command line.
    pub fn source_for(&self, cli: &Cli) -> Result<Box<dyn PathRecordSource>, ApiError> {
        if let Some(ref listing) = cli.from_file {
            return Ok(Box::new(JsonFileSource::new(listing.clone())));
        }

        let input = cli.repo.as_deref().ok_or_else(|| {
            ApiError::Source(SourceError::InvalidRepository(
                "no repository given".to_string(),
            ))
        })?;
        let repo = RepoRef::parse(input)?;
        let branch = cli
            .branch
            .clone()
            .unwrap_or_else(|| self.config.github.default_branch.clone());
        Ok(Box::new(GitHubTreeSource::new(repo, branch, &self.config.github)?))
    }

    /// Fetch, build and store; returns the formatted summary.
    pub fn execute(&self, cli: &Cli) -> Result<String, ApiError> {
        check_format(&cli.format)?;
        let source = self.source_for(cli)?;
        println!("Fetching tree for {}", source.display_name());
        info!(source = %source.describe(), "Fetching records");

        let runtime = tokio::runtime::Runtime::new().map_err(|e| {
            ApiError::ConfigError(format!("Failed to create async runtime: {}", e))
        })?;
        let records = runtime.block_on(source.fetch_records())?;

        let sink = JsonFileSink::new(self.output_path(cli))
            .with_pretty(self.config.output.pretty && !cli.compact);
        let summary = self.build(source.describe(), &records, self.conflict_policy(cli), &sink)?;

        format_summary(&summary, &cli.format)
    }

    /// Build the hierarchy from fetched records and hand it to the sink.
    pub fn build(
        &self,
        source: String,
        records: &[FlatRecord],
        policy: ConflictPolicy,
        sink: &dyn TreeSink,
    ) -> Result<BuildSummary, ApiError> {
        let start = Instant::now();
        debug!(records = records.len(), ?policy, "Building hierarchy");

        let tree = HierarchyBuilder::new()
            .with_conflict_policy(policy)
            .build(records)?;
        sink.store(&tree)?;

        let summary = BuildSummary {
            source,
            destination: sink.describe(),
            files: tree.file_count(),
            directories: tree.directory_count(),
            total_size: tree.size(),
        };
        info!(
            source = %summary.source,
            destination = %summary.destination,
            duration_ms = start.elapsed().as_millis(),
            "Repository tree written"
        );
        Ok(summary)
    }
}
