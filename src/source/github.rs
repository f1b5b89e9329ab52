//! GitHub git-trees API source

use crate::error::SourceError;
use crate::source::repo::RepoRef;
use crate::source::{records_from_entries, PathRecordSource, TreeListing};
use crate::types::FlatRecord;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";
const TOKEN_ENV: &str = "GITHUB_TOKEN";
const HTTP_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// GitHub API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
    /// API root, overridable for GitHub Enterprise
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Access token; falls back to `$GITHUB_TOKEN` when unset
    #[serde(default)]
    pub token: Option<String>,

    /// Branch used when none is given on the command line
    #[serde(default = "default_branch")]
    pub default_branch: String,

    /// Whole-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_request_timeout_secs() -> u64 {
    60
}

fn default_user_agent() -> String {
    concat!("repotree/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            token: None,
            default_branch: default_branch(),
            request_timeout_secs: default_request_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl GitHubConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.api_base.trim().is_empty() {
            return Err("API base URL cannot be empty".to_string());
        }
        if self.default_branch.trim().is_empty() {
            return Err("Default branch cannot be empty".to_string());
        }
        if self.request_timeout_secs == 0 {
            return Err("Request timeout must be greater than zero".to_string());
        }
        Ok(())
    }

    /// Configured token, else `$GITHUB_TOKEN`; empty values count as unset
    pub fn resolve_token(&self) -> Option<String> {
        self.token
            .clone()
            .or_else(|| std::env::var(TOKEN_ENV).ok())
            .filter(|token| !token.trim().is_empty())
    }
}

#[derive(Deserialize)]
struct BranchResponse {
    commit: BranchCommit,
}

#[derive(Deserialize)]
struct BranchCommit {
    sha: String,
}

fn map_http_error(error: reqwest::Error) -> SourceError {
    if error.is_timeout() {
        SourceError::RequestFailed(format!("Request timeout: {}", error))
    } else if error.is_connect() {
        SourceError::RequestFailed(format!("Connection error: {}", error))
    } else if error.is_decode() {
        SourceError::MalformedResponse(error.to_string())
    } else {
        SourceError::Http(error.to_string())
    }
}

/// Map non-success statuses; GitHub reports exhausted quotas as 403 or 429
async fn check_status(response: Response, what: &str) -> Result<Response, SourceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let quota_exhausted = response
        .headers()
        .get("x-ratelimit-remaining")
        .and_then(|value| value.to_str().ok())
        == Some("0");
    let body = response.text().await.unwrap_or_default();
    let detail = format!("{} returned {}: {}", what, status, body.trim());

    Err(match status {
        StatusCode::TOO_MANY_REQUESTS => SourceError::RateLimited(detail),
        StatusCode::FORBIDDEN if quota_exhausted => SourceError::RateLimited(detail),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => SourceError::AuthFailed(detail),
        StatusCode::NOT_FOUND => SourceError::NotFound(detail),
        _ => SourceError::RequestFailed(detail),
    })
}

/// Records from one branch of a GitHub repository
///
/// Resolves the branch head, then fetches the recursive tree for that commit.
pub struct GitHubTreeSource {
    client: Client,
    api_base: String,
    token: Option<String>,
    repo: RepoRef,
    branch: String,
}

impl GitHubTreeSource {
    pub fn new(repo: RepoRef, branch: String, config: &GitHubConfig) -> Result<Self, SourceError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .connect_timeout(HTTP_CONNECT_TIMEOUT)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| SourceError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            token: config.resolve_token(),
            repo,
            branch,
        })
    }

    pub fn repo(&self) -> &RepoRef {
        &self.repo
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    fn get(&self, url: &str) -> RequestBuilder {
        let request = self.client.get(url).header(ACCEPT, GITHUB_ACCEPT);
        match &self.token {
            Some(token) => request.header(AUTHORIZATION, format!("Bearer {}", token)),
            None => request,
        }
    }

    /// Commit SHA at the head of the configured branch
    #[instrument(skip(self), fields(repo = %self.repo, branch = %self.branch))]
    pub async fn resolve_branch_sha(&self) -> Result<String, SourceError> {
        let url = format!(
            "{}/repos/{}/{}/branches/{}",
            self.api_base, self.repo.owner, self.repo.repo, self.branch
        );
        let response = self.get(&url).send().await.map_err(map_http_error)?;
        let response = check_status(response, "branch lookup").await?;
        let branch: BranchResponse = response.json().await.map_err(map_http_error)?;
        debug!(sha = %branch.commit.sha, "Resolved branch head");
        Ok(branch.commit.sha)
    }

    /// Recursive tree listing for a commit or tree SHA
    #[instrument(skip(self), fields(repo = %self.repo))]
    pub async fn fetch_listing(&self, sha: &str) -> Result<TreeListing, SourceError> {
        let url = format!(
            "{}/repos/{}/{}/git/trees/{}?recursive=1",
            self.api_base, self.repo.owner, self.repo.repo, sha
        );
        let response = self.get(&url).send().await.map_err(map_http_error)?;
        let response = check_status(response, "tree listing").await?;
        response.json().await.map_err(map_http_error)
    }
}

#[async_trait]
impl PathRecordSource for GitHubTreeSource {
    async fn fetch_records(&self) -> Result<Vec<FlatRecord>, SourceError> {
        let start = Instant::now();
        let sha = self.resolve_branch_sha().await?;
        let listing = self.fetch_listing(&sha).await?;
        if listing.truncated {
            warn!(
                repo = %self.repo,
                entries = listing.tree.len(),
                "GitHub truncated the tree listing; the result is incomplete"
            );
        }

        let records = records_from_entries(listing.tree);
        info!(
            repo = %self.repo,
            branch = %self.branch,
            records = records.len(),
            duration_ms = start.elapsed().as_millis(),
            "Fetched repository listing"
        );
        Ok(records)
    }

    fn describe(&self) -> String {
        format!("{}@{}", self.repo, self.branch)
    }

    fn display_name(&self) -> String {
        self.repo.to_string()
    }
}
