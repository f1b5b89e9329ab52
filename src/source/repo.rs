//! Repository identifier parsing

use crate::error::SourceError;
use std::fmt;
use std::str::FromStr;

const GITHUB_HOST: &str = "github.com";

/// Owner and name of a GitHub repository
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Parse a repository identifier
    ///
    /// Accepts `https://github.com/<owner>/<repo>[/...]`, `github.com/<owner>/<repo>`,
    /// `git@github.com:<owner>/<repo>.git` and the `<owner>/<repo>` shorthand.
    /// A trailing `.git` is stripped from the repository name.
    pub fn parse(input: &str) -> Result<Self, SourceError> {
        let trimmed = input.trim();
        let invalid = || SourceError::InvalidRepository(input.to_string());

        let (rest, shorthand) = match trimmed.find(GITHUB_HOST) {
            Some(idx) => {
                let after = &trimmed[idx + GITHUB_HOST.len()..];
                let rest = after
                    .strip_prefix('/')
                    .or_else(|| after.strip_prefix(':'))
                    .ok_or_else(invalid)?;
                (rest, false)
            }
            None if !trimmed.contains("://") => (trimmed, true),
            None => return Err(invalid()),
        };

        let rest = rest.split(['?', '#']).next().unwrap_or_default();
        let mut parts = rest.split('/');
        let owner = parts.next().filter(|s| is_valid_segment(s)).ok_or_else(invalid)?;
        let repo = parts.next().filter(|s| !s.is_empty()).ok_or_else(invalid)?;
        if shorthand && parts.next().is_some() {
            return Err(invalid());
        }

        let repo = repo.strip_suffix(".git").unwrap_or(repo);
        if !is_valid_segment(repo) {
            return Err(invalid());
        }

        Ok(Self::new(owner, repo))
    }
}

fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty() && !segment.chars().any(char::is_whitespace)
}

impl FromStr for RepoRef {
    type Err = SourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}
