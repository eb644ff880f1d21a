//! GitHub access
//!
//! - **client**: reqwest implementation of [`GitHubApi`]
//! - **types**: repositories, commits and the OAuth user
//!
//! Everything the API layer needs from GitHub goes through the
//! [`GitHubApi`] trait so routes can be exercised against a stub.

mod client;
mod types;

pub use client::GitHubClient;
pub use types::{
    Commit, CommitAuthor, CommitFile, CommitQuery, CommitStats, GitHubUser, Repository,
    MAX_PATCH_LENGTH,
};

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

/// Operations the server performs against GitHub on behalf of a user
#[async_trait]
pub trait GitHubApi: Send + Sync {
    /// Browser URL that starts the OAuth authorization flow
    fn authorize_url(&self, redirect_uri: &str, state: &str) -> Result<String, GitHubError>;

    /// Trade an OAuth code for a user access token
    async fn exchange_code(&self, code: &str, redirect_uri: &str) -> Result<String, GitHubError>;

    /// The account behind `token`
    async fn current_user(&self, token: &str) -> Result<GitHubUser, GitHubError>;

    /// Repositories owned by the user on which they hold admin rights
    async fn list_repositories(&self, token: &str) -> Result<Vec<Repository>, GitHubError>;

    /// Commit shas in the query window, newest first
    async fn list_commits(
        &self,
        token: &str,
        owner: &str,
        repo: &str,
        query: &CommitQuery,
    ) -> Result<Vec<String>, GitHubError>;

    /// A single commit with stats and changed files
    async fn commit_details(
        &self,
        token: &str,
        owner: &str,
        repo: &str,
        sha: &str,
    ) -> Result<Commit, GitHubError>;

    /// List commits, then fetch each one's details in order.
    ///
    /// Commits whose details cannot be fetched are skipped.
    async fn commits_with_details(
        &self,
        token: &str,
        owner: &str,
        repo: &str,
        query: &CommitQuery,
    ) -> Result<Vec<Commit>, GitHubError> {
        let shas = self.list_commits(token, owner, repo, query).await?;

        let mut commits = Vec::with_capacity(shas.len().min(query.max_commits));
        for sha in shas.iter().take(query.max_commits) {
            match self.commit_details(token, owner, repo, sha).await {
                Ok(commit) => commits.push(commit),
                Err(e) => {
                    tracing::warn!(%sha, error = %e, "Skipping commit whose details failed");
                }
            }
        }

        Ok(commits)
    }
}

/// Expand a bare `YYYY-MM-DD` into the midnight-UTC timestamp GitHub expects.
///
/// Anything else is passed through untouched.
pub fn normalize_date(date: &str) -> String {
    let date = date.trim();
    if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok() {
        format!("{date}T00:00:00Z")
    } else {
        date.to_string()
    }
}

/// Errors that can occur talking to GitHub
#[derive(Error, Debug)]
pub enum GitHubError {
    #[error("GitHub OAuth not properly configured")]
    NotConfigured,

    #[error("Invalid GitHub token")]
    InvalidToken,

    #[error("GitHub API rate limit exceeded")]
    RateLimited,

    #[error("{0} not found")]
    NotFound(String),

    #[error("GitHub API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("OAuth error: {0}")]
    OAuth(String),

    #[error("GitHub request timeout")]
    Timeout,

    #[error("GitHub unavailable")]
    Unavailable,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
}

impl GitHubError {
    pub(crate) fn from_reqwest(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            GitHubError::Timeout
        } else if e.is_connect() {
            GitHubError::Unavailable
        } else {
            GitHubError::Request(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_bare_date() {
        assert_eq!(normalize_date("2024-01-15"), "2024-01-15T00:00:00Z");
    }

    #[test]
    fn test_normalize_passes_timestamps_through() {
        assert_eq!(
            normalize_date("2024-01-15T12:30:00Z"),
            "2024-01-15T12:30:00Z"
        );
        assert_eq!(normalize_date("last week"), "last week");
    }
}
