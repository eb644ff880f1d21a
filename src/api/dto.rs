//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use serde::{Deserialize, Serialize};

use crate::github::{Commit, GitHubUser, Repository};
use crate::storage::{Changelog, ChangelogSummary};

/// Default number of commits fetched per request
pub const DEFAULT_MAX_COMMITS: usize = 50;

/// Hard cap on commits fetched per request
pub const MAX_COMMITS_LIMIT: usize = 100;

// ============================================
// AUTH DTOs
// ============================================

/// User as reported by `/auth/status`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: i64,
    pub login: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar_url: String,
    pub authenticated: bool,
}

impl From<GitHubUser> for UserInfo {
    fn from(user: GitHubUser) -> Self {
        Self {
            id: user.id,
            login: user.login,
            name: user.name,
            email: user.email,
            avatar_url: user.avatar_url,
            authenticated: true,
        }
    }
}

/// Response for `GET /auth/status`
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthStatusResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub user: Option<UserInfo>,
}

/// Response for `GET /auth/github/login`
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub authorization_url: String,
}

/// Query string GitHub sends back to the callback
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

/// Plain `{message}` response
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

// ============================================
// REPOSITORY DTOs
// ============================================

/// Response for `GET /api/v1/repositories`
#[derive(Debug, Serialize)]
pub struct RepositoriesResponse {
    pub status: String,
    pub count: usize,
    pub repositories: Vec<Repository>,
}

// ============================================
// CHANGELOG DTOs
// ============================================

/// Request for `POST /api/v1/changelogs/fetch-commits`
#[derive(Debug, Deserialize)]
pub struct FetchCommitsRequest {
    pub owner: String,
    pub repo: String,
    #[serde(default)]
    pub since_date: Option<String>,
    #[serde(default)]
    pub until_date: Option<String>,
    #[serde(default)]
    pub max_commits: Option<usize>,
}

impl FetchCommitsRequest {
    /// Requested commit count, defaulted and clamped to `1..=100`
    pub fn commit_limit(&self) -> usize {
        self.max_commits
            .unwrap_or(DEFAULT_MAX_COMMITS)
            .clamp(1, MAX_COMMITS_LIMIT)
    }
}

/// Response for `POST /api/v1/changelogs/fetch-commits`
#[derive(Debug, Serialize)]
pub struct FetchCommitsResponse {
    pub status: String,
    pub commits: Vec<Commit>,
    pub count: usize,
}

/// Request for `POST /api/v1/changelogs/generate`
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub owner: String,
    pub repo: String,
    pub commits: Vec<Commit>,
    pub selected_commit_shas: Vec<String>,
}

impl GenerateRequest {
    /// Commits whose sha was selected, in the order they were sent
    pub fn selected_commits(&self) -> Vec<Commit> {
        self.commits
            .iter()
            .filter(|c| self.selected_commit_shas.iter().any(|s| s == &c.sha))
            .cloned()
            .collect()
    }
}

/// Response for `POST /api/v1/changelogs/generate`
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub status: String,
    pub changelog: String,
}

/// Request for `POST /api/v1/changelogs/save`
#[derive(Debug, Deserialize)]
pub struct SaveChangelogRequest {
    pub title: String,
    pub content: String,
    pub repository: String,
    pub commit_range: String,
    #[serde(default)]
    pub raw_commits: serde_json::Value,
    #[serde(default)]
    pub published: bool,
}

/// Response for `POST /api/v1/changelogs/save`
#[derive(Debug, Serialize)]
pub struct SaveChangelogResponse {
    pub status: String,
    pub changelog_id: i64,
    pub message: String,
}

/// Query for `GET /api/v1/changelogs/`
#[derive(Debug, Default, Deserialize)]
pub struct ListChangelogsQuery {
    #[serde(default)]
    pub published_only: bool,
}

/// Response for `GET /api/v1/changelogs/`
#[derive(Debug, Serialize)]
pub struct ListChangelogsResponse {
    pub status: String,
    pub changelogs: Vec<ChangelogSummary>,
}

/// Response for `GET /api/v1/changelogs/:id`
#[derive(Debug, Serialize)]
pub struct ChangelogResponse {
    pub status: String,
    pub changelog: Changelog,
}

/// `{status, message}` response for update and delete
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
    pub message: String,
}

impl StatusResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
        }
    }
}

// ============================================
// HEALTH DTOs
// ============================================

/// Full health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "healthy", "degraded" or "unhealthy"
    pub status: String,
    /// Changelog store status
    pub storage: String,
    /// Whether GitHub OAuth credentials are present
    pub github_oauth: bool,
    /// Whether the LLM API key is present
    pub llm: bool,
    /// Sessions currently held
    pub sessions: usize,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Server version
    pub version: String,
}
