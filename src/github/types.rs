//! GitHub data types
//!
//! Public types are what the API hands to the SPA; the `Raw*` types mirror
//! the GitHub REST payloads they are converted from.

use serde::{Deserialize, Serialize};

/// Longest patch kept per changed file, in characters
pub const MAX_PATCH_LENGTH: usize = 5000;

/// The signed-in GitHub account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GitHubUser {
    pub id: i64,
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub avatar_url: String,
}

/// A repository the user administers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Repository {
    pub id: i64,
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub language: Option<String>,
    pub default_branch: String,
    pub updated_at: String,
    pub private: bool,
}

/// A commit with its changed files
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Commit {
    pub sha: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub author: CommitAuthor,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub stats: Option<CommitStats>,
    #[serde(default)]
    pub files: Vec<CommitFile>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CommitAuthor {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub date: String,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct CommitStats {
    #[serde(default)]
    pub additions: u32,
    #[serde(default)]
    pub deletions: u32,
    #[serde(default)]
    pub total: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommitFile {
    pub filename: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub additions: u32,
    #[serde(default)]
    pub deletions: u32,
    #[serde(default)]
    pub changes: u32,
    #[serde(default)]
    pub patch: Option<String>,
}

/// Date window and cap for a commit listing
#[derive(Debug, Clone, Default)]
pub struct CommitQuery {
    pub since: Option<String>,
    pub until: Option<String>,
    pub max_commits: usize,
}

// ============================================
// GitHub REST payloads
// ============================================

#[derive(Debug, Deserialize)]
pub(crate) struct RawRepository {
    pub id: i64,
    pub name: String,
    pub full_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub default_branch: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub permissions: Option<RawPermissions>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawPermissions {
    #[serde(default)]
    pub admin: bool,
}

impl RawRepository {
    pub fn is_admin(&self) -> bool {
        self.permissions.as_ref().map(|p| p.admin).unwrap_or(false)
    }
}

impl From<RawRepository> for Repository {
    fn from(raw: RawRepository) -> Self {
        Self {
            id: raw.id,
            name: raw.name,
            full_name: raw.full_name,
            description: raw.description,
            language: raw.language,
            default_branch: raw.default_branch,
            updated_at: raw.updated_at,
            private: raw.private,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawCommitSummary {
    pub sha: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawCommitDetail {
    pub sha: String,
    #[serde(default)]
    pub html_url: String,
    pub commit: RawCommitData,
    #[serde(default)]
    pub stats: Option<CommitStats>,
    #[serde(default)]
    pub files: Vec<RawCommitFile>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawCommitData {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub author: Option<CommitAuthor>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawCommitFile {
    pub filename: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub additions: u32,
    #[serde(default)]
    pub deletions: u32,
    #[serde(default)]
    pub changes: u32,
    #[serde(default)]
    pub patch: Option<String>,
}

impl From<RawCommitDetail> for Commit {
    fn from(raw: RawCommitDetail) -> Self {
        let files = raw
            .files
            .into_iter()
            .map(|f| CommitFile {
                filename: f.filename,
                status: f.status,
                additions: f.additions,
                deletions: f.deletions,
                changes: f.changes,
                patch: f.patch.map(|p| truncate_chars(&p, MAX_PATCH_LENGTH)),
            })
            .collect();

        Self {
            sha: raw.sha,
            message: raw.commit.message,
            author: raw.commit.author.unwrap_or_default(),
            url: raw.html_url,
            stats: raw.stats,
            files,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_detail_conversion_truncates_patch() {
        let raw: RawCommitDetail = serde_json::from_value(serde_json::json!({
            "sha": "abc123def456",
            "html_url": "https://github.com/acme/widgets/commit/abc123def456",
            "commit": {
                "message": "Add stacks",
                "author": {"name": "Ada", "email": "ada@example.com", "date": "2024-01-02T03:04:05Z"}
            },
            "stats": {"additions": 3, "deletions": 1, "total": 4},
            "files": [
                {"filename": "src/lib.rs", "status": "modified", "additions": 3, "deletions": 1, "changes": 4,
                 "patch": "+".repeat(6000)}
            ]
        }))
        .unwrap();

        let commit = Commit::from(raw);
        assert_eq!(commit.author.name, "Ada");
        assert_eq!(commit.url, "https://github.com/acme/widgets/commit/abc123def456");
        assert_eq!(commit.stats.unwrap().total, 4);
        assert_eq!(
            commit.files[0].patch.as_ref().unwrap().chars().count(),
            MAX_PATCH_LENGTH
        );
    }

    #[test]
    fn test_commit_accepts_sparse_client_payload() {
        let commit: Commit = serde_json::from_value(serde_json::json!({
            "sha": "abc",
            "message": "Fix typo"
        }))
        .unwrap();
        assert!(commit.files.is_empty());
        assert!(commit.stats.is_none());
    }

    #[test]
    fn test_admin_filter_flag() {
        let raw: RawRepository = serde_json::from_value(serde_json::json!({
            "id": 1, "name": "widgets", "full_name": "acme/widgets",
            "default_branch": "main", "updated_at": "2024-01-01T00:00:00Z", "private": false,
            "permissions": {"admin": true, "push": true}
        }))
        .unwrap();
        assert!(raw.is_admin());

        let raw: RawRepository = serde_json::from_value(serde_json::json!({
            "id": 2, "name": "gadgets", "full_name": "acme/gadgets"
        }))
        .unwrap();
        assert!(!raw.is_admin());
    }
}
