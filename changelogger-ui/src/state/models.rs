//! API Models
//!
//! Records exchanged with the Changelogger server.

use serde::{Deserialize, Serialize};

/// Signed-in GitHub user
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct User {
    pub id: i64,
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub authenticated: bool,
}

impl User {
    /// Display name, falling back to the login
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.login)
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Repository {
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
}

/// Split `owner/repo` into its two non-empty halves
pub fn split_full_name(full_name: &str) -> Option<(&str, &str)> {
    let (owner, repo) = full_name.trim().split_once('/')?;
    if owner.is_empty() || repo.is_empty() || repo.contains('/') {
        return None;
    }
    Some((owner, repo))
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct CommitAuthor {
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub date: String,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct CommitStats {
    pub additions: u64,
    pub deletions: u64,
    pub total: u64,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct CommitFile {
    pub filename: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub additions: u64,
    #[serde(default)]
    pub deletions: u64,
    #[serde(default)]
    pub changes: u64,
    #[serde(default)]
    pub patch: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Commit {
    pub sha: String,
    pub message: String,
    pub author: CommitAuthor,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub stats: Option<CommitStats>,
    #[serde(default)]
    pub files: Vec<CommitFile>,
}

impl Commit {
    pub fn short_sha(&self) -> &str {
        self.sha.get(..8).unwrap_or(&self.sha)
    }

    /// Subject line of the commit message
    pub fn subject(&self) -> &str {
        self.message.lines().next().unwrap_or_default()
    }

    /// e.g. `4 files changed: a.rs, b.rs, c.rs +1 more`
    pub fn files_summary(&self) -> Option<String> {
        let count = self.files.len();
        if count == 0 {
            return None;
        }
        let shown: Vec<&str> = self.files.iter().take(3).map(|f| f.filename.as_str()).collect();
        let mut summary = format!(
            "{} file{} changed: {}",
            count,
            if count == 1 { "" } else { "s" },
            shown.join(", ")
        );
        if count > 3 {
            summary.push_str(&format!(" +{} more", count - 3));
        }
        Some(summary)
    }
}

/// Full changelog record
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Changelog {
    pub id: i64,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub author: String,
    pub repository: String,
    #[serde(default)]
    pub commit_range: String,
    #[serde(default)]
    pub raw_commits: serde_json::Value,
    pub published: bool,
    pub created_at: String,
}

/// List entry
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ChangelogSummary {
    pub id: i64,
    pub title: String,
    pub repository: String,
    pub created_at: String,
    pub published: bool,
    #[serde(default)]
    pub content_preview: String,
}

/// Render an RFC 3339 timestamp as a calendar date, or return it untouched
pub fn format_date(timestamp: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(timestamp)
        .map(|dt| dt.format("%b %-d, %Y").to_string())
        .unwrap_or_else(|_| timestamp.to_string())
}
