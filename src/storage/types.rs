//! Core data types for the changelog store
//!
//! - `Changelog`: a stored changelog with its commit snapshot
//! - `NewChangelog`: what the save endpoint inserts
//! - `ChangelogUpdate`: a partial update
//! - `ChangelogSummary`: list view with a content preview

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Length budget for list previews, in characters
pub const PREVIEW_LENGTH: usize = 300;

/// A persisted changelog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Changelog {
    pub id: i64,
    pub title: String,
    pub content: String,
    /// Login of the user who saved it
    pub author: String,
    /// `owner/repo`
    pub repository: String,
    /// Free-form range descriptor, e.g. `since: 2024-01-01`
    pub commit_range: String,
    /// Snapshot of the commits the changelog was generated from
    #[serde(default)]
    pub raw_commits: serde_json::Value,
    pub published: bool,
    pub created_at: DateTime<Utc>,
}

impl Changelog {
    /// Build the list-view summary of this changelog
    pub fn summary(&self) -> ChangelogSummary {
        ChangelogSummary {
            id: self.id,
            title: self.title.clone(),
            repository: self.repository.clone(),
            created_at: self.created_at,
            published: self.published,
            content_preview: content_preview(&self.content, PREVIEW_LENGTH),
        }
    }
}

/// Insert parameters for a changelog
#[derive(Debug, Clone)]
pub struct NewChangelog {
    pub title: String,
    pub content: String,
    pub author: String,
    pub repository: String,
    pub commit_range: String,
    pub raw_commits: serde_json::Value,
    pub published: bool,
}

/// Partial update; `None` fields are left untouched
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChangelogUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub published: Option<bool>,
}

impl ChangelogUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.published.is_none()
    }

    /// Apply this update to a changelog in place
    pub fn apply(&self, changelog: &mut Changelog) {
        if let Some(title) = &self.title {
            changelog.title = title.clone();
        }
        if let Some(content) = &self.content {
            changelog.content = content.clone();
        }
        if let Some(published) = self.published {
            changelog.published = published;
        }
    }
}

/// List entry returned by `GET /api/v1/changelogs/`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChangelogSummary {
    pub id: i64,
    pub title: String,
    pub repository: String,
    pub created_at: DateTime<Utc>,
    pub published: bool,
    pub content_preview: String,
}

/// Cut markdown down to whole lines fitting in `max_length` characters.
///
/// Returns the content untouched when it already fits; otherwise keeps the
/// leading lines that fit and appends a blank line plus `...`.
pub fn content_preview(content: &str, max_length: usize) -> String {
    if content.chars().count() <= max_length {
        return content.to_string();
    }

    let mut kept: Vec<&str> = Vec::new();
    let mut used = 0;

    for line in content.split('\n') {
        let cost = line.chars().count() + 1;
        if used + cost > max_length {
            break;
        }
        kept.push(line);
        used += cost;
    }

    let mut preview = kept.join("\n");
    preview.push_str("\n\n...");
    preview
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_content_untouched() {
        let content = "## Features\n- Added stacks";
        assert_eq!(content_preview(content, 300), content);
    }

    #[test]
    fn test_preview_cuts_on_line_boundary() {
        let content = "line one\nline two\nline three";
        // "line one\n" = 9, "line two\n" = 9, third line does not fit in 20
        let preview = content_preview(content, 20);
        assert_eq!(preview, "line one\nline two\n\n...");
    }

    #[test]
    fn test_preview_of_single_long_line() {
        let content = "x".repeat(400);
        assert_eq!(content_preview(&content, 300), "\n\n...");
    }

    #[test]
    fn test_preview_counts_characters_not_bytes() {
        let content = "é".repeat(10);
        assert_eq!(content_preview(&content, 10), content);
    }

    #[test]
    fn test_update_apply_is_partial() {
        let mut changelog = Changelog {
            id: 1,
            title: "Draft".into(),
            content: "body".into(),
            author: "octocat".into(),
            repository: "acme/widgets".into(),
            commit_range: "since: 2024-01-01".into(),
            raw_commits: serde_json::Value::Null,
            published: false,
            created_at: Utc::now(),
        };

        let update = ChangelogUpdate {
            published: Some(true),
            ..Default::default()
        };
        assert!(!update.is_empty());
        update.apply(&mut changelog);

        assert!(changelog.published);
        assert_eq!(changelog.title, "Draft");
        assert_eq!(changelog.content, "body");
    }
}
