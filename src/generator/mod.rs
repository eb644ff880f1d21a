//! Changelog generation
//!
//! Turns a set of selected commits into a markdown changelog using an
//! OpenAI-compatible chat completions endpoint.

mod openai;

pub use openai::OpenAiGenerator;

use async_trait::async_trait;
use thiserror::Error;

use crate::github::Commit;

/// System message sent with every generation request
pub const SYSTEM_PROMPT: &str =
    "You are a helpful assistant that creates clear, user-friendly changelogs from commit data.";

/// Patch lines included per changed file
const PATCH_PREVIEW_LINES: usize = 10;

/// Writes changelog text for a set of commits
#[async_trait]
pub trait ChangelogGenerator: Send + Sync {
    /// Whether the generator has the credentials it needs
    fn is_configured(&self) -> bool;

    /// Produce markdown for `commits`; may be empty if the model returned nothing
    async fn generate(&self, repository: &str, commits: &[Commit]) -> Result<String, GeneratorError>;
}

/// Render commits as the plain-text block embedded in the prompt
pub fn format_commits(commits: &[Commit]) -> String {
    let mut text = String::from("COMMITS AND CHANGES:\n\n");

    for (i, commit) in commits.iter().enumerate() {
        let short_sha: String = commit.sha.chars().take(8).collect();

        text.push_str(&format!("COMMIT {}:\n", i + 1));
        text.push_str(&format!("SHA: {short_sha}\n"));
        text.push_str(&format!("Author: {}\n", commit.author.name));
        text.push_str(&format!("Date: {}\n", commit.author.date));
        text.push_str(&format!("Message: {}\n", commit.message));

        if let Some(stats) = commit.stats.filter(|s| s.total > 0) {
            text.push_str(&format!(
                "Stats: +{} -{} changes\n",
                stats.additions, stats.deletions
            ));
        }

        if !commit.files.is_empty() {
            text.push_str("Files changed:\n");
            for file in &commit.files {
                text.push_str(&format!("  - {} ({})\n", file.filename, file.status));
                if let Some(patch) = file.patch.as_deref().filter(|p| !p.is_empty()) {
                    let head: Vec<&str> = patch.split('\n').take(PATCH_PREVIEW_LINES).collect();
                    text.push_str(&format!("    Diff: {}\n", head.join("\n")));
                }
            }
        }

        text.push_str(&format!("\n{}\n\n", "-".repeat(50)));
    }

    text
}

/// User message asking for a sectioned markdown changelog
pub fn build_prompt(repository: &str, commits: &[Commit]) -> String {
    format!(
        r#"Given the following commit messages and code changes from the GitHub repository {repository}, create a user-friendly changelog that summarizes the changes in a clear, organized way.

Focus on:
- User-visible changes and new features
- Bug fixes and improvements
- Breaking changes (if any)
- Technical improvements that affect users

Format as a markdown changelog with appropriate sections (Features, Bug Fixes, Improvements, Breaking Changes).

{}
Please create a changelog:
"#,
        format_commits(commits)
    )
}

/// Errors that can occur while generating a changelog
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("OpenAI API not configured")]
    NotConfigured,

    #[error("OpenAI API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("OpenAI API rate limited")]
    RateLimited,

    #[error("OpenAI request timeout")]
    Timeout,

    #[error("OpenAI API unavailable")]
    Unavailable,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::{CommitAuthor, CommitFile, CommitStats};

    fn commit(sha: &str, message: &str) -> Commit {
        Commit {
            sha: sha.to_string(),
            message: message.to_string(),
            author: CommitAuthor {
                name: "Ada".into(),
                email: "ada@example.com".into(),
                date: "2024-01-02T00:00:00Z".into(),
            },
            url: String::new(),
            stats: None,
            files: Vec::new(),
        }
    }

    #[test]
    fn test_format_commits_basic_fields() {
        let text = format_commits(&[commit("0123456789abcdef", "Add stacks")]);
        assert!(text.starts_with("COMMITS AND CHANGES:\n\nCOMMIT 1:\nSHA: 01234567\n"));
        assert!(text.contains("Author: Ada\n"));
        assert!(text.contains("Message: Add stacks\n"));
        assert!(!text.contains("Stats:"));
        assert!(!text.contains("Files changed:"));
    }

    #[test]
    fn test_format_commits_stats_and_patch_head() {
        let mut c = commit("abcdef0123", "Fix parser");
        c.stats = Some(CommitStats {
            additions: 12,
            deletions: 3,
            total: 15,
        });
        let patch: Vec<String> = (0..20).map(|i| format!("+line {i}")).collect();
        c.files.push(CommitFile {
            filename: "src/parser.rs".into(),
            status: "modified".into(),
            additions: 12,
            deletions: 3,
            changes: 15,
            patch: Some(patch.join("\n")),
        });

        let text = format_commits(&[c]);
        assert!(text.contains("Stats: +12 -3 changes\n"));
        assert!(text.contains("  - src/parser.rs (modified)\n"));
        assert!(text.contains("+line 9\n"));
        assert!(!text.contains("+line 10"));
    }

    #[test]
    fn test_zero_stats_are_omitted() {
        let mut c = commit("abc", "Empty");
        c.stats = Some(CommitStats::default());
        assert!(!format_commits(&[c]).contains("Stats:"));
    }

    #[test]
    fn test_prompt_mentions_sections_and_commits() {
        let prompt = build_prompt("acme/widgets", &[commit("abc", "Add stacks")]);
        assert!(prompt.contains("acme/widgets"));
        assert!(prompt.contains("Features, Bug Fixes, Improvements"));
        assert!(prompt.contains("Message: Add stacks"));
    }
}
