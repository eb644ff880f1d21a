//! Repository stacks for the public list.

use std::collections::HashSet;

use crate::state::models::ChangelogSummary;

/// Changelogs of one repository, in the order they were listed
#[derive(Clone, Debug, PartialEq)]
pub struct RepositoryStack {
    repository: String,
    changelogs: Vec<ChangelogSummary>,
}

impl RepositoryStack {
    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn changelogs(&self) -> &[ChangelogSummary] {
        &self.changelogs
    }

    /// Top card of the stack
    pub fn latest(&self) -> Option<&ChangelogSummary> {
        self.changelogs.first()
    }

    /// Cards hidden while collapsed
    pub fn hidden_count(&self) -> usize {
        self.changelogs.len().saturating_sub(1)
    }

    pub fn is_stacked(&self) -> bool {
        self.changelogs.len() > 1
    }
}

/// Group by repository name. Groups appear in order of first appearance and
/// keep the input order within each group.
pub fn group_by_repository(changelogs: Vec<ChangelogSummary>) -> Vec<RepositoryStack> {
    let mut stacks: Vec<RepositoryStack> = Vec::new();
    for changelog in changelogs {
        match stacks.iter_mut().find(|s| s.repository == changelog.repository) {
            Some(stack) => stack.changelogs.push(changelog),
            None => stacks.push(RepositoryStack {
                repository: changelog.repository.clone(),
                changelogs: vec![changelog],
            }),
        }
    }
    stacks
}

/// Which stacks are currently expanded
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExpandedStacks(HashSet<String>);

impl ExpandedStacks {
    pub fn is_expanded(&self, repository: &str) -> bool {
        self.0.contains(repository)
    }

    pub fn toggle(&mut self, repository: &str) {
        if !self.0.remove(repository) {
            self.0.insert(repository.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(id: i64, repository: &str) -> ChangelogSummary {
        ChangelogSummary {
            id,
            title: format!("v{}", id),
            repository: repository.into(),
            created_at: "2024-01-01T00:00:00Z".into(),
            published: true,
            content_preview: String::new(),
        }
    }

    #[test]
    fn test_groups_in_first_appearance_order() {
        let stacks = group_by_repository(vec![
            summary(5, "acme/widgets"),
            summary(4, "acme/gadgets"),
            summary(3, "acme/widgets"),
            summary(2, "acme/tools"),
            summary(1, "acme/gadgets"),
        ]);

        let names: Vec<&str> = stacks.iter().map(|s| s.repository()).collect();
        assert_eq!(names, vec!["acme/widgets", "acme/gadgets", "acme/tools"]);

        let widget_ids: Vec<i64> = stacks[0].changelogs().iter().map(|c| c.id).collect();
        assert_eq!(widget_ids, vec![5, 3]);
        assert_eq!(stacks[0].latest().map(|c| c.id), Some(5));
        assert_eq!(stacks[0].hidden_count(), 1);
        assert!(!stacks[2].is_stacked());
    }

    #[test]
    fn test_every_changelog_appears_once() {
        let input: Vec<ChangelogSummary> = (0..20)
            .map(|i| summary(i, ["a/x", "b/y", "c/z"][(i % 3) as usize]))
            .collect();
        let stacks = group_by_repository(input.clone());

        let total: usize = stacks.iter().map(|s| s.changelogs().len()).sum();
        assert_eq!(total, input.len());
        for changelog in &input {
            let holders: Vec<&RepositoryStack> = stacks
                .iter()
                .filter(|s| s.changelogs().iter().any(|c| c.id == changelog.id))
                .collect();
            assert_eq!(holders.len(), 1);
            assert_eq!(holders[0].repository(), changelog.repository);
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(group_by_repository(Vec::new()).is_empty());
    }

    #[test]
    fn test_expanded_toggle() {
        let mut expanded = ExpandedStacks::default();
        assert!(!expanded.is_expanded("acme/widgets"));
        expanded.toggle("acme/widgets");
        assert!(expanded.is_expanded("acme/widgets"));
        assert!(!expanded.is_expanded("acme/gadgets"));
        expanded.toggle("acme/widgets");
        assert!(!expanded.is_expanded("acme/widgets"));
    }
}
