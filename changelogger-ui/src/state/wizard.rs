//! Dashboard Wizard
//!
//! Three-step flow from a repository to a saved changelog:
//! `SelectRepo -> SelectCommits -> EditChangelog`.
//!
//! Each network-backed transition is split into `begin_*`, which validates
//! the form and hands out a [`Ticket`] plus the request to send, and
//! `finish_*`, which applies the response. Only one request may be pending
//! at a time, and a response whose ticket is no longer pending (because the
//! user went back, or a newer request replaced it) is dropped.

use std::collections::HashSet;

use leptos::{create_memo, Memo, RwSignal, SignalWith};

use crate::api::{ApiError, FetchCommitsRequest, GenerateRequest, SaveChangelogRequest};
use crate::state::models::{split_full_name, Commit};

pub const DEFAULT_MAX_COMMITS: usize = 50;
pub const DEFAULT_LOOKBACK_DAYS: i64 = 30;

/// Replaces an empty generation result
pub const EMPTY_GENERATION: &str = "No changelog generated.";

const FETCH_FAILED: &str = "Failed to fetch commits. Please try again.";
const GENERATE_FAILED: &str = "Failed to generate changelog. Please try again.";
const SAVE_FAILED: &str = "Failed to save changelog. Please try again.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    SelectRepo,
    SelectCommits,
    EditChangelog,
}

impl Step {
    pub fn number(self) -> usize {
        match self {
            Step::SelectRepo => 1,
            Step::SelectCommits => 2,
            Step::EditChangelog => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Step::SelectRepo => "Select Repository",
            Step::SelectCommits => "Select Commits",
            Step::EditChangelog => "Edit & Publish",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Fetch,
    Generate,
    Save,
}

/// Identifies one in-flight request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket {
    operation: Operation,
    id: u64,
}

impl Ticket {
    pub fn operation(&self) -> Operation {
        self.operation
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    #[error("Please select a repository and specify a date.")]
    MissingRepository,

    #[error("Invalid repository selection.")]
    InvalidRepository,

    #[error("Please select at least one commit.")]
    NoCommitsSelected,

    #[error("Please provide a title and content for the changelog.")]
    MissingTitleOrContent,

    #[error("Not available at this step")]
    WrongStep,

    #[error("A request is already in progress")]
    Busy,
}

/// Wizard state. Form inputs are public; everything the flow derives from
/// responses goes through methods.
#[derive(Clone, Debug)]
pub struct Wizard {
    /// `owner/repo`
    pub repository: String,
    /// `YYYY-MM-DD`
    pub since_date: String,
    pub max_commits: usize,
    pub title: String,
    pub content: String,
    step: Step,
    commits: Vec<Commit>,
    selected: HashSet<String>,
    error: Option<String>,
    pending: Option<Ticket>,
    next_ticket: u64,
    last_saved: Option<i64>,
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new(chrono::Utc::now().date_naive())
    }
}

impl Wizard {
    /// Fresh wizard whose since-date is 30 days before `today`
    pub fn new(today: chrono::NaiveDate) -> Self {
        let since = today - chrono::Duration::days(DEFAULT_LOOKBACK_DAYS);
        Self {
            repository: String::new(),
            since_date: since.format("%Y-%m-%d").to_string(),
            max_commits: DEFAULT_MAX_COMMITS,
            title: String::new(),
            content: String::new(),
            step: Step::SelectRepo,
            commits: Vec::new(),
            selected: HashSet::new(),
            error: None,
            pending: None,
            next_ticket: 0,
            last_saved: None,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn commits(&self) -> &[Commit] {
        &self.commits
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_operation(&self) -> Option<Operation> {
        self.pending.map(|t| t.operation)
    }

    /// Id of the changelog saved by the last completed run
    pub fn last_saved(&self) -> Option<i64> {
        self.last_saved
    }

    // ============ Selection ============

    pub fn is_selected(&self, sha: &str) -> bool {
        self.selected.contains(sha)
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    pub fn all_selected(&self) -> bool {
        self.selected.len() == self.commits.len()
    }

    /// Selected commits in fetch order
    pub fn selected_commits(&self) -> Vec<Commit> {
        self.commits
            .iter()
            .filter(|c| self.selected.contains(&c.sha))
            .cloned()
            .collect()
    }

    /// Flip one commit; shas not in the fetched list are ignored
    pub fn toggle_commit(&mut self, sha: &str) {
        if !self.commits.iter().any(|c| c.sha == sha) {
            return;
        }
        if !self.selected.remove(sha) {
            self.selected.insert(sha.to_string());
        }
    }

    /// Clear when everything is selected, otherwise select everything
    pub fn select_all(&mut self) {
        if self.all_selected() {
            self.selected.clear();
        } else {
            self.selected = self.commits.iter().map(|c| c.sha.clone()).collect();
        }
    }

    pub fn can_fetch(&self) -> bool {
        self.step == Step::SelectRepo
            && !self.is_busy()
            && !self.repository.trim().is_empty()
            && !self.since_date.trim().is_empty()
    }

    pub fn can_generate(&self) -> bool {
        self.step == Step::SelectCommits && !self.is_busy() && !self.selected.is_empty()
    }

    pub fn can_save(&self) -> bool {
        self.step == Step::EditChangelog
            && !self.is_busy()
            && !self.title.trim().is_empty()
            && !self.content.trim().is_empty()
    }

    // ============ Transitions ============

    /// Go back one step, abandoning a pending fetch or generate. A pending
    /// save cannot be abandoned: its result must land.
    pub fn back(&mut self) -> Result<(), WizardError> {
        if self.pending_operation() == Some(Operation::Save) {
            return Err(WizardError::Busy);
        }
        self.pending = None;
        self.error = None;
        self.step = match self.step {
            Step::EditChangelog => Step::SelectCommits,
            Step::SelectCommits | Step::SelectRepo => Step::SelectRepo,
        };
        Ok(())
    }

    /// Whether `back` would be accepted
    pub fn can_go_back(&self) -> bool {
        self.pending_operation() != Some(Operation::Save)
    }

    pub fn begin_fetch(&mut self) -> Result<(Ticket, FetchCommitsRequest), WizardError> {
        self.guard(Step::SelectRepo)?;
        if self.repository.trim().is_empty() || self.since_date.trim().is_empty() {
            return Err(self.reject(WizardError::MissingRepository));
        }
        let Some((owner, repo)) = split_full_name(&self.repository) else {
            return Err(self.reject(WizardError::InvalidRepository));
        };
        let request = FetchCommitsRequest {
            owner: owner.to_string(),
            repo: repo.to_string(),
            since_date: self.since_date.trim().to_string(),
            max_commits: self.max_commits,
        };
        Ok((self.issue(Operation::Fetch), request))
    }

    /// Apply a fetch response. Returns false when the ticket was stale.
    pub fn finish_fetch(&mut self, ticket: Ticket, result: Result<Vec<Commit>, ApiError>) -> bool {
        if !self.settle(ticket) {
            return false;
        }
        match result {
            Ok(commits) => {
                self.last_saved = None;
                self.selected = commits.iter().map(|c| c.sha.clone()).collect();
                self.commits = commits;
                self.step = Step::SelectCommits;
            }
            Err(err) => self.error = Some(err.message_or(FETCH_FAILED)),
        }
        true
    }

    pub fn begin_generate(&mut self) -> Result<(Ticket, GenerateRequest), WizardError> {
        self.guard(Step::SelectCommits)?;
        if self.selected.is_empty() {
            return Err(self.reject(WizardError::NoCommitsSelected));
        }
        let Some((owner, repo)) = split_full_name(&self.repository) else {
            return Err(self.reject(WizardError::InvalidRepository));
        };
        let request = GenerateRequest {
            owner: owner.to_string(),
            repo: repo.to_string(),
            commits: self.commits.clone(),
            selected_commit_shas: self.selected_commits().into_iter().map(|c| c.sha).collect(),
        };
        Ok((self.issue(Operation::Generate), request))
    }

    pub fn finish_generate(&mut self, ticket: Ticket, result: Result<String, ApiError>) -> bool {
        if !self.settle(ticket) {
            return false;
        }
        match result {
            Ok(text) => {
                self.content = if text.trim().is_empty() {
                    EMPTY_GENERATION.to_string()
                } else {
                    text
                };
                self.step = Step::EditChangelog;
            }
            Err(err) => self.error = Some(err.message_or(GENERATE_FAILED)),
        }
        true
    }

    /// Start saving, as a draft or published
    pub fn begin_save(&mut self, published: bool) -> Result<(Ticket, SaveChangelogRequest), WizardError> {
        self.guard(Step::EditChangelog)?;
        if self.title.trim().is_empty() || self.content.trim().is_empty() {
            return Err(self.reject(WizardError::MissingTitleOrContent));
        }
        let request = SaveChangelogRequest {
            title: self.title.trim().to_string(),
            content: self.content.clone(),
            repository: self.repository.trim().to_string(),
            commit_range: format!("since: {}", self.since_date.trim()),
            raw_commits: self.selected_commits(),
            published,
        };
        Ok((self.issue(Operation::Save), request))
    }

    /// On success the wizard starts over, keeping repository and date
    pub fn finish_save(&mut self, ticket: Ticket, result: Result<i64, ApiError>) -> bool {
        if !self.settle(ticket) {
            return false;
        }
        match result {
            Ok(id) => {
                self.last_saved = Some(id);
                self.step = Step::SelectRepo;
                self.commits.clear();
                self.selected.clear();
                self.title.clear();
                self.content.clear();
            }
            Err(err) => self.error = Some(err.message_or(SAVE_FAILED)),
        }
        true
    }

    fn guard(&self, step: Step) -> Result<(), WizardError> {
        if self.is_busy() {
            return Err(WizardError::Busy);
        }
        if self.step != step {
            return Err(WizardError::WrongStep);
        }
        Ok(())
    }

    fn reject(&mut self, err: WizardError) -> WizardError {
        self.error = Some(err.to_string());
        err
    }

    fn issue(&mut self, operation: Operation) -> Ticket {
        self.next_ticket += 1;
        let ticket = Ticket {
            operation,
            id: self.next_ticket,
        };
        self.pending = Some(ticket);
        self.error = None;
        ticket
    }

    fn settle(&mut self, ticket: Ticket) -> bool {
        if self.pending != Some(ticket) {
            return false;
        }
        self.pending = None;
        true
    }
}

/// The wizard's step as its own signal. Form edits and selection changes
/// leave it untouched, so views keyed on the step are not rebuilt by them.
pub fn current_step(wizard: RwSignal<Wizard>) -> Memo<Step> {
    create_memo(move |_| wizard.with(|w| w.step()))
}
