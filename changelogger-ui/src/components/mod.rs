//! UI Components
//!
//! Reusable Leptos components for the dashboard and the public pages.

pub mod changelog_card;
pub mod changelog_editor;
pub mod commit_selector;
pub mod loading;
pub mod markdown;
pub mod nav;
pub mod repository_selector;
pub mod toast;

pub use changelog_card::ChangelogCard;
pub use changelog_editor::ChangelogEditor;
pub use commit_selector::CommitSelector;
pub use loading::{ErrorMessage, InlineLoading, Loading};
pub use markdown::Markdown;
pub use nav::Nav;
pub use repository_selector::RepositorySelector;
pub use toast::Toast;
