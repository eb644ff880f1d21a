//! Changelog Storage
//!
//! - **types**: Stored changelog records, updates and list summaries
//! - **store**: SQLite-backed store
//! - **error**: Error types
//!
//! # Example
//!
//! ```rust,no_run
//! use changelogger::storage::{ChangelogStore, NewChangelog};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = ChangelogStore::open("./changelog.db".as_ref())?;
//!
//!     let changelog = store.create(NewChangelog {
//!         title: "v1.0".into(),
//!         content: "## Features\n- Initial release".into(),
//!         author: "octocat".into(),
//!         repository: "acme/widgets".into(),
//!         commit_range: "since: 2024-01-01".into(),
//!         raw_commits: serde_json::json!([]),
//!         published: true,
//!     })?;
//!
//!     println!("Saved changelog {}", changelog.id);
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod store;
pub mod types;

pub use error::{StoreError, StoreResult};
pub use store::ChangelogStore;
pub use types::{
    content_preview, Changelog, ChangelogSummary, ChangelogUpdate, NewChangelog, PREVIEW_LENGTH,
};
