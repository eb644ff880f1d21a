//! # Changelogger
//!
//! Turn GitHub commits into published changelogs.
//!
//! A signed-in user picks one of their repositories, fetches recent commits,
//! selects the ones that matter and has an LLM draft a markdown changelog,
//! which they edit and publish. Published changelogs are readable by anyone.
//!
//! ## Modules
//!
//! - [`api`]: REST API server with Axum
//! - [`auth`]: Cookie sessions and OAuth state
//! - [`github`]: GitHub OAuth and REST client
//! - [`generator`]: LLM changelog writer
//! - [`storage`]: SQLite changelog store
//! - [`config`]: TOML configuration with environment overrides
//!
//! The browser UI lives in the `changelogger-ui` crate.

pub mod api;
pub mod auth;
pub mod config;
pub mod generator;
pub mod github;
pub mod storage;

// Re-export top-level types for convenience
pub use api::{build_router, serve, ApiError, AppState};

pub use auth::{Session, SessionStore, SESSION_COOKIE};

pub use config::{Config, ConfigError};

pub use generator::{ChangelogGenerator, GeneratorError, OpenAiGenerator};

pub use github::{Commit, GitHubApi, GitHubClient, GitHubError, GitHubUser, Repository};

pub use storage::{Changelog, ChangelogStore, ChangelogSummary, StoreError};
