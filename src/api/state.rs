//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use std::sync::Arc;
use std::time::Instant;

use crate::auth::SessionStore;
use crate::config::Config;
use crate::generator::ChangelogGenerator;
use crate::github::GitHubApi;
use crate::storage::ChangelogStore;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Changelog persistence
    pub store: ChangelogStore,
    /// GitHub OAuth and REST access
    pub github: Arc<dyn GitHubApi>,
    /// Changelog writer
    pub generator: Arc<dyn ChangelogGenerator>,
    /// Signed-in users and pending OAuth states
    pub sessions: Arc<SessionStore>,
    /// Server configuration
    pub config: Arc<Config>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    pub fn new(
        store: ChangelogStore,
        github: Arc<dyn GitHubApi>,
        generator: Arc<dyn ChangelogGenerator>,
        config: Config,
    ) -> Self {
        let sessions = Arc::new(SessionStore::new(&config.session));
        Self {
            store,
            github,
            generator,
            sessions,
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
