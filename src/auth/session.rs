//! In-memory session and OAuth state store

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::config::SessionConfig;
use crate::github::GitHubUser;

/// A signed-in user
#[derive(Debug, Clone)]
pub struct Session {
    pub user: GitHubUser,
    /// GitHub access token used for repository and commit calls
    pub access_token: String,
    pub created_at: DateTime<Utc>,
}

/// Sessions and pending OAuth states, each with its own TTL
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    states: RwLock<HashMap<String, DateTime<Utc>>>,
    session_ttl: Duration,
    state_ttl: Duration,
}

impl SessionStore {
    pub fn new(config: &SessionConfig) -> Self {
        Self::with_ttls(
            Duration::hours(config.ttl_hours),
            Duration::minutes(config.state_ttl_minutes),
        )
    }

    pub fn with_ttls(session_ttl: Duration, state_ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            states: RwLock::new(HashMap::new()),
            session_ttl,
            state_ttl,
        }
    }

    /// Issue a fresh OAuth `state` value
    pub async fn issue_state(&self) -> String {
        let state = uuid::Uuid::new_v4().to_string();
        let now = Utc::now();

        let mut states = self.states.write().await;
        states.retain(|_, issued| now - *issued < self.state_ttl);
        states.insert(state.clone(), now);

        state
    }

    /// Redeem an OAuth `state`; true only for the first call within its TTL
    pub async fn consume_state(&self, state: &str) -> bool {
        let issued = self.states.write().await.remove(state);
        match issued {
            Some(issued) => Utc::now() - issued < self.state_ttl,
            None => false,
        }
    }

    /// Start a session and return its id
    pub async fn create(&self, user: GitHubUser, access_token: String) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        let session = Session {
            user,
            access_token,
            created_at: Utc::now(),
        };

        tracing::info!(login = %session.user.login, "Session created");
        self.sessions.write().await.insert(id.clone(), session);
        id
    }

    /// Look up a live session; an expired one is dropped and reported absent
    pub async fn get(&self, id: &str) -> Option<Session> {
        let now = Utc::now();
        {
            let sessions = self.sessions.read().await;
            match sessions.get(id) {
                Some(session) if now - session.created_at < self.session_ttl => {
                    return Some(session.clone());
                }
                Some(_) => {}
                None => return None,
            }
        }

        self.sessions.write().await.remove(id);
        tracing::debug!("Expired session removed");
        None
    }

    /// End a session; true if it existed
    pub async fn remove(&self, id: &str) -> bool {
        self.sessions.write().await.remove(id).is_some()
    }

    /// Drop expired sessions and states, returning how many sessions went
    pub async fn prune(&self) -> usize {
        let now = Utc::now();

        self.states
            .write()
            .await
            .retain(|_, issued| now - *issued < self.state_ttl);

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| now - s.created_at < self.session_ttl);
        before - sessions.len()
    }

    /// Number of stored sessions, expired or not
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
