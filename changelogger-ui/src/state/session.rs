//! Session Context
//!
//! Who is signed in. The status is checked once when the context is
//! provided; `loading` stays true until that check resolves.

use leptos::*;

use crate::api::{self, ApiError, AuthStatus};
use crate::state::models::User;

#[derive(Clone, Copy)]
pub struct Session {
    pub user: RwSignal<Option<User>>,
    pub loading: RwSignal<bool>,
}

/// Map a status response to the signed-in user
pub fn user_from_status(status: AuthStatus) -> Option<User> {
    if !status.authenticated {
        return None;
    }
    status.user.map(|user| User {
        authenticated: true,
        ..user
    })
}

/// Provide the session context and start the status check
pub fn provide_session() -> Session {
    let session = Session {
        user: create_rw_signal(None),
        loading: create_rw_signal(true),
    };
    provide_context(session);

    spawn_local(async move {
        let user = match api::auth_status().await {
            Ok(status) => user_from_status(status),
            Err(e) => {
                api::log_error("Auth status check failed", &e);
                None
            }
        };
        session.user.set(user);
        session.loading.set(false);
    });

    session
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.user.with(|user| user.is_some())
    }

    /// Send the browser to GitHub's authorization page
    pub async fn login(&self) -> Result<(), ApiError> {
        let url = api::github_login_url().await?;
        if let Some(window) = web_sys::window() {
            if window.location().set_href(&url).is_err() {
                web_sys::console::error_1(&"Failed to navigate to GitHub".into());
            }
        }
        Ok(())
    }

    /// End the session. The local user is cleared even when the server call fails.
    pub async fn logout(&self) {
        if let Err(e) = api::logout().await {
            api::log_error("Logout failed", &e);
        }
        self.clear();
    }

    /// Forget the local user, e.g. after a 401
    pub fn clear(&self) {
        self.user.set(None);
    }
}
