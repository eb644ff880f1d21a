//! Session extractors
//!
//! - `CurrentUser`: rejects the request with 401 when there is no live session
//! - `MaybeUser`: the session if there is one

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::CookieJar;
use std::sync::Arc;

use crate::api::{ApiError, AppState};
use crate::auth::{Session, SESSION_COOKIE};

/// The signed-in user's session
pub struct CurrentUser(pub Session);

/// The session, if the request carries a live one
pub struct MaybeUser(pub Option<Session>);

async fn session_from_parts(parts: &Parts, state: &AppState) -> Option<Session> {
    let jar = CookieJar::from_headers(&parts.headers);
    let id = jar.get(SESSION_COOKIE)?.value().to_string();
    state.sessions.get(&id).await
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        session_from_parts(parts, state)
            .await
            .map(CurrentUser)
            .ok_or_else(ApiError::unauthorized)
    }
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for MaybeUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(session_from_parts(parts, state).await))
    }
}
