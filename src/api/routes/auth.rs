//! Auth Routes
//!
//! GitHub OAuth login and cookie sessions.
//!
//! - GET /auth/github/login - OAuth authorization URL
//! - GET /auth/github/callback - Code exchange, sets the session cookie
//! - GET /auth/status - Current user
//! - POST /auth/logout - End the session

use axum::{
    extract::{Query, State},
    response::Redirect,
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::sync::Arc;

use crate::api::dto::{AuthStatusResponse, CallbackQuery, LoginResponse, MessageResponse};
use crate::api::extract::MaybeUser;
use crate::api::{ApiError, ApiResult, AppState};
use crate::auth::SESSION_COOKIE;

/// GET /auth/github/login
pub async fn github_login(State(state): State<Arc<AppState>>) -> ApiResult<Json<LoginResponse>> {
    if !state.config.github.oauth_configured() {
        return Err(ApiError::ServiceUnavailable(
            "GitHub OAuth not properly configured".to_string(),
        ));
    }

    let oauth_state = state.sessions.issue_state().await;
    let redirect_uri = state.config.server.oauth_redirect_uri();
    let authorization_url = state.github.authorize_url(&redirect_uri, &oauth_state)?;

    Ok(Json(LoginResponse { authorization_url }))
}

/// GET /auth/github/callback
///
/// Redeems the OAuth `state`, exchanges the code for a token, starts a
/// session and sends the browser back to the frontend.
pub async fn github_callback(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Query(query): Query<CallbackQuery>,
) -> ApiResult<(CookieJar, Redirect)> {
    let (Some(code), Some(oauth_state)) = (query.code, query.state) else {
        return Err(ApiError::Validation(
            "Missing code or state parameter".to_string(),
        ));
    };

    if !state.sessions.consume_state(&oauth_state).await {
        return Err(ApiError::Validation("Invalid state parameter".to_string()));
    }

    let redirect_uri = state.config.server.oauth_redirect_uri();
    let token = state.github.exchange_code(&code, &redirect_uri).await?;
    let user = state.github.current_user(&token).await?;

    let session_id = state.sessions.create(user, token).await;
    let cookie = Cookie::build((SESSION_COOKIE, session_id))
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config.session.secure_cookie)
        .path("/")
        .build();

    let target = format!(
        "{}/?auth=success",
        state.config.server.frontend_url.trim_end_matches('/')
    );

    Ok((jar.add(cookie), Redirect::to(&target)))
}

/// GET /auth/status
pub async fn auth_status(MaybeUser(session): MaybeUser) -> Json<AuthStatusResponse> {
    Json(match session {
        Some(session) => AuthStatusResponse {
            authenticated: true,
            user: Some(session.user.into()),
        },
        None => AuthStatusResponse {
            authenticated: false,
            user: None,
        },
    })
}

/// POST /auth/logout
pub async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        if state.sessions.remove(cookie.value()).await {
            tracing::info!("Session ended");
        }
    }

    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    (
        jar,
        Json(MessageResponse {
            message: "Logged out successfully".to_string(),
        }),
    )
}
