//! Repository Routes
//!
//! - GET /api/v1/repositories - Repositories the user administers

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::dto::RepositoriesResponse;
use crate::api::extract::CurrentUser;
use crate::api::{ApiResult, AppState};

/// GET /api/v1/repositories
pub async fn list_repositories(
    State(state): State<Arc<AppState>>,
    CurrentUser(session): CurrentUser,
) -> ApiResult<Json<RepositoriesResponse>> {
    let repositories = state
        .github
        .list_repositories(&session.access_token)
        .await?;

    tracing::info!(
        login = %session.user.login,
        count = repositories.len(),
        "Listed repositories"
    );

    Ok(Json(RepositoriesResponse {
        status: "success".to_string(),
        count: repositories.len(),
        repositories,
    }))
}
