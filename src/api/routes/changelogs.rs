//! Changelog Routes
//!
//! - POST /api/v1/changelogs/fetch-commits - Commits with details for selection
//! - POST /api/v1/changelogs/generate - Changelog text from selected commits
//! - POST /api/v1/changelogs/save - Persist a changelog
//! - GET /api/v1/changelogs/ - List changelogs
//! - GET /api/v1/changelogs/:id - Get a changelog
//! - PUT /api/v1/changelogs/:id - Update a changelog
//! - DELETE /api/v1/changelogs/:id - Delete a changelog

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::api::dto::{
    ChangelogResponse, FetchCommitsRequest, FetchCommitsResponse, GenerateRequest,
    GenerateResponse, ListChangelogsQuery, ListChangelogsResponse, SaveChangelogRequest,
    SaveChangelogResponse, StatusResponse,
};
use crate::api::extract::{CurrentUser, MaybeUser};
use crate::api::{ApiError, ApiResult, AppState};
use crate::github::{normalize_date, CommitQuery};
use crate::storage::{ChangelogUpdate, NewChangelog, StoreError};

fn not_found() -> ApiError {
    ApiError::NotFound("Changelog not found".to_string())
}

fn store_error(e: StoreError) -> ApiError {
    match e {
        StoreError::NotFound(_) => not_found(),
        other => ApiError::Store(other),
    }
}

fn require_text(value: &str, field: &str) -> ApiResult<()> {
    if value.trim().is_empty() {
        return Err(ApiError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

/// POST /api/v1/changelogs/fetch-commits
pub async fn fetch_commits(
    State(state): State<Arc<AppState>>,
    CurrentUser(session): CurrentUser,
    Json(req): Json<FetchCommitsRequest>,
) -> ApiResult<Json<FetchCommitsResponse>> {
    let owner = req.owner.trim();
    let repo = req.repo.trim();
    if owner.is_empty() || repo.is_empty() {
        return Err(ApiError::Validation(
            "owner and repo are required".to_string(),
        ));
    }

    let query = CommitQuery {
        since: req
            .since_date
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .map(normalize_date),
        until: req
            .until_date
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .map(normalize_date),
        max_commits: req.commit_limit(),
    };

    let commits = state
        .github
        .commits_with_details(&session.access_token, owner, repo, &query)
        .await?;

    tracing::info!(
        repository = %format!("{owner}/{repo}"),
        count = commits.len(),
        since = ?query.since,
        "Fetched commits"
    );

    Ok(Json(FetchCommitsResponse {
        status: "success".to_string(),
        count: commits.len(),
        commits,
    }))
}

/// POST /api/v1/changelogs/generate
pub async fn generate_changelog(
    State(state): State<Arc<AppState>>,
    CurrentUser(_session): CurrentUser,
    Json(req): Json<GenerateRequest>,
) -> ApiResult<Json<GenerateResponse>> {
    if !state.generator.is_configured() {
        return Err(ApiError::ServiceUnavailable(
            "OpenAI API not configured".to_string(),
        ));
    }

    let selected = req.selected_commits();
    if selected.is_empty() {
        return Err(ApiError::Validation("No commits selected".to_string()));
    }

    let repository = format!("{}/{}", req.owner, req.repo);
    let changelog = state.generator.generate(&repository, &selected).await?;

    tracing::info!(
        repository = %repository,
        commits = selected.len(),
        length = changelog.len(),
        "Changelog generated"
    );

    Ok(Json(GenerateResponse {
        status: "success".to_string(),
        changelog,
    }))
}

/// POST /api/v1/changelogs/save
pub async fn save_changelog(
    State(state): State<Arc<AppState>>,
    CurrentUser(session): CurrentUser,
    Json(req): Json<SaveChangelogRequest>,
) -> ApiResult<(StatusCode, Json<SaveChangelogResponse>)> {
    require_text(&req.title, "title")?;
    require_text(&req.content, "content")?;
    require_text(&req.repository, "repository")?;

    let changelog = state
        .store
        .create(NewChangelog {
            title: req.title.trim().to_string(),
            content: req.content,
            author: session.user.login.clone(),
            repository: req.repository,
            commit_range: req.commit_range,
            raw_commits: req.raw_commits,
            published: req.published,
        })
        .map_err(store_error)?;

    tracing::info!(
        id = changelog.id,
        repository = %changelog.repository,
        published = changelog.published,
        author = %changelog.author,
        "Changelog saved"
    );

    Ok((
        StatusCode::CREATED,
        Json(SaveChangelogResponse {
            status: "success".to_string(),
            changelog_id: changelog.id,
            message: "Changelog saved successfully".to_string(),
        }),
    ))
}

/// GET /api/v1/changelogs/
///
/// Anonymous callers only ever see published changelogs.
pub async fn list_changelogs(
    State(state): State<Arc<AppState>>,
    MaybeUser(session): MaybeUser,
    Query(query): Query<ListChangelogsQuery>,
) -> ApiResult<Json<ListChangelogsResponse>> {
    let published_only = query.published_only || session.is_none();
    let changelogs = state.store.list(published_only).map_err(store_error)?;

    Ok(Json(ListChangelogsResponse {
        status: "success".to_string(),
        changelogs: changelogs.iter().map(|c| c.summary()).collect(),
    }))
}

/// GET /api/v1/changelogs/:id
pub async fn get_changelog(
    State(state): State<Arc<AppState>>,
    MaybeUser(session): MaybeUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<ChangelogResponse>> {
    let changelog = state
        .store
        .get(id)
        .map_err(store_error)?
        .filter(|c| c.published || session.is_some())
        .ok_or_else(not_found)?;

    Ok(Json(ChangelogResponse {
        status: "success".to_string(),
        changelog,
    }))
}

/// PUT /api/v1/changelogs/:id
pub async fn update_changelog(
    State(state): State<Arc<AppState>>,
    CurrentUser(session): CurrentUser,
    Path(id): Path<i64>,
    Json(update): Json<ChangelogUpdate>,
) -> ApiResult<Json<StatusResponse>> {
    if let Some(title) = &update.title {
        require_text(title, "title")?;
    }
    if let Some(content) = &update.content {
        require_text(content, "content")?;
    }

    let changelog = state.store.update(id, &update).map_err(store_error)?;

    tracing::info!(
        id,
        published = changelog.published,
        login = %session.user.login,
        "Changelog updated"
    );

    Ok(Json(StatusResponse::success("Changelog updated successfully")))
}

/// DELETE /api/v1/changelogs/:id
pub async fn delete_changelog(
    State(state): State<Arc<AppState>>,
    CurrentUser(session): CurrentUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<StatusResponse>> {
    state.store.delete(id).map_err(store_error)?;

    tracing::info!(id, login = %session.user.login, "Changelog deleted");

    Ok(Json(StatusResponse::success("Changelog deleted successfully")))
}
