//! HTTP API Client
//!
//! One function per Changelogger endpoint.

use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use web_sys::RequestCredentials;

use super::{
    get_api_base, ApiError, ChangelogUpdate, FetchCommitsRequest, GenerateRequest,
    SaveChangelogRequest,
};
use crate::state::models::{Changelog, ChangelogSummary, Commit, Repository, User};

// ============ Response Types ============

#[derive(Debug, Clone, Deserialize)]
pub struct AuthStatus {
    pub authenticated: bool,
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    authorization_url: String,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    message: String,
}

#[derive(Debug, Deserialize)]
struct RepositoriesResponse {
    repositories: Vec<Repository>,
}

#[derive(Debug, Deserialize)]
struct CommitsResponse {
    commits: Vec<Commit>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    changelog: String,
}

#[derive(Debug, Deserialize)]
struct SaveResponse {
    changelog_id: i64,
}

#[derive(Debug, Deserialize)]
struct ChangelogListResponse {
    changelogs: Vec<ChangelogSummary>,
}

#[derive(Debug, Deserialize)]
struct ChangelogResponse {
    changelog: Changelog,
}

// ============ Helpers ============

fn url(path: &str) -> String {
    format!("{}{}", get_api_base(), path)
}

fn with_credentials(builder: RequestBuilder) -> RequestBuilder {
    builder.credentials(RequestCredentials::Include)
}

async fn read<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    if !response.ok() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::from_body(status, &body));
    }
    Ok(response.json().await?)
}

// ============ Auth ============

/// Current session user, if any
pub async fn auth_status() -> Result<AuthStatus, ApiError> {
    let response = with_credentials(Request::get(&url("/auth/status")))
        .send()
        .await?;
    read(response).await
}

/// GitHub authorization URL to send the browser to
pub async fn github_login_url() -> Result<String, ApiError> {
    let response = with_credentials(Request::get(&url("/auth/github/login")))
        .send()
        .await?;
    let login: LoginResponse = read(response).await?;
    Ok(login.authorization_url)
}

pub async fn logout() -> Result<String, ApiError> {
    let response = with_credentials(Request::post(&url("/auth/logout")))
        .send()
        .await?;
    let result: MessageResponse = read(response).await?;
    Ok(result.message)
}

// ============ Repositories & Commits ============

/// Repositories the signed-in user can administer
pub async fn repositories() -> Result<Vec<Repository>, ApiError> {
    let response = with_credentials(Request::get(&url("/api/v1/repositories")))
        .send()
        .await?;
    let result: RepositoriesResponse = read(response).await?;
    Ok(result.repositories)
}

pub async fn fetch_commits(request: &FetchCommitsRequest) -> Result<Vec<Commit>, ApiError> {
    let response = with_credentials(Request::post(&url("/api/v1/changelogs/fetch-commits")))
        .json(request)?
        .send()
        .await?;
    let result: CommitsResponse = read(response).await?;
    Ok(result.commits)
}

/// Generated markdown for the selected commits
pub async fn generate(request: &GenerateRequest) -> Result<String, ApiError> {
    let response = with_credentials(Request::post(&url("/api/v1/changelogs/generate")))
        .json(request)?
        .send()
        .await?;
    let result: GenerateResponse = read(response).await?;
    Ok(result.changelog)
}

// ============ Changelogs ============

/// Save a changelog, returning its id
pub async fn save_changelog(request: &SaveChangelogRequest) -> Result<i64, ApiError> {
    let response = with_credentials(Request::post(&url("/api/v1/changelogs/save")))
        .json(request)?
        .send()
        .await?;
    let result: SaveResponse = read(response).await?;
    Ok(result.changelog_id)
}

/// Changelogs, newest first
pub async fn list_changelogs(published_only: bool) -> Result<Vec<ChangelogSummary>, ApiError> {
    let path = format!("/api/v1/changelogs/?published_only={}", published_only);
    let response = with_credentials(Request::get(&url(&path))).send().await?;
    let result: ChangelogListResponse = read(response).await?;
    Ok(result.changelogs)
}

pub async fn get_changelog(id: i64) -> Result<Changelog, ApiError> {
    let response = with_credentials(Request::get(&url(&format!("/api/v1/changelogs/{}", id))))
        .send()
        .await?;
    let result: ChangelogResponse = read(response).await?;
    Ok(result.changelog)
}

pub async fn update_changelog(id: i64, update: &ChangelogUpdate) -> Result<String, ApiError> {
    let response = with_credentials(Request::put(&url(&format!("/api/v1/changelogs/{}", id))))
        .json(update)?
        .send()
        .await?;
    let result: MessageResponse = read(response).await?;
    Ok(result.message)
}

pub async fn delete_changelog(id: i64) -> Result<String, ApiError> {
    let response = with_credentials(Request::delete(&url(&format!("/api/v1/changelogs/{}", id))))
        .send()
        .await?;
    let result: MessageResponse = read(response).await?;
    Ok(result.message)
}
