//! GitHub REST client

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;

use super::types::{RawCommitDetail, RawCommitSummary, RawRepository, TokenResponse};
use super::{Commit, CommitQuery, GitHubApi, GitHubError, GitHubUser, Repository};
use crate::config::GitHubConfig;

/// GitHub client backed by reqwest
pub struct GitHubClient {
    client: Client,
    api_url: String,
    oauth_url: String,
    client_id: Option<String>,
    client_secret: Option<String>,
    scope: String,
}

impl GitHubClient {
    /// Create a client from the `[github]` config section
    pub fn new(config: &GitHubConfig) -> Result<Self, GitHubError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("changelogger/0.1"));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github.v3+json"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            oauth_url: config.oauth_url.trim_end_matches('/').to_string(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            scope: config.scope.clone(),
        })
    }

    fn credentials(&self) -> Result<(&str, &str), GitHubError> {
        match (self.client_id.as_deref(), self.client_secret.as_deref()) {
            (Some(id), Some(secret)) if !id.is_empty() && !secret.is_empty() => Ok((id, secret)),
            _ => Err(GitHubError::NotConfigured),
        }
    }

    async fn get(&self, token: &str, url: &str, what: &str) -> Result<Response, GitHubError> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(GitHubError::from_reqwest)?;

        check_status(response, what).await
    }
}

async fn check_status(response: Response, what: &str) -> Result<Response, GitHubError> {
    match response.status() {
        s if s.is_success() => Ok(response),
        StatusCode::UNAUTHORIZED => Err(GitHubError::InvalidToken),
        StatusCode::FORBIDDEN => Err(GitHubError::RateLimited),
        StatusCode::NOT_FOUND => Err(GitHubError::NotFound(what.to_string())),
        status => {
            let message = response.text().await.unwrap_or_default();
            tracing::error!("GitHub API error {}: {}", status, message);
            Err(GitHubError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}

#[async_trait]
impl GitHubApi for GitHubClient {
    fn authorize_url(&self, redirect_uri: &str, state: &str) -> Result<String, GitHubError> {
        let (client_id, _) = self.credentials()?;

        Ok(format!(
            "{}/login/oauth/authorize?client_id={}&redirect_uri={}&scope={}&state={}",
            self.oauth_url,
            urlencoding::encode(client_id),
            urlencoding::encode(redirect_uri),
            urlencoding::encode(&self.scope),
            urlencoding::encode(state),
        ))
    }

    async fn exchange_code(&self, code: &str, redirect_uri: &str) -> Result<String, GitHubError> {
        let (client_id, client_secret) = self.credentials()?;
        let url = format!("{}/login/oauth/access_token", self.oauth_url);

        let response = self
            .client
            .post(&url)
            .header(ACCEPT, "application/json")
            .json(&serde_json::json!({
                "client_id": client_id,
                "client_secret": client_secret,
                "code": code,
                "redirect_uri": redirect_uri,
            }))
            .send()
            .await
            .map_err(GitHubError::from_reqwest)?;

        if !response.status().is_success() {
            return Err(GitHubError::OAuth("Failed to get access token".into()));
        }

        let body: TokenResponse = response.json().await?;
        match body.access_token {
            Some(token) if !token.is_empty() => Ok(token),
            _ => Err(GitHubError::OAuth(
                body.error_description
                    .unwrap_or_else(|| "No access token received".into()),
            )),
        }
    }

    async fn current_user(&self, token: &str) -> Result<GitHubUser, GitHubError> {
        let url = format!("{}/user", self.api_url);
        let response = self.get(token, &url, "User").await?;
        Ok(response.json().await?)
    }

    async fn list_repositories(&self, token: &str) -> Result<Vec<Repository>, GitHubError> {
        let url = format!(
            "{}/user/repos?type=owner&sort=updated&per_page=100",
            self.api_url
        );
        let response = self.get(token, &url, "Repositories").await?;
        let raw: Vec<RawRepository> = response.json().await?;

        let repositories: Vec<Repository> = raw
            .into_iter()
            .filter(RawRepository::is_admin)
            .map(Repository::from)
            .collect();

        tracing::debug!(count = repositories.len(), "Listed admin repositories");
        Ok(repositories)
    }

    async fn list_commits(
        &self,
        token: &str,
        owner: &str,
        repo: &str,
        query: &CommitQuery,
    ) -> Result<Vec<String>, GitHubError> {
        let mut url = format!(
            "{}/repos/{}/{}/commits?per_page={}",
            self.api_url,
            urlencoding::encode(owner),
            urlencoding::encode(repo),
            query.max_commits.clamp(1, 100)
        );
        if let Some(since) = &query.since {
            url.push_str(&format!("&since={}", urlencoding::encode(since)));
        }
        if let Some(until) = &query.until {
            url.push_str(&format!("&until={}", urlencoding::encode(until)));
        }

        let what = format!("Repository {owner}/{repo}");
        let response = self.get(token, &url, &what).await?;
        let commits: Vec<RawCommitSummary> = response.json().await?;

        Ok(commits.into_iter().map(|c| c.sha).collect())
    }

    async fn commit_details(
        &self,
        token: &str,
        owner: &str,
        repo: &str,
        sha: &str,
    ) -> Result<Commit, GitHubError> {
        let url = format!(
            "{}/repos/{}/{}/commits/{}",
            self.api_url,
            urlencoding::encode(owner),
            urlencoding::encode(repo),
            urlencoding::encode(sha)
        );

        let what = format!("Commit {sha}");
        let response = self.get(token, &url, &what).await?;
        let raw: RawCommitDetail = response.json().await?;

        Ok(Commit::from(raw))
    }
}
