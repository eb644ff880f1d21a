//! Changelogger REST API
//!
//! HTTP API layer for Changelogger, built with Axum.
//!
//! # Endpoints
//!
//! ## Auth
//! - `GET /auth/github/login` - OAuth authorization URL
//! - `GET /auth/github/callback` - OAuth code exchange
//! - `GET /auth/status` - Current session user
//! - `POST /auth/logout` - End the session
//!
//! ## Repositories
//! - `GET /api/v1/repositories` - Repositories the user administers
//!
//! ## Changelogs
//! - `POST /api/v1/changelogs/fetch-commits` - Commits for selection
//! - `POST /api/v1/changelogs/generate` - Generate changelog text
//! - `POST /api/v1/changelogs/save` - Save a changelog
//! - `GET /api/v1/changelogs/` - List changelogs
//! - `GET /api/v1/changelogs/:id` - Get a changelog
//! - `PUT /api/v1/changelogs/:id` - Update a changelog
//! - `DELETE /api/v1/changelogs/:id` - Delete a changelog
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! # Example
//!
//! ```rust,ignore
//! use changelogger::api::{serve, AppState};
//! use changelogger::config::Config;
//! use changelogger::generator::OpenAiGenerator;
//! use changelogger::github::GitHubClient;
//! use changelogger::storage::ChangelogStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     let store = ChangelogStore::open(config.storage.database_path.as_ref())?;
//!     let github = Arc::new(GitHubClient::new(&config.github)?);
//!     let generator = Arc::new(OpenAiGenerator::new(config.llm.clone())?);
//!
//!     serve(AppState::new(store, github, generator, config)).await?;
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::ServerConfig;

/// How often expired sessions and OAuth states are swept
const SESSION_PRUNE_INTERVAL: Duration = Duration::from_secs(15 * 60);

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/repositories", get(routes::repositories::list_repositories))
        .route("/changelogs", get(routes::changelogs::list_changelogs))
        .route("/changelogs/", get(routes::changelogs::list_changelogs))
        .route(
            "/changelogs/fetch-commits",
            post(routes::changelogs::fetch_commits),
        )
        .route(
            "/changelogs/generate",
            post(routes::changelogs::generate_changelog),
        )
        .route("/changelogs/save", post(routes::changelogs::save_changelog))
        .route(
            "/changelogs/:id",
            get(routes::changelogs::get_changelog)
                .put(routes::changelogs::update_changelog)
                .delete(routes::changelogs::delete_changelog),
        );

    let auth_routes = Router::new()
        .route("/github/login", get(routes::auth::github_login))
        .route("/github/callback", get(routes::auth::github_callback))
        .route("/status", get(routes::auth::auth_status))
        .route("/logout", post(routes::auth::logout));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let cors = cors_layer(&state.config.server);
    let shared_state = Arc::new(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .nest("/auth", auth_routes)
        .nest("/health", health_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(shared_state)
}

/// CORS for the configured frontend origins; credentials are allowed so the
/// session cookie travels with SPA requests.
fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}

/// Start the API server
pub async fn serve(state: AppState) -> Result<(), ApiError> {
    let addr = state.config.server.addr();

    let sessions = Arc::clone(&state.sessions);
    let prune_handle = tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_PRUNE_INTERVAL);
        loop {
            interval.tick().await;
            let removed = sessions.prune().await;
            if removed > 0 {
                tracing::debug!(removed, "Pruned expired sessions");
            }
        }
    });

    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Changelogger API listening on {}", addr);

    let result = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)));

    prune_handle.abort();
    result?;

    tracing::info!("Changelogger API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::SessionStore;
    use crate::config::Config;
    use crate::generator::{ChangelogGenerator, GeneratorError};
    use crate::github::{Commit, CommitAuthor, CommitQuery, GitHubApi, GitHubError, GitHubUser, Repository};
    use crate::storage::ChangelogStore;
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        response::Response,
    };
    use tower::util::ServiceExt;

    struct StubGitHub {
        commits: Vec<Commit>,
    }

    #[async_trait]
    impl GitHubApi for StubGitHub {
        fn authorize_url(&self, redirect_uri: &str, state: &str) -> Result<String, GitHubError> {
            Ok(format!(
                "https://github.test/login/oauth/authorize?redirect_uri={redirect_uri}&state={state}"
            ))
        }

        async fn exchange_code(&self, code: &str, _redirect_uri: &str) -> Result<String, GitHubError> {
            if code == "good-code" {
                Ok("gho_token".to_string())
            } else {
                Err(GitHubError::OAuth("bad code".into()))
            }
        }

        async fn current_user(&self, _token: &str) -> Result<GitHubUser, GitHubError> {
            Ok(octocat())
        }

        async fn list_repositories(&self, _token: &str) -> Result<Vec<Repository>, GitHubError> {
            Ok(vec![Repository {
                id: 1,
                name: "widgets".into(),
                full_name: "acme/widgets".into(),
                description: None,
                language: Some("Rust".into()),
                default_branch: "main".into(),
                updated_at: "2024-01-01T00:00:00Z".into(),
                private: false,
            }])
        }

        async fn list_commits(
            &self,
            _token: &str,
            _owner: &str,
            _repo: &str,
            query: &CommitQuery,
        ) -> Result<Vec<String>, GitHubError> {
            Ok(self
                .commits
                .iter()
                .take(query.max_commits)
                .map(|c| c.sha.clone())
                .collect())
        }

        async fn commit_details(
            &self,
            _token: &str,
            _owner: &str,
            _repo: &str,
            sha: &str,
        ) -> Result<Commit, GitHubError> {
            self.commits
                .iter()
                .find(|c| c.sha == sha)
                .cloned()
                .ok_or_else(|| GitHubError::NotFound(format!("Commit {sha}")))
        }
    }

    struct StubGenerator {
        configured: bool,
    }

    #[async_trait]
    impl ChangelogGenerator for StubGenerator {
        fn is_configured(&self) -> bool {
            self.configured
        }

        async fn generate(&self, _repository: &str, commits: &[Commit]) -> Result<String, GeneratorError> {
            Ok(format!("## Changes\n- {} commits", commits.len()))
        }
    }

    fn octocat() -> GitHubUser {
        GitHubUser {
            id: 1,
            login: "octocat".into(),
            name: None,
            email: None,
            avatar_url: String::new(),
        }
    }

    fn commit(sha: &str) -> Commit {
        Commit {
            sha: sha.into(),
            message: format!("Commit {sha}"),
            author: CommitAuthor::default(),
            url: String::new(),
            stats: None,
            files: Vec::new(),
        }
    }

    fn create_test_app_with(llm_configured: bool) -> (Router, Arc<SessionStore>) {
        let mut config = Config::default();
        config.github.client_id = Some("id".into());
        config.github.client_secret = Some("secret".into());

        let state = AppState::new(
            ChangelogStore::open_in_memory().unwrap(),
            Arc::new(StubGitHub {
                commits: vec![commit("aaa"), commit("bbb"), commit("ccc")],
            }),
            Arc::new(StubGenerator {
                configured: llm_configured,
            }),
            config,
        );
        let sessions = Arc::clone(&state.sessions);

        (build_router(state), sessions)
    }

    fn create_test_app() -> (Router, Arc<SessionStore>) {
        create_test_app_with(true)
    }

    async fn login(sessions: &SessionStore) -> String {
        let id = sessions.create(octocat(), "gho_token".into()).await;
        format!("session_id={id}")
    }

    async fn send(app: &Router, request: Request<Body>) -> Response {
        app.clone().oneshot(request).await.unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn json_request(method: &str, uri: &str, cookie: Option<&str>, body: serde_json::Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("Content-Type", "application/json");
        if let Some(cookie) = cookie {
            builder = builder.header("Cookie", cookie);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header("Cookie", cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn save_body(title: &str, published: bool) -> serde_json::Value {
        serde_json::json!({
            "title": title,
            "content": "## Features\n- Stacks",
            "repository": "acme/widgets",
            "commit_range": "since: 2024-01-01",
            "raw_commits": [{"sha": "aaa"}],
            "published": published
        })
    }

    #[tokio::test]
    async fn test_health_live() {
        let (app, _) = create_test_app();
        let response = send(&app, get_request("/health/live", None)).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_ready() {
        let (app, _) = create_test_app();
        let response = send(&app, get_request("/health/ready", None)).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_full() {
        let (app, _) = create_test_app_with(false);
        let response = send(&app, get_request("/health", None)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["status"], "degraded");
        assert_eq!(body["storage"], "ok");
    }

    #[tokio::test]
    async fn test_status_anonymous() {
        let (app, _) = create_test_app();
        let response = send(&app, get_request("/auth/status", None)).await;
        assert_eq!(body_json(response).await, serde_json::json!({"authenticated": false}));
    }

    #[tokio::test]
    async fn test_status_with_session() {
        let (app, sessions) = create_test_app();
        let cookie = login(&sessions).await;

        let response = send(&app, get_request("/auth/status", Some(&cookie))).await;
        let body = body_json(response).await;
        assert_eq!(body["authenticated"], true);
        assert_eq!(body["user"]["login"], "octocat");
        assert_eq!(body["user"]["authenticated"], true);
    }

    #[tokio::test]
    async fn test_oauth_round_trip() {
        let (app, sessions) = create_test_app();

        let response = send(&app, get_request("/auth/github/login", None)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let url = body["authorization_url"].as_str().unwrap().to_string();
        let state = url.rsplit("state=").next().unwrap().to_string();

        let callback = format!("/auth/github/callback?code=good-code&state={state}");
        let response = send(&app, get_request(&callback, None)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers()["location"],
            "http://localhost:3000/?auth=success"
        );
        let set_cookie = response.headers()["set-cookie"].to_str().unwrap();
        assert!(set_cookie.starts_with("session_id="));
        assert!(set_cookie.contains("HttpOnly"));
        assert_eq!(sessions.session_count().await, 1);

        // State values are single use
        let response = send(&app, get_request(&callback, None)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["detail"], "Invalid state parameter");
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_logout_clears_session() {
        let (app, sessions) = create_test_app();
        let cookie = login(&sessions).await;

        let response = send(&app, json_request("POST", "/auth/logout", Some(&cookie), serde_json::json!({}))).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["message"], "Logged out successfully");

        let response = send(&app, get_request("/auth/status", Some(&cookie))).await;
        assert_eq!(body_json(response).await["authenticated"], false);
    }

    #[tokio::test]
    async fn test_writes_require_session() {
        let (app, _) = create_test_app();

        let response = send(&app, json_request("POST", "/api/v1/changelogs/save", None, save_body("v1", true))).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["detail"], "Not authenticated");

        let response = send(&app, get_request("/api/v1/repositories", None)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = send(
            &app,
            json_request("POST", "/api/v1/changelogs/fetch-commits", None, serde_json::json!({"owner": "acme", "repo": "widgets"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_list_repositories() {
        let (app, sessions) = create_test_app();
        let cookie = login(&sessions).await;

        let response = send(&app, get_request("/api/v1/repositories", Some(&cookie))).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["count"], 1);
        assert_eq!(body["repositories"][0]["full_name"], "acme/widgets");
    }

    #[tokio::test]
    async fn test_fetch_commits_respects_limit() {
        let (app, sessions) = create_test_app();
        let cookie = login(&sessions).await;

        let response = send(
            &app,
            json_request(
                "POST",
                "/api/v1/changelogs/fetch-commits",
                Some(&cookie),
                serde_json::json!({"owner": "acme", "repo": "widgets", "since_date": "2024-01-01", "max_commits": 2}),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["count"], 2);
        assert_eq!(body["commits"][0]["sha"], "aaa");
    }

    #[tokio::test]
    async fn test_fetch_commits_rejects_blank_repo() {
        let (app, sessions) = create_test_app();
        let cookie = login(&sessions).await;

        let response = send(
            &app,
            json_request("POST", "/api/v1/changelogs/fetch-commits", Some(&cookie), serde_json::json!({"owner": "acme", "repo": " "})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_generate_requires_selection() {
        let (app, sessions) = create_test_app();
        let cookie = login(&sessions).await;

        let response = send(
            &app,
            json_request(
                "POST",
                "/api/v1/changelogs/generate",
                Some(&cookie),
                serde_json::json!({"owner": "acme", "repo": "widgets", "commits": [{"sha": "aaa"}], "selected_commit_shas": []}),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["detail"], "No commits selected");
    }

    #[tokio::test]
    async fn test_generate_without_llm_is_unavailable() {
        let (app, sessions) = create_test_app_with(false);
        let cookie = login(&sessions).await;

        let response = send(
            &app,
            json_request(
                "POST",
                "/api/v1/changelogs/generate",
                Some(&cookie),
                serde_json::json!({"owner": "acme", "repo": "widgets", "commits": [{"sha": "aaa"}], "selected_commit_shas": ["aaa"]}),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body_json(response).await["detail"], "OpenAI API not configured");
    }

    #[tokio::test]
    async fn test_save_rejects_blank_title() {
        let (app, sessions) = create_test_app();
        let cookie = login(&sessions).await;

        let response = send(&app, json_request("POST", "/api/v1/changelogs/save", Some(&cookie), save_body("   ", true))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_drafts_hidden_from_anonymous() {
        let (app, sessions) = create_test_app();
        let cookie = login(&sessions).await;

        let response = send(&app, json_request("POST", "/api/v1/changelogs/save", Some(&cookie), save_body("Draft", false))).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let draft_id = body_json(response).await["changelog_id"].as_i64().unwrap();
        send(&app, json_request("POST", "/api/v1/changelogs/save", Some(&cookie), save_body("v1", true))).await;

        let response = send(&app, get_request("/api/v1/changelogs/", None)).await;
        let body = body_json(response).await;
        assert_eq!(body["changelogs"].as_array().unwrap().len(), 1);
        assert_eq!(body["changelogs"][0]["title"], "v1");

        let response = send(&app, get_request("/api/v1/changelogs/?published_only=false", Some(&cookie))).await;
        assert_eq!(body_json(response).await["changelogs"].as_array().unwrap().len(), 2);

        let uri = format!("/api/v1/changelogs/{draft_id}");
        let response = send(&app, get_request(&uri, None)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = send(&app, get_request(&uri, Some(&cookie))).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["changelog"]["author"], "octocat");
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let (app, sessions) = create_test_app();
        let cookie = login(&sessions).await;

        let response = send(&app, json_request("POST", "/api/v1/changelogs/save", Some(&cookie), save_body("Draft", false))).await;
        let id = body_json(response).await["changelog_id"].as_i64().unwrap();
        let uri = format!("/api/v1/changelogs/{id}");

        let response = send(&app, json_request("PUT", &uri, Some(&cookie), serde_json::json!({"published": true}))).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["message"], "Changelog updated successfully");

        let response = send(&app, get_request(&uri, None)).await;
        let body = body_json(response).await;
        assert_eq!(body["changelog"]["published"], true);
        assert_eq!(body["changelog"]["title"], "Draft");

        let response = send(&app, json_request("DELETE", &uri, Some(&cookie), serde_json::json!({}))).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = send(&app, json_request("DELETE", &uri, Some(&cookie), serde_json::json!({}))).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["detail"], "Changelog not found");
    }

    #[tokio::test]
    async fn test_invalid_json_is_rejected() {
        let (app, sessions) = create_test_app();
        let cookie = login(&sessions).await;

        let response = send(
            &app,
            Request::builder()
                .method("POST")
                .uri("/api/v1/changelogs/save")
                .header("Content-Type", "application/json")
                .header("Cookie", cookie)
                .body(Body::from("not json"))
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
