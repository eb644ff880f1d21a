//! End-to-end flow through the real router with GitHub and the LLM stubbed:
//! fetch three commits, generate from two, publish, read it back publicly.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::Response,
    Router,
};
use changelogger::api::{build_router, AppState};
use changelogger::config::Config;
use changelogger::generator::{ChangelogGenerator, GeneratorError};
use changelogger::github::{
    Commit, CommitAuthor, CommitQuery, CommitStats, GitHubApi, GitHubError, GitHubUser, Repository,
};
use changelogger::storage::ChangelogStore;
use std::sync::{Arc, Mutex};
use tower::util::ServiceExt;

struct FakeGitHub {
    commits: Vec<Commit>,
}

#[async_trait]
impl GitHubApi for FakeGitHub {
    fn authorize_url(&self, _redirect_uri: &str, state: &str) -> Result<String, GitHubError> {
        Ok(format!("https://github.test/authorize?state={state}"))
    }

    async fn exchange_code(&self, _code: &str, _redirect_uri: &str) -> Result<String, GitHubError> {
        Ok("gho_flow".to_string())
    }

    async fn current_user(&self, _token: &str) -> Result<GitHubUser, GitHubError> {
        Ok(GitHubUser {
            id: 42,
            login: "maintainer".into(),
            name: Some("Maintainer".into()),
            email: None,
            avatar_url: String::new(),
        })
    }

    async fn list_repositories(&self, _token: &str) -> Result<Vec<Repository>, GitHubError> {
        Ok(Vec::new())
    }

    async fn list_commits(
        &self,
        _token: &str,
        owner: &str,
        repo: &str,
        _query: &CommitQuery,
    ) -> Result<Vec<String>, GitHubError> {
        if (owner, repo) != ("acme", "widgets") {
            return Err(GitHubError::NotFound(format!("Repository {owner}/{repo}")));
        }
        Ok(self.commits.iter().map(|c| c.sha.clone()).collect())
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

/// Records the shas it was asked to describe
#[derive(Default)]
struct RecordingGenerator {
    seen: Mutex<Vec<String>>,
}

#[async_trait]
impl ChangelogGenerator for RecordingGenerator {
    fn is_configured(&self) -> bool {
        true
    }

    async fn generate(&self, repository: &str, commits: &[Commit]) -> Result<String, GeneratorError> {
        if let Ok(mut seen) = self.seen.lock() {
            seen.extend(commits.iter().map(|c| c.sha.clone()));
        }
        let lines: Vec<String> = commits.iter().map(|c| format!("- {}", c.message)).collect();
        Ok(format!("## {repository}\n\n### Features\n{}", lines.join("\n")))
    }
}

fn commit(sha: &str, message: &str) -> Commit {
    Commit {
        sha: sha.into(),
        message: message.into(),
        author: CommitAuthor {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            date: "2024-01-10T09:00:00Z".into(),
        },
        url: format!("https://github.com/acme/widgets/commit/{sha}"),
        stats: Some(CommitStats {
            additions: 5,
            deletions: 1,
            total: 6,
        }),
        files: Vec::new(),
    }
}

async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

async fn json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post(uri: &str, cookie: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json")
        .header("Cookie", cookie)
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn publish_flow_lists_changelog_once_under_its_repository() {
    let generator = Arc::new(RecordingGenerator::default());
    let state = AppState::new(
        ChangelogStore::open_in_memory().unwrap(),
        Arc::new(FakeGitHub {
            commits: vec![
                commit("c3", "Add stack view"),
                commit("c2", "Fix date picker"),
                commit("c1", "Bump deps"),
            ],
        }),
        generator.clone(),
        Config::default(),
    );
    let sessions = Arc::clone(&state.sessions);
    let app = build_router(state);

    let user = GitHubUser {
        id: 42,
        login: "maintainer".into(),
        name: None,
        email: None,
        avatar_url: String::new(),
    };
    let cookie = format!("session_id={}", sessions.create(user, "gho_flow".into()).await);

    // Step 1: fetch commits
    let response = send(
        &app,
        post(
            "/api/v1/changelogs/fetch-commits",
            &cookie,
            serde_json::json!({"owner": "acme", "repo": "widgets", "since_date": "2024-01-01", "max_commits": 50}),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = json(response).await;
    assert_eq!(fetched["count"], 3);
    let commits = fetched["commits"].clone();

    // Step 2: generate from two of them
    let response = send(
        &app,
        post(
            "/api/v1/changelogs/generate",
            &cookie,
            serde_json::json!({
                "owner": "acme",
                "repo": "widgets",
                "commits": commits,
                "selected_commit_shas": ["c3", "c1"]
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let content = json(response).await["changelog"].as_str().unwrap().to_string();
    assert!(content.contains("Add stack view"));
    assert!(!content.contains("Fix date picker"));
    assert_eq!(*generator.seen.lock().unwrap(), vec!["c3", "c1"]);

    // Step 3: publish
    let raw_commits: Vec<serde_json::Value> = commits
        .as_array()
        .unwrap()
        .iter()
        .filter(|c| c["sha"] == "c3" || c["sha"] == "c1")
        .cloned()
        .collect();
    let response = send(
        &app,
        post(
            "/api/v1/changelogs/save",
            &cookie,
            serde_json::json!({
                "title": "v1.0",
                "content": content,
                "repository": "acme/widgets",
                "commit_range": "since: 2024-01-01",
                "raw_commits": raw_commits,
                "published": true
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = json(response).await["changelog_id"].as_i64().unwrap();

    // Anyone can see it, exactly once
    let response = send(&app, get("/api/v1/changelogs/?published_only=true")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let listed = json(response).await;
    let changelogs = listed["changelogs"].as_array().unwrap();
    let matching: Vec<&serde_json::Value> = changelogs
        .iter()
        .filter(|c| c["title"] == "v1.0")
        .collect();
    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0]["repository"], "acme/widgets");
    assert_eq!(matching[0]["id"], id);

    let response = send(&app, get(&format!("/api/v1/changelogs/{id}"))).await;
    let detail = json(response).await;
    assert_eq!(detail["changelog"]["author"], "maintainer");
    assert_eq!(detail["changelog"]["commit_range"], "since: 2024-01-01");
    assert_eq!(detail["changelog"]["raw_commits"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn unknown_repository_surfaces_not_found_detail() {
    let state = AppState::new(
        ChangelogStore::open_in_memory().unwrap(),
        Arc::new(FakeGitHub { commits: Vec::new() }),
        Arc::new(RecordingGenerator::default()),
        Config::default(),
    );
    let sessions = Arc::clone(&state.sessions);
    let app = build_router(state);

    let user = GitHubUser {
        id: 1,
        login: "someone".into(),
        name: None,
        email: None,
        avatar_url: String::new(),
    };
    let cookie = format!("session_id={}", sessions.create(user, "tok".into()).await);

    let response = send(
        &app,
        post(
            "/api/v1/changelogs/fetch-commits",
            &cookie,
            serde_json::json!({"owner": "acme", "repo": "nope"}),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json(response).await["detail"], "Repository acme/nope not found");
}
