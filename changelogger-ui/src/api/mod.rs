//! API Module
//!
//! Thin wrapper over the Changelogger REST API. Every call sends the session
//! cookie; failures come back as [`ApiError`] for the caller to display.

pub mod client;

pub use client::*;

use serde::Serialize;
use wasm_bindgen::JsValue;

use crate::state::models::Commit;

/// Default API base URL
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

/// Local storage key overriding the API base URL
pub const API_BASE_KEY: &str = "changelogger_api_url";

/// Get the API base URL from local storage or use default
pub fn get_api_base() -> String {
    let url = web_sys::window()
        .and_then(|window| window.local_storage().ok().flatten())
        .and_then(|storage| storage.get_item(API_BASE_KEY).ok().flatten())
        .filter(|url| !url.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
    url.trim_end_matches('/').to_string()
}

/// Error from an API call
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request failed with status {status}")]
    Status { status: u16, detail: Option<String> },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl ApiError {
    /// Build an error from a non-2xx response body, picking up the server's
    /// `detail` field when there is one.
    pub fn from_body(status: u16, body: &str) -> Self {
        let detail = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|value| match value.get("detail") {
                Some(serde_json::Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
                _ => None,
            });
        ApiError::Status { status, detail }
    }

    /// Server-provided message, if any
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Status {
                detail: Some(detail),
                ..
            } => Some(detail),
            _ => None,
        }
    }

    /// The server's message, else `fallback`
    pub fn message_or(&self, fallback: &str) -> String {
        self.detail().unwrap_or(fallback).to_string()
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Status { status: 401, .. })
    }
}

impl From<gloo_net::Error> for ApiError {
    fn from(err: gloo_net::Error) -> Self {
        match err {
            gloo_net::Error::SerdeError(e) => ApiError::Parse(e.to_string()),
            other => ApiError::Network(other.to_string()),
        }
    }
}

/// Log a failed call to the browser console
pub fn log_error(context: &str, err: &ApiError) {
    web_sys::console::error_1(&JsValue::from_str(&format!("{}: {}", context, err)));
}

// ============ Request Types ============

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchCommitsRequest {
    pub owner: String,
    pub repo: String,
    pub since_date: String,
    pub max_commits: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateRequest {
    pub owner: String,
    pub repo: String,
    pub commits: Vec<Commit>,
    pub selected_commit_shas: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaveChangelogRequest {
    pub title: String,
    pub content: String,
    pub repository: String,
    pub commit_range: String,
    pub raw_commits: Vec<Commit>,
    pub published: bool,
}

/// Partial update; absent fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChangelogUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
}
