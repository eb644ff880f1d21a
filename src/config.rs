//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub github: GitHubConfig,

    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Origins allowed to call the API with credentials
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Where the SPA lives; the OAuth callback redirects here
    #[serde(default = "default_frontend_url")]
    pub frontend_url: String,

    /// Public base URL of this server, used to build the OAuth redirect URI
    #[serde(default = "default_public_url")]
    pub public_url: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "http://localhost:3001".to_string(),
        "http://localhost:8084".to_string(),
    ]
}

fn default_frontend_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_public_url() -> String {
    "http://localhost:8000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
            frontend_url: default_frontend_url(),
            public_url: default_public_url(),
        }
    }
}

impl ServerConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Redirect URI registered with the GitHub OAuth app
    pub fn oauth_redirect_uri(&self) -> String {
        format!(
            "{}/auth/github/callback",
            self.public_url.trim_end_matches('/')
        )
    }
}

/// GitHub OAuth and REST API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubConfig {
    #[serde(default)]
    pub client_id: Option<String>,

    #[serde(default)]
    pub client_secret: Option<String>,

    #[serde(default = "default_github_api_url")]
    pub api_url: String,

    /// Base for `/login/oauth/authorize` and `/login/oauth/access_token`
    #[serde(default = "default_github_oauth_url")]
    pub oauth_url: String,

    #[serde(default = "default_github_scope")]
    pub scope: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_github_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_github_oauth_url() -> String {
    "https://github.com".to_string()
}

fn default_github_scope() -> String {
    "user:email repo".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            api_url: default_github_api_url(),
            oauth_url: default_github_oauth_url(),
            scope: default_github_scope(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl GitHubConfig {
    /// OAuth login needs both halves of the app credentials
    pub fn oauth_configured(&self) -> bool {
        matches!(
            (&self.client_id, &self.client_secret),
            (Some(id), Some(secret)) if !id.is_empty() && !secret.is_empty()
        )
    }
}

/// LLM (OpenAI-compatible chat completions) configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_llm_url")]
    pub base_url: String,

    #[serde(default = "default_llm_model")]
    pub model: String,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_llm_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_llm_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_max_tokens() -> u32 {
    1500
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_retries() -> u32 {
    2
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_llm_url(),
            model: default_llm_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            request_timeout_secs: default_request_timeout(),
            max_retries: default_max_retries(),
        }
    }
}

impl LlmConfig {
    pub fn is_configured(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }
}

/// Changelog store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

fn default_database_path() -> String {
    dirs::data_local_dir()
        .map(|p| {
            p.join("changelogger")
                .join("changelog.db")
                .to_string_lossy()
                .to_string()
        })
        .unwrap_or_else(|| "./changelog.db".to_string())
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

impl StorageConfig {
    /// Database path with a leading `~/` expanded to the home directory
    pub fn resolved_path(&self) -> PathBuf {
        match (self.database_path.strip_prefix("~/"), dirs::home_dir()) {
            (Some(rest), Some(home)) => home.join(rest),
            _ => PathBuf::from(&self.database_path),
        }
    }
}

/// Login session configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_ttl_hours")]
    pub ttl_hours: i64,

    /// How long an OAuth `state` token stays redeemable
    #[serde(default = "default_state_ttl_minutes")]
    pub state_ttl_minutes: i64,

    /// Send the session cookie with the `Secure` attribute
    #[serde(default)]
    pub secure_cookie: bool,
}

fn default_ttl_hours() -> i64 {
    24
}

fn default_state_ttl_minutes() -> i64 {
    10
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_hours: default_ttl_hours(),
            state_ttl_minutes: default_state_ttl_minutes(),
            secure_cookie: false,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load from an explicit path, else default locations, else environment
    pub fn load_default(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_with_env(path);
        }

        let config_paths = [
            dirs::config_dir().map(|p| p.join("changelogger").join("config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return Ok(config);
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Ok(Self::from_env())
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup (the environment in production)
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let first = |keys: &[&str]| keys.iter().find_map(|k| lookup(k));

        // Server overrides
        if let Some(host) = first(&["CHANGELOGGER_HOST"]) {
            self.server.host = host;
        }
        if let Some(port) = first(&["CHANGELOGGER_PORT"]).and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
        if let Some(url) = first(&["CHANGELOGGER_FRONTEND_URL", "FRONTEND_URL"]) {
            self.server.frontend_url = url;
        }
        if let Some(url) = first(&["CHANGELOGGER_PUBLIC_URL"]) {
            self.server.public_url = url;
        }
        if let Some(origins) = first(&["CHANGELOGGER_CORS_ORIGINS"]) {
            self.server.cors_origins = origins
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect();
        }

        // GitHub overrides
        if let Some(id) = first(&["CHANGELOGGER_GITHUB_CLIENT_ID", "GITHUB_CLIENT_ID"]) {
            self.github.client_id = Some(id);
        }
        if let Some(secret) = first(&["CHANGELOGGER_GITHUB_CLIENT_SECRET", "GITHUB_CLIENT_SECRET"])
        {
            self.github.client_secret = Some(secret);
        }
        if let Some(url) = first(&["CHANGELOGGER_GITHUB_API_URL"]) {
            self.github.api_url = url;
        }

        // LLM overrides
        if let Some(key) = first(&["CHANGELOGGER_OPENAI_API_KEY", "OPENAI_API_KEY"]) {
            self.llm.api_key = Some(key);
        }
        if let Some(url) = first(&["CHANGELOGGER_LLM_URL"]) {
            self.llm.base_url = url;
        }
        if let Some(model) = first(&["CHANGELOGGER_LLM_MODEL"]) {
            self.llm.model = model;
        }

        // Storage overrides
        if let Some(path) = first(&["CHANGELOGGER_DATABASE"]) {
            self.storage.database_path = path;
        }

        // Logging overrides
        if let Some(level) = first(&["CHANGELOGGER_LOG_LEVEL"]) {
            self.logging.level = level;
        }
        if let Some(format) = first(&["CHANGELOGGER_LOG_FORMAT"]) {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Changelogger Configuration
#
# Environment variables override these settings:
# - CHANGELOGGER_HOST / CHANGELOGGER_PORT
# - CHANGELOGGER_FRONTEND_URL (or FRONTEND_URL)
# - CHANGELOGGER_PUBLIC_URL
# - CHANGELOGGER_CORS_ORIGINS (comma-separated)
# - CHANGELOGGER_GITHUB_CLIENT_ID (or GITHUB_CLIENT_ID)
# - CHANGELOGGER_GITHUB_CLIENT_SECRET (or GITHUB_CLIENT_SECRET)
# - CHANGELOGGER_OPENAI_API_KEY (or OPENAI_API_KEY)
# - CHANGELOGGER_LLM_URL / CHANGELOGGER_LLM_MODEL
# - CHANGELOGGER_DATABASE
# - CHANGELOGGER_LOG_LEVEL / CHANGELOGGER_LOG_FORMAT

[server]
host = "0.0.0.0"
port = 8000

# Origins allowed to call the API with the session cookie
cors_origins = ["http://localhost:3000", "http://localhost:3001", "http://localhost:8084"]

# Where the web UI is served; OAuth login redirects back here
frontend_url = "http://localhost:3000"

# Public URL of this server (OAuth callback is <public_url>/auth/github/callback)
public_url = "http://localhost:8000"

[github]
# OAuth app credentials (https://github.com/settings/developers)
# client_id = ""
# client_secret = ""
api_url = "https://api.github.com"
oauth_url = "https://github.com"
scope = "user:email repo"
request_timeout_secs = 30

[llm]
# api_key = ""
base_url = "https://api.openai.com/v1"
model = "gpt-3.5-turbo"
max_tokens = 1500
temperature = 0.7
request_timeout_secs = 30
max_retries = 2

[storage]
database_path = "~/.local/share/changelogger/changelog.db"

[session]
ttl_hours = 24
state_ttl_minutes = 10
secure_cookie = false

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
