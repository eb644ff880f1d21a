//! OpenAI-compatible chat completions client

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{build_prompt, ChangelogGenerator, GeneratorError, SYSTEM_PROMPT};
use crate::config::LlmConfig;
use crate::github::Commit;

/// Generator backed by `POST {base_url}/chat/completions`
pub struct OpenAiGenerator {
    client: Client,
    config: LlmConfig,
}

impl OpenAiGenerator {
    pub fn new(config: LlmConfig) -> Result<Self, GeneratorError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    async fn complete(&self, api_key: &str, request: &ChatRequest<'_>) -> Result<String, GeneratorError> {
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        let mut last_error = GeneratorError::Unavailable;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                // Backoff: 0.5s, 2s, 4.5s...
                let delay = Duration::from_millis(500 * (attempt as u64).pow(2));
                tokio::time::sleep(delay).await;
            }

            let response = match self
                .client
                .post(&url)
                .bearer_auth(api_key)
                .json(request)
                .send()
                .await
            {
                Ok(response) => response,
                Err(e) if e.is_timeout() => {
                    last_error = GeneratorError::Timeout;
                    continue;
                }
                Err(e) if e.is_connect() => {
                    last_error = GeneratorError::Unavailable;
                    continue;
                }
                Err(e) => return Err(GeneratorError::Request(e)),
            };

            let status = response.status();
            if status.is_success() {
                let body: ChatResponse = response.json().await?;
                return Ok(body
                    .choices
                    .into_iter()
                    .next()
                    .and_then(|c| c.message.content)
                    .unwrap_or_default());
            }

            if status == StatusCode::TOO_MANY_REQUESTS {
                last_error = GeneratorError::RateLimited;
                continue;
            }

            let message = response.text().await.unwrap_or_default();
            if status.is_server_error() {
                tracing::warn!(attempt, %status, "LLM request failed, retrying");
                last_error = GeneratorError::Api {
                    status: status.as_u16(),
                    message,
                };
                continue;
            }

            return Err(GeneratorError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Err(last_error)
    }
}

#[async_trait]
impl ChangelogGenerator for OpenAiGenerator {
    fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    async fn generate(&self, repository: &str, commits: &[Commit]) -> Result<String, GeneratorError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(GeneratorError::NotConfigured)?;

        let prompt = build_prompt(repository, commits);
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        tracing::info!(
            repository,
            commits = commits.len(),
            model = %self.config.model,
            "Generating changelog"
        );

        self.complete(api_key, &request).await
    }
}

// ============================================
// Request/Response DTOs
// ============================================

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::CommitAuthor;
    use mockito::Matcher;

    fn config_for(server: &mockito::Server) -> LlmConfig {
        LlmConfig {
            api_key: Some("sk-test".into()),
            base_url: server.url(),
            max_retries: 0,
            ..Default::default()
        }
    }

    fn commits() -> Vec<Commit> {
        vec![Commit {
            sha: "abc12345".into(),
            message: "Add stacks".into(),
            author: CommitAuthor::default(),
            url: String::new(),
            stats: None,
            files: Vec::new(),
        }]
    }

    #[tokio::test]
    async fn test_generate_returns_first_choice() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "model": "gpt-3.5-turbo",
                "max_tokens": 1500
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r###"{"choices":[{"message":{"role":"assistant","content":"## Features\n- Stacks"}}]}"###)
            .create_async()
            .await;

        let generator = OpenAiGenerator::new(config_for(&server)).unwrap();
        let text = generator.generate("acme/widgets", &commits()).await.unwrap();
        assert_eq!(text, "## Features\n- Stacks");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_null_content_becomes_empty() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#)
            .create_async()
            .await;

        let generator = OpenAiGenerator::new(config_for(&server)).unwrap();
        assert_eq!(generator.generate("acme/widgets", &commits()).await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_upstream_error_is_reported() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(400)
            .with_body("bad request")
            .create_async()
            .await;

        let generator = OpenAiGenerator::new(config_for(&server)).unwrap();
        let err = generator.generate("acme/widgets", &commits()).await.unwrap_err();
        assert!(matches!(err, GeneratorError::Api { status: 400, .. }));
    }

    #[tokio::test]
    async fn test_missing_key() {
        let generator = OpenAiGenerator::new(LlmConfig::default()).unwrap();
        assert!(!generator.is_configured());
        assert!(matches!(
            generator.generate("acme/widgets", &commits()).await,
            Err(GeneratorError::NotConfigured)
        ));
    }
}
