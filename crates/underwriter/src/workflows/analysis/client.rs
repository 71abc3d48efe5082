use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;

/// A single completion exchange with the text-generation collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub prompt: String,
    pub temperature: f32,
}

/// Seam for the text-generation collaborator, so services and tests can run
/// against scripted fakes.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("analysis backend rejected the credentials: {0}")]
    Unauthenticated(String),
    #[error("analysis backend rate limited the request: {0}")]
    RateLimited(String),
    #[error("analysis backend returned {status}: {detail}")]
    Provider { status: u16, detail: String },
    #[error("failed to reach the analysis backend: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("analysis backend returned an unreadable body: {0}")]
    MalformedBody(String),
    #[error("analysis backend returned no choices")]
    EmptyResponse,
}

/// Production client for an OpenAI-style chat-completions endpoint.
pub struct OpenAiCompletionClient {
    base_url: String,
    api_key: String,
    model: String,
    http: reqwest::Client,
}

impl OpenAiCompletionClient {
    /// Build a client from configuration. Returns `None` when no API key is
    /// configured so the caller can surface the configuration error lazily,
    /// per request, instead of refusing to boot.
    pub fn from_config(config: &AnalysisConfig) -> Result<Option<Self>, CompletionError> {
        let Some(api_key) = config.api_key.clone() else {
            return Ok(None);
        };

        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Some(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
            http,
        }))
    }
}

#[async_trait]
impl CompletionClient for OpenAiCompletionClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: request.system,
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: request.prompt,
                },
            ],
            temperature: request.temperature,
            stream: false,
        };

        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 => CompletionError::Unauthenticated(detail),
                429 => CompletionError::RateLimited(detail),
                code => CompletionError::Provider {
                    status: code,
                    detail,
                },
            });
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|err| CompletionError::MalformedBody(err.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(CompletionError::EmptyResponse)
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_key: Option<&str>) -> AnalysisConfig {
        AnalysisConfig {
            api_key: api_key.map(str::to_string),
            base_url: "https://api.openai.com/v1/".to_string(),
            model: "gpt-4o".to_string(),
            timeout_secs: 5,
        }
    }

    #[test]
    fn missing_key_builds_no_client() {
        let client = OpenAiCompletionClient::from_config(&config(None)).expect("no build error");
        assert!(client.is_none());
    }

    #[test]
    fn configured_key_builds_a_client_with_trimmed_base_url() {
        let client = OpenAiCompletionClient::from_config(&config(Some("sk-test")))
            .expect("no build error")
            .expect("client built");
        assert_eq!(client.base_url, "https://api.openai.com/v1");
        assert_eq!(client.model, "gpt-4o");
    }

    #[test]
    fn response_body_tolerates_absent_content() {
        let parsed: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices": [{"message": {"role": "assistant"}}]}"#)
                .expect("parses");
        assert!(parsed.choices[0].message.content.is_none());
    }
}
