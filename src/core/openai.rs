use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use crate::error::OpenAiError;
use crate::models::OpenAiConfig;

/// Chat completion API client
pub struct OpenAiClient {
    client: Client,
    config: OpenAiConfig,
    api_key: String,
}

/// Chat message for the chat completions API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Request body for the chat completions endpoint
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

/// Response from the chat completions endpoint
#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
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

#[derive(Debug, Deserialize)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
}

impl OpenAiClient {
    /// Create a new client with the given configuration and key
    pub fn new(config: OpenAiConfig, api_key: String) -> Result<Self, OpenAiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| OpenAiError::RequestFailed(e.to_string()))?;

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    /// Model this client sends requests to
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Ask the model for a completion and return the first choice's text, trimmed
    pub async fn complete(
        &self,
        system_prompt: &str,
        prompt: &str,
        temperature: f32,
    ) -> Result<String, OpenAiError> {
        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));

        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage::system(system_prompt), ChatMessage::user(prompt)],
            temperature,
            max_tokens: self.config.max_tokens,
        };

        debug!("Sending chat request to {}", url);
        debug!(
            "Using model: {}, prompt: {} chars, temperature: {}",
            self.config.model,
            prompt.len(),
            temperature
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => OpenAiError::Unauthorized {
                    status: status.as_u16(),
                    message,
                },
                _ => OpenAiError::HttpError {
                    status: status.as_u16(),
                    message,
                },
            });
        }

        let body = response.text().await.map_err(|e| self.transport_error(e))?;
        let content = extract_content(&body)?;

        info!("Generated {} characters", content.len());
        Ok(content)
    }

    /// Map a transport error, reporting timeouts with the configured limit
    fn transport_error(&self, e: reqwest::Error) -> OpenAiError {
        if e.is_connect() {
            OpenAiError::ConnectionFailed(format!(
                "Could not connect to {}: {}",
                self.config.base_url, e
            ))
        } else if e.is_timeout() {
            OpenAiError::Timeout(self.config.timeout_seconds)
        } else if let Some(status) = e.status() {
            OpenAiError::HttpError {
                status: status.as_u16(),
                message: e.to_string(),
            }
        } else {
            OpenAiError::RequestFailed(e.to_string())
        }
    }
}

/// Pull the first choice's text out of a chat completions response body
fn extract_content(body: &str) -> Result<String, OpenAiError> {
    let parsed: ChatResponse =
        serde_json::from_str(body).map_err(|e| OpenAiError::ParseError(e.to_string()))?;

    if let Some(usage) = &parsed.usage {
        debug!(
            "Tokens used: {} prompt, {} completion",
            usage.prompt_tokens, usage.completion_tokens
        );
    }

    let content = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .unwrap_or_default();

    if content.is_empty() {
        return Err(OpenAiError::EmptyResponse);
    }

    Ok(content)
}
