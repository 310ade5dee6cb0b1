//! OpenRouter chat-completions client.
//!
//! One POST per invocation: no retry, no streaming, no client-side timeout.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, warn};

use super::{LlmConfig, ModelClient};
use crate::config::API_KEY_ENV;
use crate::error::{ConfigError, LlmError};

/// Fixed system instruction sent with every request.
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant that generates professional emails.\n\
Return output as JSON with keys \"subject\" and \"body\" where body may include paragraphs and line breaks.\n\
If JSON cannot be returned, provide an email subject on the first line prefixed with \"Subject:\" and body after a blank line.";

/// Returned when the service answers with a well-formed envelope but no content.
pub const NO_ANSWER_PLACEHOLDER: &str = "No answer from model.";

/// OpenRouter API client.
pub struct OpenRouterClient {
    api_key: Option<SecretString>,
    model: String,
    endpoint: String,
    max_tokens: u32,
    temperature: f32,
    http: Client,
}

impl OpenRouterClient {
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        let http = Client::builder().build().map_err(LlmError::Network)?;
        Ok(Self {
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            http,
        })
    }

    fn build_request_body(&self, prompt: &str) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": prompt },
            ],
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
        })
    }
}

#[async_trait]
impl ModelClient for OpenRouterClient {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn invoke(&self, prompt: &str) -> Result<String, LlmError> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| ConfigError::MissingCredential(API_KEY_ENV.to_string()))?;

        debug!(model = %self.model, endpoint = %self.endpoint, "invoke: sending request");

        let response = self
            .http
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", api_key.expose_secret()))
            .header("Content-Type", "application/json")
            .json(&self.build_request_body(prompt))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<unreadable body: {e}>"));
            warn!(status = status.as_u16(), "invoke: non-success status");
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: ChatCompletion =
            response
                .json()
                .await
                .map_err(|e| LlmError::InvalidResponse {
                    provider: "openrouter".to_string(),
                    reason: e.to_string(),
                })?;

        Ok(envelope
            .first_content()
            .unwrap_or_else(|| NO_ANSWER_PLACEHOLDER.to_string()))
    }
}

// ── Response envelope ───────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatCompletion {
    fn first_content(self) -> Option<String> {
        self.choices.into_iter().next()?.message?.content
    }
}
