//! Model client integration for AI Draft.
//!
//! The drafting pipeline only ever talks to a [`ModelClient`]: one prompt in,
//! one piece of text out. Production uses [`OpenRouterClient`] over HTTPS;
//! tests use [`StaticModelClient`].

pub mod openrouter;
pub mod stub;

pub use openrouter::{NO_ANSWER_PLACEHOLDER, OpenRouterClient, SYSTEM_PROMPT};
pub use stub::StaticModelClient;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::LlmError;

/// A single request/response exchange with a text-generation service.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Model identifier, for logging.
    fn model_name(&self) -> &str;

    /// Send one composed prompt and return the model's raw text.
    async fn invoke(&self, prompt: &str) -> Result<String, LlmError>;
}

/// Configuration for creating a model client.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Bearer credential. `None` makes every invocation fail before any request.
    pub api_key: Option<secrecy::SecretString>,
    pub model: String,
    /// Base URL without the `/chat/completions` suffix.
    pub base_url: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Create the production model client from configuration.
pub fn create_client(config: &LlmConfig) -> Result<Arc<dyn ModelClient>, LlmError> {
    let client = OpenRouterClient::new(config)?;
    tracing::info!("Using OpenRouter (model: {})", config.model);
    Ok(Arc::new(client))
}
