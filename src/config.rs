//! Configuration types.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use tracing::warn;

use crate::llm::LlmConfig;

/// Environment variable holding the OpenRouter credential.
pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";

pub const DEFAULT_MODEL: &str = "mistralai/mistral-small-3.2-24b-instruct:free";
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MAX_TOKENS: u32 = 700;
pub const DEFAULT_TEMPERATURE: f32 = 0.2;
pub const DEFAULT_HEARTBEAT_SECS: u64 = 30;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct DraftConfig {
    /// Model client settings (credential, model, endpoint, sampling).
    pub llm: LlmConfig,
    /// Liveness log interval. `None` disables the heartbeat.
    pub heartbeat_interval: Option<Duration>,
    /// Directory where saved draft records are written.
    pub output_dir: PathBuf,
    /// Initial raw recipient buffer for the CLI.
    pub initial_recipients: String,
    /// Initial tone label for the CLI.
    pub initial_tone: Option<String>,
}

impl DraftConfig {
    /// Build config from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_ENV)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .map(SecretString::from);

        let model = lookup("AI_DRAFT_MODEL")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let base_url = lookup("AI_DRAFT_BASE_URL")
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let max_tokens = parse_or(&lookup, "AI_DRAFT_MAX_TOKENS", DEFAULT_MAX_TOKENS);
        let temperature = parse_or(&lookup, "AI_DRAFT_TEMPERATURE", DEFAULT_TEMPERATURE);

        let heartbeat_secs = parse_or(&lookup, "AI_DRAFT_HEARTBEAT_SECS", DEFAULT_HEARTBEAT_SECS);
        let heartbeat_interval = (heartbeat_secs > 0).then(|| Duration::from_secs(heartbeat_secs));

        let output_dir = lookup("AI_DRAFT_OUTPUT_DIR")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        Self {
            llm: LlmConfig {
                api_key,
                model,
                base_url,
                max_tokens,
                temperature,
            },
            heartbeat_interval,
            output_dir,
            initial_recipients: lookup("AI_DRAFT_TO").unwrap_or_default(),
            initial_tone: lookup("AI_DRAFT_TONE").filter(|s| !s.trim().is_empty()),
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr + Copy,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, "Unparseable configuration value, using default");
            default
        }),
    }
}
