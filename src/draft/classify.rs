//! Failure classification for model errors.

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use super::types::ClassifiedError;

static RATE_LIMIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)429|rate[- ]?limit|temporarily rate-limited|rate limited").unwrap()
});

pub const RATE_LIMIT_MESSAGE: &str =
    "OpenRouter is temporarily rate-limited. Using local fallback generator.";

/// Decide whether a failure message is a rate limit and build the advisory.
pub fn classify_error(message: &str) -> ClassifiedError {
    let is_rate_limited = RATE_LIMIT.is_match(message);
    warn!(rate_limited = is_rate_limited, error = %message, "AI call failed");

    let user_message = if is_rate_limited {
        RATE_LIMIT_MESSAGE.to_string()
    } else {
        format!("AI generation failed ({message}). Using local fallback.")
    };

    ClassifiedError {
        is_rate_limited,
        user_message,
    }
}
