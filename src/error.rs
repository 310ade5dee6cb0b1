//! Error types for AI Draft.

/// Top-level error type for the app.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Draft error: {0}")]
    Draft(#[from] DraftError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} not set in env")]
    MissingCredential(String),
}

/// Model client errors.
///
/// The `Display` output is what the error classifier inspects, so the API
/// variant keeps both the status code and the response body in its message.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("OpenRouter error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },

    #[error("Empty response from AI")]
    EmptyResponse,
}

/// Errors that block a generation before any model call is made.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    #[error("Please add at least one recipient (comma/newline separated).")]
    MissingRecipients,

    #[error("Please enter a prompt describing the email.")]
    MissingPrompt,

    #[error("A generation is already in progress")]
    InFlight,

    #[error("Invalid tone: {0:?}")]
    InvalidTone(String),
}

/// Errors from saving a draft record.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for the app.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    fn fails_with<E: Into<Error>>(e: E) -> Result<()> {
        Err(e.into())
    }

    #[test]
    fn area_errors_convert_into_top_level() {
        let err = fails_with(DraftError::MissingPrompt).unwrap_err();
        assert!(matches!(err, Error::Draft(DraftError::MissingPrompt)));
        assert_eq!(
            err.to_string(),
            "Draft error: Please enter a prompt describing the email."
        );

        let err = fails_with(ConfigError::MissingCredential("OPENROUTER_API_KEY".into())).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: OPENROUTER_API_KEY not set in env"
        );

        let err = fails_with(LlmError::Api {
            status: 429,
            body: "slow down".into(),
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "LLM error: OpenRouter error 429: slow down");

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = fails_with(ExportError::from(io)).unwrap_err();
        assert!(matches!(err, Error::Export(ExportError::Io(_))));
    }

    #[test]
    fn missing_credential_is_transparent_inside_llm_error() {
        let err = LlmError::from(ConfigError::MissingCredential("OPENROUTER_API_KEY".into()));
        assert_eq!(err.to_string(), "OPENROUTER_API_KEY not set in env");
    }

    #[test]
    fn question_mark_lifts_area_errors() {
        fn save() -> Result<()> {
            Err(std::io::Error::other("disk full"))?;
            Ok(())
        }
        assert!(matches!(save(), Err(Error::Io(_))));
    }
}
