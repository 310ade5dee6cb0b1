//! Shared types for the drafting pipeline.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DraftError;

// ── Recipient ───────────────────────────────────────────────────────

/// A single destination address. Never validated, never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub email: String,
}

// ── Tone ────────────────────────────────────────────────────────────

/// Tone of the drafted email.
///
/// The five named tones come from the picker; any other label is kept
/// verbatim as `Custom` and treated like `Professional` by the fallback.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Tone {
    #[default]
    Professional,
    Casual,
    Friendly,
    Urgent,
    Concise,
    Custom(String),
}

impl Tone {
    /// The named tones, in picker order.
    pub const ALL: [Tone; 5] = [
        Tone::Professional,
        Tone::Casual,
        Tone::Friendly,
        Tone::Urgent,
        Tone::Concise,
    ];

    pub fn label(&self) -> &str {
        match self {
            Tone::Professional => "Professional",
            Tone::Casual => "Casual",
            Tone::Friendly => "Friendly",
            Tone::Urgent => "Urgent",
            Tone::Concise => "Concise",
            Tone::Custom(label) => label,
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Tone {
    type Err = DraftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(DraftError::InvalidTone(s.to_string()));
        }
        Ok(Tone::ALL
            .into_iter()
            .find(|t| t.label().eq_ignore_ascii_case(trimmed))
            .unwrap_or_else(|| Tone::Custom(trimmed.to_string())))
    }
}

impl From<Tone> for String {
    fn from(tone: Tone) -> Self {
        tone.label().to_string()
    }
}

impl TryFrom<String> for Tone {
    type Error = DraftError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ── Request / result ────────────────────────────────────────────────

/// Everything needed to draft one email.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub recipients: Vec<Recipient>,
    pub tone: Tone,
    pub user_prompt: String,
}

impl GenerationRequest {
    pub fn new(recipients: Vec<Recipient>, tone: Tone, user_prompt: impl Into<String>) -> Self {
        Self {
            recipients,
            tone,
            user_prompt: user_prompt.into(),
        }
    }

    /// Check the preconditions for a generation attempt.
    pub fn validate(&self) -> Result<(), DraftError> {
        if self.recipients.is_empty() {
            return Err(DraftError::MissingRecipients);
        }
        if self.user_prompt.trim().is_empty() {
            return Err(DraftError::MissingPrompt);
        }
        Ok(())
    }
}

/// Provenance of a drafted email.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// Parsed from the remote model's reply.
    Model,
    /// Synthesized locally after the model call failed.
    Fallback,
}

impl Source {
    pub fn label(&self) -> &'static str {
        match self {
            Source::Model => "model",
            Source::Fallback => "fallback",
        }
    }
}

/// A complete draft. `subject` and `body` are never both left empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub subject: String,
    pub body: String,
    /// Literal model text, or the serialized fallback draft.
    pub raw_model_output: String,
    pub source: Source,
}

/// Outcome of a model failure, as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedError {
    pub is_rate_limited: bool,
    pub user_message: String,
}

/// What `generate` hands back: a draft plus, on fallback, why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftOutcome {
    pub result: GenerationResult,
    /// Advisory explaining why the fallback was used.
    pub advisory: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tone_parses_case_insensitively() {
        assert_eq!("casual".parse::<Tone>().unwrap(), Tone::Casual);
        assert_eq!(" URGENT ".parse::<Tone>().unwrap(), Tone::Urgent);
        assert_eq!("Concise".parse::<Tone>().unwrap(), Tone::Concise);
    }

    #[test]
    fn tone_unknown_label_is_custom() {
        assert_eq!(
            "Apologetic".parse::<Tone>().unwrap(),
            Tone::Custom("Apologetic".into())
        );
    }

    #[test]
    fn tone_empty_is_rejected() {
        assert!(matches!("  ".parse::<Tone>(), Err(DraftError::InvalidTone(_))));
    }

    #[test]
    fn tone_serializes_as_label() {
        assert_eq!(serde_json::to_string(&Tone::Friendly).unwrap(), "\"Friendly\"");
        let tone: Tone = serde_json::from_str("\"friendly\"").unwrap();
        assert_eq!(tone, Tone::Friendly);
    }

    #[test]
    fn validate_requires_recipients_and_prompt() {
        let to = vec![Recipient {
            email: "a@x.com".into(),
        }];
        assert_eq!(
            GenerationRequest::new(vec![], Tone::Casual, "hi").validate(),
            Err(DraftError::MissingRecipients)
        );
        assert_eq!(
            GenerationRequest::new(to.clone(), Tone::Casual, "  \n").validate(),
            Err(DraftError::MissingPrompt)
        );
        assert!(GenerationRequest::new(to, Tone::Casual, "hi").validate().is_ok());
    }

    #[test]
    fn result_serializes_camel_case() {
        let result = GenerationResult {
            subject: "S".into(),
            body: "B".into(),
            raw_model_output: "{}".into(),
            source: Source::Fallback,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["rawModelOutput"], "{}");
        assert_eq!(json["source"], "fallback");
    }
}
