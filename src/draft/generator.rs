//! Draft generator — sequences the pipeline around one model call.
//!
//! Flow:
//! 1. Validate the request (blocking errors only happen here)
//! 2. Compose the prompt and invoke the model
//! 3. Parse the reply, or classify the failure and fall back locally
//!
//! Every path past validation ends in a populated draft.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tracing::{debug, info};

use crate::error::{DraftError, LlmError};
use crate::llm::{ModelClient, NO_ANSWER_PLACEHOLDER};

use super::classify::classify_error;
use super::fallback::fallback_draft;
use super::parser::{DEFAULT_SUBJECT, parse_reply};
use super::prompt::compose_prompt;
use super::types::{DraftOutcome, GenerationRequest, GenerationResult, Source};

/// Where the generator is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationState {
    Idle,
    Generating,
    Succeeded(Source),
}

/// Runs generations, at most one at a time.
pub struct DraftGenerator {
    client: Arc<dyn ModelClient>,
    in_flight: AtomicBool,
    state: Mutex<GenerationState>,
}

impl DraftGenerator {
    pub fn new(client: Arc<dyn ModelClient>) -> Self {
        Self {
            client,
            in_flight: AtomicBool::new(false),
            state: Mutex::new(GenerationState::Idle),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> GenerationState {
        self.state
            .lock()
            .map(|s| *s)
            .unwrap_or(GenerationState::Idle)
    }

    /// Whether a generation is outstanding.
    pub fn is_generating(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Draft an email for `request`.
    ///
    /// Returns `DraftError::InFlight` immediately if another call is still
    /// running, and a validation error before any model call if the request
    /// has no recipients or no prompt. Model failures never surface as errors:
    /// they yield a fallback draft with an advisory.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<DraftOutcome, DraftError> {
        let _guard = InFlightGuard::acquire(self).ok_or_else(|| {
            debug!("Generation already in progress, rejecting");
            DraftError::InFlight
        })?;

        self.set_state(GenerationState::Idle);
        request.validate()?;

        self.set_state(GenerationState::Generating);
        let prompt = compose_prompt(request);
        info!(
            recipients = request.recipients.len(),
            tone = %request.tone,
            model = self.client.model_name(),
            "Generating draft"
        );

        let outcome = match self.invoke(&prompt).await {
            Ok(text) => DraftOutcome {
                result: model_result(text),
                advisory: None,
            },
            Err(e) => {
                let classified = classify_error(&e.to_string());
                DraftOutcome {
                    result: fallback_draft(request),
                    advisory: Some(classified.user_message),
                }
            }
        };

        info!(source = outcome.result.source.label(), "Draft ready");
        self.set_state(GenerationState::Succeeded(outcome.result.source));
        Ok(outcome)
    }

    /// Invoke the model, folding blank or placeholder replies into failures.
    async fn invoke(&self, prompt: &str) -> Result<String, LlmError> {
        let text = self.client.invoke(prompt).await?;
        if text.trim().is_empty() || text.trim() == NO_ANSWER_PLACEHOLDER {
            return Err(LlmError::EmptyResponse);
        }
        Ok(text)
    }

    fn set_state(&self, state: GenerationState) {
        if let Ok(mut current) = self.state.lock() {
            *current = state;
        }
    }
}

fn model_result(text: String) -> GenerationResult {
    let parsed = parse_reply(&text);
    let subject = if parsed.subject.is_empty() {
        DEFAULT_SUBJECT.to_string()
    } else {
        parsed.subject
    };
    let body = if parsed.body.is_empty() {
        text.trim().to_string()
    } else {
        parsed.body
    };
    GenerationResult {
        subject,
        body,
        raw_model_output: text,
        source: Source::Model,
    }
}

/// Holds the in-flight flag; releases it on drop, including when the
/// generation future is dropped mid-call.
struct InFlightGuard<'a> {
    generator: &'a DraftGenerator,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(generator: &'a DraftGenerator) -> Option<Self> {
        generator
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { generator })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if self.generator.state() == GenerationState::Generating {
            self.generator.set_state(GenerationState::Idle);
        }
        self.generator.in_flight.store(false, Ordering::Release);
    }
}
