//! Email drafting pipeline.
//!
//! A request flows through:
//! 1. `recipients::parse_recipients()` — raw buffer → address list
//! 2. `prompt::compose_prompt()` — tone, recipients and intent → model prompt
//! 3. `ModelClient::invoke()` — the only I/O
//! 4. `parser::parse_reply()` on success, or `classify::classify_error()` +
//!    `fallback::fallback_draft()` on failure
//!
//! `generator::DraftGenerator` sequences the steps.

pub mod classify;
pub mod export;
pub mod fallback;
pub mod generator;
pub mod parser;
pub mod prompt;
pub mod recipients;
pub mod types;

pub use generator::{DraftGenerator, GenerationState};
pub use types::{
    ClassifiedError, DraftOutcome, GenerationRequest, GenerationResult, Recipient, Source, Tone,
};
