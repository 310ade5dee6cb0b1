//! Deterministic model client for tests and offline runs.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::ModelClient;
use crate::error::LlmError;

enum Reply {
    Text(String),
    Failure { status: u16, body: String },
}

/// Model client that returns the same reply on every invocation.
pub struct StaticModelClient {
    reply: Reply,
    calls: AtomicUsize,
}

impl StaticModelClient {
    /// Always answer with `text`.
    pub fn replying(text: impl Into<String>) -> Self {
        Self {
            reply: Reply::Text(text.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Always fail as if the service returned `status` with `body`.
    pub fn failing(status: u16, body: impl Into<String>) -> Self {
        Self {
            reply: Reply::Failure {
                status,
                body: body.into(),
            },
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of times `invoke` has been called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Acquire)
    }
}

#[async_trait]
impl ModelClient for StaticModelClient {
    fn model_name(&self) -> &str {
        "static"
    }

    async fn invoke(&self, _prompt: &str) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::AcqRel);
        match &self.reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::Failure { status, body } => Err(LlmError::Api {
                status: *status,
                body: body.clone(),
            }),
        }
    }
}
