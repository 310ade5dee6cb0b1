//! Terminal actions on a finished draft: mailto link, clipboard text and a
//! saved JSON record.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{DraftError, ExportError};

use super::types::{GenerationResult, Recipient, Source};

/// Characters `encodeURIComponent` leaves alone.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

fn encode(s: &str) -> String {
    utf8_percent_encode(s, URI_COMPONENT).to_string()
}

/// `mailto:` link pre-filled with recipients, subject and body.
pub fn mailto_url(recipients: &[Recipient], subject: &str, body: &str) -> Result<String, DraftError> {
    if recipients.is_empty() {
        return Err(DraftError::MissingRecipients);
    }
    let to = recipients
        .iter()
        .map(|r| r.email.as_str())
        .collect::<Vec<_>>()
        .join(",");
    Ok(format!(
        "mailto:{}?subject={}&body={}",
        encode(&to),
        encode(subject),
        encode(body)
    ))
}

/// Plain-text form for copying.
pub fn clipboard_text(subject: &str, body: &str) -> String {
    format!("Subject: {subject}\n\n{body}")
}

/// A draft as it was "sent", saved for later inspection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentRecord {
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
    pub generated_at: DateTime<Utc>,
    pub raw_model_output: String,
    pub source: Source,
}

impl SentRecord {
    /// Record the draft as the user last edited it.
    ///
    /// `subject` and `body` may differ from `result` after in-place edits.
    pub fn new(
        recipients: &[Recipient],
        subject: impl Into<String>,
        body: impl Into<String>,
        result: &GenerationResult,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            to: recipients.iter().map(|r| r.email.clone()).collect(),
            subject: subject.into(),
            body: body.into(),
            generated_at,
            raw_model_output: result.raw_model_output.clone(),
            source: result.source,
        }
    }

    /// `sent-email-<unix millis>.json`
    pub fn file_name(&self) -> String {
        format!("sent-email-{}.json", self.generated_at.timestamp_millis())
    }

    /// Write the record as pretty JSON into `dir`, returning the file path.
    pub async fn save_to(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        let json = serde_json::to_string_pretty(self)?;
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(self.file_name());
        tokio::fs::write(&path, json).await?;
        info!(path = %path.display(), source = self.source.label(), "Saved draft record");
        Ok(path)
    }
}
