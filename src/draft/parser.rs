//! Tolerant parsing of model replies into a subject and body.
//!
//! Tiers are tried in a fixed order and the first match wins:
//! 1. a JSON object with `subject` and/or `body`,
//! 2. a `Subject: ...` line followed by the body,
//! 3. the whole text as the body under a generic subject.
//!
//! The last tier always matches, so parsing never fails.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::debug;

/// Subject used when the reply carries none.
pub const DEFAULT_SUBJECT: &str = "Hello";

static SUBJECT_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Subject:[ \t]*(.*)").unwrap());

/// Which tier produced a parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseTier {
    Json,
    SubjectLine,
    Raw,
}

impl ParseTier {
    pub fn label(&self) -> &'static str {
        match self {
            ParseTier::Json => "json",
            ParseTier::SubjectLine => "subject_line",
            ParseTier::Raw => "raw",
        }
    }
}

/// Subject and body pulled out of a model reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDraft {
    pub subject: String,
    pub body: String,
    pub tier: ParseTier,
}

type TierFn = fn(&str) -> Option<ParsedDraft>;

const TIERS: [TierFn; 3] = [parse_json, parse_subject_line, parse_raw];

/// Parse a model reply. Total: every input yields a draft.
pub fn parse_reply(text: &str) -> ParsedDraft {
    let parsed = TIERS
        .iter()
        .find_map(|tier| tier(text))
        .unwrap_or_else(|| raw_draft(text));
    debug!(tier = parsed.tier.label(), "Parsed model reply");
    parsed
}

/// Tier 1: greedy `{ ... }` span parsed as a JSON object.
pub fn parse_json(text: &str) -> Option<ParsedDraft> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }

    let value: Value = serde_json::from_str(&text[start..=end]).ok()?;
    let object = value.as_object()?;
    if !object.contains_key("subject") && !object.contains_key("body") {
        return None;
    }

    Some(ParsedDraft {
        subject: coerce_string(object.get("subject")),
        body: coerce_string(object.get("body")),
        tier: ParseTier::Json,
    })
}

/// Tier 2: `Subject:` label, body after the next newline.
pub fn parse_subject_line(text: &str) -> Option<ParsedDraft> {
    let caps = SUBJECT_LINE.captures(text)?;
    let matched = caps.get(0)?;
    let subject = caps.get(1).map_or("", |m| m.as_str()).trim().to_string();

    let body = text[matched.start()..]
        .find('\n')
        .map(|offset| text[matched.start() + offset + 1..].trim().to_string())
        .unwrap_or_default();

    Some(ParsedDraft {
        subject,
        body,
        tier: ParseTier::SubjectLine,
    })
}

/// Tier 3: everything is body.
pub fn parse_raw(text: &str) -> Option<ParsedDraft> {
    Some(raw_draft(text))
}

fn raw_draft(text: &str) -> ParsedDraft {
    ParsedDraft {
        subject: DEFAULT_SUBJECT.to_string(),
        body: text.trim().to_string(),
        tier: ParseTier::Raw,
    }
}

fn coerce_string(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(other) => other.to_string().trim().to_string(),
    }
}
