//! Local fallback generator.
//!
//! Produces a usable letter from the request alone when the model call fails.
//! Output depends only on the request: no randomness, no clock.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::info;

use super::types::{GenerationRequest, GenerationResult, Source, Tone};

/// Subject topic when the prompt has no words.
pub const FALLBACK_TOPIC: &str = "Follow-up";

/// Opening for tones with no entry in [`TONE_OPENINGS`].
pub const DEFAULT_OPENING: &str = "I am writing to follow up on";

/// Tone keyword → opening line. Matched as a substring of the lower-cased
/// tone label, first entry wins.
pub const TONE_OPENINGS: &[(&str, &str)] = &[
    ("casual", "Hope you are doing well."),
    ("friendly", "Hope you are well and having a great week."),
    ("urgent", "Following up with some urgency on the matter."),
    ("concise", "Quick note:"),
];

const SUBJECT_WORDS: usize = 6;

const CLOSING: &str = "Please let me know your thoughts or the next steps. I appreciate your time.";

const SIGNATURE: &str = "Best regards,\n[Your Name]";

static WORD_START: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w").unwrap());

/// Synthesize a draft without the model.
pub fn fallback_draft(request: &GenerationRequest) -> GenerationResult {
    let subject = fallback_subject(&request.tone, &request.user_prompt);

    let name = recipient_name(request.recipients.first().map(|r| r.email.as_str()));
    let greeting = if name.is_empty() {
        "Hello".to_string()
    } else {
        format!("Dear {name}")
    };

    let body = format!(
        "{greeting},\n\n{opening} {prompt}\n\n{CLOSING}\n\n{SIGNATURE}",
        opening = tone_opening(&request.tone),
        prompt = request.user_prompt,
    );

    let raw_model_output = serialize_draft(&subject, &body);

    info!(tone = %request.tone, "Generated local fallback draft");

    GenerationResult {
        subject,
        body,
        raw_model_output,
        source: Source::Fallback,
    }
}

/// `"<Tone> — <first six words>"`.
pub fn fallback_subject(tone: &Tone, prompt: &str) -> String {
    let short = prompt
        .split_whitespace()
        .take(SUBJECT_WORDS)
        .collect::<Vec<_>>()
        .join(" ");
    let topic = if short.is_empty() {
        FALLBACK_TOPIC
    } else {
        short.as_str()
    };
    format!("{tone} — {topic}")
}

/// Opening line for a tone, from [`TONE_OPENINGS`].
pub fn tone_opening(tone: &Tone) -> &'static str {
    let label = tone.label().to_lowercase();
    TONE_OPENINGS
        .iter()
        .find(|(keyword, _)| label.contains(*keyword))
        .map_or(DEFAULT_OPENING, |&(_, opening)| opening)
}

/// Display name from an address's local part: `jane.doe@x` → `Jane Doe`.
pub fn recipient_name(email: Option<&str>) -> String {
    let Some(email) = email else {
        return String::new();
    };
    let local = email.split('@').next().unwrap_or_default();
    let spaced = local.replace(['.', '_'], " ");
    let titled = WORD_START.replace_all(spaced.trim(), |caps: &regex::Captures<'_>| {
        caps[0].to_uppercase()
    });
    titled.into_owned()
}

#[derive(Serialize)]
struct SerializedDraft<'a> {
    subject: &'a str,
    body: &'a str,
}

fn serialize_draft(subject: &str, body: &str) -> String {
    serde_json::to_string_pretty(&SerializedDraft { subject, body })
        .unwrap_or_else(|_| format!("Subject: {subject}\n\n{body}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::recipients::parse_recipients;

    fn request(to: &str, tone: Tone, prompt: &str) -> GenerationRequest {
        GenerationRequest::new(parse_recipients(to), tone, prompt)
    }

    #[test]
    fn deterministic_for_identical_input() {
        let req = request("jane.doe@x.com", Tone::Casual, "need the report by friday please");
        let first = fallback_draft(&req);
        let second = fallback_draft(&req);
        assert_eq!(first, second);
        assert!(first.body.starts_with("Dear Jane Doe,"));
        assert_eq!(first.source, Source::Fallback);
    }

    #[test]
    fn full_body_template() {
        let draft = fallback_draft(&request(
            "jane.doe@x.com",
            Tone::Casual,
            "need the report by friday please",
        ));
        assert_eq!(draft.subject, "Casual — need the report by friday please");
        assert_eq!(
            draft.body,
            "Dear Jane Doe,\n\n\
             Hope you are doing well. need the report by friday please\n\n\
             Please let me know your thoughts or the next steps. I appreciate your time.\n\n\
             Best regards,\n[Your Name]"
        );
    }

    #[test]
    fn subject_uses_first_six_words() {
        assert_eq!(
            fallback_subject(&Tone::Professional, "one two  three\nfour five six seven eight"),
            "Professional — one two three four five six"
        );
    }

    #[test]
    fn subject_falls_back_to_topic() {
        assert_eq!(fallback_subject(&Tone::Urgent, "   "), "Urgent — Follow-up");
    }

    #[test]
    fn openings_by_tone() {
        assert_eq!(tone_opening(&Tone::Casual), "Hope you are doing well.");
        assert_eq!(
            tone_opening(&Tone::Friendly),
            "Hope you are well and having a great week."
        );
        assert_eq!(
            tone_opening(&Tone::Urgent),
            "Following up with some urgency on the matter."
        );
        assert_eq!(tone_opening(&Tone::Concise), "Quick note:");
        assert_eq!(tone_opening(&Tone::Professional), DEFAULT_OPENING);
        assert_eq!(tone_opening(&Tone::Custom("Semi-Urgent".into())), TONE_OPENINGS[2].1);
        assert_eq!(tone_opening(&Tone::Custom("Stern".into())), DEFAULT_OPENING);
    }

    #[test]
    fn names_from_local_part() {
        assert_eq!(recipient_name(Some("jane.doe@x.com")), "Jane Doe");
        assert_eq!(recipient_name(Some("mary_ann.smith@x.com")), "Mary Ann Smith");
        assert_eq!(recipient_name(Some("o'brien@x.com")), "O'Brien");
        assert_eq!(recipient_name(Some("bob")), "Bob");
        assert_eq!(recipient_name(Some("@x.com")), "");
        assert_eq!(recipient_name(None), "");
    }

    #[test]
    fn greeting_without_name() {
        let draft = fallback_draft(&request("@x.com", Tone::Concise, "status?"));
        assert!(draft.body.starts_with("Hello,\n\nQuick note: status?"));
    }

    #[test]
    fn raw_output_is_serialized_pair() {
        let draft = fallback_draft(&request("a@x.com", Tone::Friendly, "lunch"));
        let value: serde_json::Value = serde_json::from_str(&draft.raw_model_output).unwrap();
        assert_eq!(value["subject"], draft.subject.as_str());
        assert_eq!(value["body"], draft.body.as_str());
    }
}
