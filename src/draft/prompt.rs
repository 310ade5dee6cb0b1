//! Prompt construction.

use tracing::debug;

use super::recipients::join_recipients;
use super::types::GenerationRequest;

/// Trailing directive. The parser's JSON and `Subject:` tiers depend on it.
pub const OUTPUT_DIRECTIVE: &str = "Output format: JSON like {\"subject\":\"...\", \"body\":\"...\"} if possible. \
If not possible, put \"Subject:\" on the first line, then the body.";

/// Prompt the CLI starts with.
pub const DEFAULT_PROMPT: &str =
    "Write a polite, concise follow-up email asking for a decision. Keep it under 200 words.";

/// Canned prompts offered next to the tone picker.
pub const PRESETS: [&str; 2] = [
    "Write a short, friendly follow-up asking for next steps within a week.",
    "Write a short introduction email to request a meeting and propose 2 time slots.",
];

/// Build the user message sent to the model.
pub fn compose_prompt(request: &GenerationRequest) -> String {
    let prompt = format!(
        "Generate a {tone} email (subject and body) for recipients: {recipients}\n\
         User prompt:\n\
         {prompt}\n\n\
         {OUTPUT_DIRECTIVE}",
        tone = request.tone.label().to_lowercase(),
        recipients = join_recipients(&request.recipients),
        prompt = request.user_prompt,
    );
    debug!(
        len = prompt.len(),
        recipients = request.recipients.len(),
        tone = %request.tone,
        "Composed prompt"
    );
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::recipients::parse_recipients;
    use crate::draft::types::Tone;

    #[test]
    fn composes_full_prompt() {
        let request = GenerationRequest::new(
            parse_recipients("a@x.com;b@y.com"),
            Tone::Urgent,
            "Ask for the invoice.",
        );
        assert_eq!(
            compose_prompt(&request),
            "Generate a urgent email (subject and body) for recipients: a@x.com, b@y.com\n\
             User prompt:\n\
             Ask for the invoice.\n\n\
             Output format: JSON like {\"subject\":\"...\", \"body\":\"...\"} if possible. \
             If not possible, put \"Subject:\" on the first line, then the body."
        );
    }

    #[test]
    fn custom_tone_is_lower_cased() {
        let request = GenerationRequest::new(
            parse_recipients("a@x.com"),
            Tone::Custom("Warm But Firm".into()),
            "hi",
        );
        assert!(compose_prompt(&request).starts_with("Generate a warm but firm email"));
    }

    #[test]
    fn user_prompt_is_verbatim() {
        let prompt = "  line one\n\tline two  ";
        let request = GenerationRequest::new(parse_recipients("a@x.com"), Tone::Casual, prompt);
        assert!(compose_prompt(&request).contains(&format!("User prompt:\n{prompt}\n\n")));
    }

    #[derive(Clone, Default)]
    struct Captured(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn composition_is_logged_with_length() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let request = GenerationRequest::new(parse_recipients("a@x.com"), Tone::Casual, "hi");
        let prompt = tracing::subscriber::with_default(subscriber, || compose_prompt(&request));

        let logs = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(logs.contains("Composed prompt"), "{logs}");
        assert!(logs.contains(&format!("len={}", prompt.len())), "{logs}");
        assert!(logs.contains("recipients=1"), "{logs}");
    }
}
