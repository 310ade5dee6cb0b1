//! Interactive session state and command handling for the CLI.
//!
//! `Session::handle_command` does no I/O; it returns a [`Command`] telling
//! the caller what to print or run next.

use chrono::{DateTime, Utc};

use crate::draft::export::{SentRecord, mailto_url};
use crate::draft::prompt::{DEFAULT_PROMPT, PRESETS};
use crate::draft::recipients::{join_recipients, parse_recipients, push_recipient, remove_recipient};
use crate::draft::{DraftOutcome, GenerationRequest, GenerationResult, Recipient, Tone};

pub const NOTHING_DRAFTED: &str = "Nothing drafted yet.";
pub const NO_AI_OUTPUT: &str = "No AI output yet.";

/// What the caller should do after a line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Nothing to do (blank line).
    Nothing,
    /// Informational text for stderr.
    Notice(String),
    /// Output for stdout (links, raw model text).
    Output(String),
    /// Run a generation with this prompt.
    Generate(String),
    /// Save the last draft as a record.
    Save,
    /// Flip the heartbeat on or off.
    ToggleHeartbeat,
    Help,
    Quit,
}

/// Recipients are kept as the raw buffer and re-parsed whenever needed.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub raw_recipients: String,
    pub tone: Tone,
    /// Last draft, including any in-place edits.
    pub last: Option<GenerationResult>,
}

impl Session {
    pub fn new(raw_recipients: impl Into<String>, tone: Tone) -> Self {
        Self {
            raw_recipients: raw_recipients.into(),
            tone,
            last: None,
        }
    }

    pub fn recipients(&self) -> Vec<Recipient> {
        parse_recipients(&self.raw_recipients)
    }

    /// One-line summary of recipients and tone.
    pub fn status(&self) -> String {
        let recipients = self.recipients();
        let to = if recipients.is_empty() {
            "(none)".to_string()
        } else {
            join_recipients(&recipients)
        };
        format!("To: {to} | Tone: {}", self.tone)
    }

    /// Interpret one line of input.
    pub fn handle_command(&mut self, line: &str) -> Command {
        let line = line.trim();
        if line.is_empty() {
            return Command::Nothing;
        }
        if !line.starts_with('/') {
            return Command::Generate(line.to_string());
        }

        let (cmd, arg) = line.split_once(' ').unwrap_or((line, ""));
        let arg = arg.trim();
        match cmd {
            "/help" => Command::Help,
            "/quit" => Command::Quit,
            "/to" => {
                self.raw_recipients = arg.to_string();
                Command::Notice(self.status())
            }
            "/add" => {
                self.raw_recipients = push_recipient(&self.raw_recipients, arg);
                Command::Notice(self.status())
            }
            "/remove" => match arg.parse::<usize>() {
                Ok(n) if n > 0 => {
                    self.raw_recipients = remove_recipient(&self.raw_recipients, n - 1);
                    Command::Notice(self.status())
                }
                _ => Command::Notice("Usage: /remove <number>".to_string()),
            },
            "/tone" => match arg.parse::<Tone>() {
                Ok(tone) => {
                    self.tone = tone;
                    Command::Notice(self.status())
                }
                Err(e) => Command::Notice(e.to_string()),
            },
            "/preset" => match preset(arg) {
                Some(prompt) => Command::Generate(prompt.to_string()),
                None => Command::Notice(format!("Usage: /preset <0-{}>", PRESETS.len())),
            },
            "/subject" => self.edit(|last| last.subject = arg.to_string()),
            "/body" => self.edit(|last| last.body = unescape_newlines(arg)),
            "/raw" => match &self.last {
                Some(last) if !last.raw_model_output.is_empty() => {
                    Command::Output(last.raw_model_output.clone())
                }
                _ => Command::Notice(NO_AI_OUTPUT.to_string()),
            },
            "/mailto" => match &self.last {
                Some(last) => match mailto_url(&self.recipients(), &last.subject, &last.body) {
                    Ok(url) => Command::Output(url),
                    Err(e) => Command::Notice(e.to_string()),
                },
                None => Command::Notice(NOTHING_DRAFTED.to_string()),
            },
            "/save" => match self.last {
                Some(_) => Command::Save,
                None => Command::Notice(NOTHING_DRAFTED.to_string()),
            },
            "/heartbeat" => Command::ToggleHeartbeat,
            other => Command::Notice(format!("Unknown command {other}. /help for commands.")),
        }
    }

    /// Request for a prompt with the current recipients and tone.
    pub fn request(&self, prompt: &str) -> GenerationRequest {
        GenerationRequest::new(self.recipients(), self.tone.clone(), prompt)
    }

    /// Keep a finished draft for later edits and actions.
    pub fn record(&mut self, outcome: &DraftOutcome) {
        self.last = Some(outcome.result.clone());
    }

    /// Record of the last draft as currently edited.
    pub fn sent_record(&self, now: DateTime<Utc>) -> Option<SentRecord> {
        let last = self.last.as_ref()?;
        Some(SentRecord::new(
            &self.recipients(),
            last.subject.clone(),
            last.body.clone(),
            last,
            now,
        ))
    }

    fn edit(&mut self, apply: impl FnOnce(&mut GenerationResult)) -> Command {
        match self.last.as_mut() {
            Some(last) => {
                apply(last);
                Command::Notice("Draft updated.".to_string())
            }
            None => Command::Notice(NOTHING_DRAFTED.to_string()),
        }
    }
}

/// `0` is the default prompt, `1..` the presets.
fn preset(arg: &str) -> Option<&'static str> {
    match arg.parse::<usize>().ok()? {
        0 => Some(DEFAULT_PROMPT),
        n => PRESETS.get(n - 1).copied(),
    }
}

/// A single input line cannot carry newlines, so `\n` is accepted literally.
fn unescape_newlines(text: &str) -> String {
    text.replace("\\n", "\n")
}
