//! Recipient buffer parsing.
//!
//! The raw buffer is whatever the user typed: addresses separated by any mix
//! of commas, semicolons and newlines. Nothing here validates address syntax.

use std::sync::LazyLock;

use regex::Regex;

use super::types::Recipient;

static SEPARATORS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[,;\n]+").unwrap());

/// Split a raw recipient buffer into trimmed, non-empty entries, in order.
pub fn parse_recipients(raw: &str) -> Vec<Recipient> {
    SEPARATORS
        .split(raw)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|email| Recipient {
            email: email.to_string(),
        })
        .collect()
}

/// Comma-separated display form, as used in prompts and saved buffers.
pub fn join_recipients(recipients: &[Recipient]) -> String {
    recipients
        .iter()
        .map(|r| r.email.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Append one raw entry to the buffer. Blank entries leave it unchanged.
pub fn push_recipient(raw: &str, entry: &str) -> String {
    if entry.trim().is_empty() {
        return raw.to_string();
    }
    if raw.is_empty() {
        entry.to_string()
    } else {
        format!("{raw}, {entry}")
    }
}

/// Drop the entry at `index` and re-serialize the rest.
///
/// Out-of-range indices leave the list as is (normalized).
pub fn remove_recipient(raw: &str, index: usize) -> String {
    let mut recipients = parse_recipients(raw);
    if index < recipients.len() {
        recipients.remove(index);
    }
    join_recipients(&recipients)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emails(raw: &str) -> Vec<String> {
        parse_recipients(raw).into_iter().map(|r| r.email).collect()
    }

    #[test]
    fn splits_on_mixed_separators() {
        assert_eq!(
            emails("a@x.com, b@y.com;c@z.com\nd@w.com"),
            vec!["a@x.com", "b@y.com", "c@z.com", "d@w.com"]
        );
    }

    #[test]
    fn runs_of_separators_and_blanks_are_dropped() {
        assert_eq!(emails(",,; \n ;a@x.com;;\n\n, ,b@y.com,"), vec!["a@x.com", "b@y.com"]);
        assert!(parse_recipients("").is_empty());
        assert!(parse_recipients(" ,;\n ").is_empty());
    }

    #[test]
    fn no_validation_and_duplicates_kept() {
        assert_eq!(
            emails("not an address; a@x.com; a@x.com"),
            vec!["not an address", "a@x.com", "a@x.com"]
        );
    }

    #[test]
    fn windows_line_endings_are_trimmed() {
        assert_eq!(emails("a@x.com\r\nb@y.com\r\n"), vec!["a@x.com", "b@y.com"]);
    }

    #[test]
    fn never_yields_empty_entries() {
        for raw in ["", ",", " ; ", "a,,b", "\n\n\t\n", "x;\t;y"] {
            assert!(parse_recipients(raw).iter().all(|r| !r.email.is_empty()), "{raw:?}");
        }
    }

    #[test]
    fn join_uses_comma_space() {
        assert_eq!(
            join_recipients(&parse_recipients("a@x.com;b@y.com")),
            "a@x.com, b@y.com"
        );
        assert_eq!(join_recipients(&[]), "");
    }

    #[test]
    fn push_appends_with_separator() {
        assert_eq!(push_recipient("", "a@x.com"), "a@x.com");
        assert_eq!(push_recipient("a@x.com", "b@y.com"), "a@x.com, b@y.com");
        assert_eq!(push_recipient("a@x.com", "   "), "a@x.com");
    }

    #[test]
    fn remove_by_index() {
        assert_eq!(remove_recipient("a@x.com; b@y.com\nc@z.com", 1), "a@x.com, c@z.com");
        assert_eq!(remove_recipient("a@x.com", 5), "a@x.com");
    }
}
