//! Content-aware timing for the reveal scheduler.

use std::time::Duration;

use crate::tokenizer::RevealToken;

/// Computes the delay to wait before revealing `token`.
///
/// Punctuation gets the longest pauses (mimicking sentence rhythm),
/// code-ish tokens slow down slightly, and longer words take a little
/// longer than short ones.
pub fn reveal_delay(token: &RevealToken) -> Duration {
    let text = token.text.as_str();
    let trimmed = text.trim();

    let millis = if trimmed.is_empty() {
        10
    } else if trimmed.chars().all(|c| matches!(c, '.' | '!' | '?')) {
        80
    } else if trimmed.chars().all(|c| matches!(c, ',' | ';' | ':')) {
        40
    } else if text.contains('`') {
        60
    } else if text.contains(['{', '}', '(', ')', '[', ']', '<', '>', '"']) {
        50
    } else if trimmed.chars().count() > 8 {
        35
    } else if trimmed.chars().count() > 5 {
        25
    } else {
        20
    };
    Duration::from_millis(millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn millis(text: &str) -> u64 {
        reveal_delay(&RevealToken {
            text: text.to_owned(),
        })
        .as_millis() as u64
    }

    #[test]
    fn test_punctuation_delays() {
        assert_eq!(millis("!"), 80);
        assert_eq!(millis("."), 80);
        assert_eq!(millis(","), 40);
        assert_eq!(millis(";"), 40);
    }

    #[test]
    fn test_whitespace_is_fastest() {
        assert_eq!(millis(" "), 10);
        assert_eq!(millis("\n"), 10);
    }

    #[test]
    fn test_code_and_bracket_tokens() {
        assert_eq!(millis("\n```rust"), 60);
        assert_eq!(millis(" `len`"), 60);
        assert_eq!(millis(" (left)"), 50);
        assert_eq!(millis(" \"quoted\""), 50);
    }

    #[test]
    fn test_word_length_tiers() {
        assert_eq!(millis(" extraordinary"), 35);
        assert_eq!(millis(" longish"), 25);
        assert_eq!(millis(" word"), 20);
    }
}
