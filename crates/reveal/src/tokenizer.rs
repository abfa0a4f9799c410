//! Splits a completed message into reveal tokens.
//!
//! The split is total and lossless: every character of the input
//! appears in exactly one token, in original order, so concatenating
//! the tokens reproduces the message byte for byte. The scheduler
//! relies on this to display a growing prefix that ends up equal to
//! the full content.

/// The atomic unit of text appended during one reveal tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RevealToken {
    /// Exact substring to append to the displayed prefix.
    pub text: String,
}

/// Trailing punctuation that gets split into its own token so it can
/// be revealed with its own timing.
const SPLIT_PUNCTUATION: [char; 6] = ['.', '!', '?', ',', ';', ':'];

/// Splits `text` into an ordered sequence of reveal tokens.
///
/// Messages without a code fence are split word-by-word on single
/// spaces. Messages containing a fence are split line-first: fence
/// lines and fenced lines become whole-line tokens, everything else
/// falls back to the word split.
pub fn tokenize(text: &str) -> Vec<RevealToken> {
    if text.contains("```") {
        tokenize_code_aware(text)
    } else {
        let mut tokens = Vec::new();
        push_line_words(&mut tokens, text, true);
        tokens
    }
}

fn tokenize_code_aware(text: &str) -> Vec<RevealToken> {
    let mut tokens = Vec::new();
    let mut in_fence = false;

    for (idx, line) in text.split('\n').enumerate() {
        let first_line = idx == 0;
        let fence_line = line.trim_start().starts_with("```");

        if fence_line || in_fence {
            // Whole-line token, newline-prefixed unless it opens the
            // message.
            let token = if first_line {
                line.to_owned()
            } else {
                format!("\n{line}")
            };
            tokens.push(RevealToken { text: token });
            if fence_line {
                in_fence = !in_fence;
            }
            continue;
        }

        push_line_words(&mut tokens, line, first_line);
    }
    tokens
}

/// Word-splits one line (or, for the plain path, the whole message).
///
/// The first word of a non-first line carries the line's `\n`;
/// every subsequent word carries the space that precedes it.
fn push_line_words(tokens: &mut Vec<RevealToken>, line: &str, first_line: bool) {
    for (idx, word) in line.split(' ').enumerate() {
        let prefix = match (idx, first_line) {
            (0, true) => "",
            (0, false) => "\n",
            _ => " ",
        };
        let token = format!("{prefix}{word}");
        if token.is_empty() {
            continue;
        }
        push_word_token(tokens, token, word);
    }
}

/// Pushes a word token, splitting a trailing punctuation character
/// into its own token when the word is long enough to warrant it.
fn push_word_token(tokens: &mut Vec<RevealToken>, token: String, word: &str) {
    if word.chars().count() > 2 {
        if let Some(last) = word.chars().last() {
            if SPLIT_PUNCTUATION.contains(&last) {
                let split_at = token.len() - last.len_utf8();
                tokens.push(RevealToken {
                    text: token[..split_at].to_owned(),
                });
                tokens.push(RevealToken {
                    text: last.to_string(),
                });
                return;
            }
        }
    }
    tokens.push(RevealToken { text: token });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(input: &str) -> Vec<String> {
        tokenize(input).into_iter().map(|t| t.text).collect()
    }

    fn concat(input: &str) -> String {
        texts(input).concat()
    }

    #[test]
    fn test_plain_word_split() {
        assert_eq!(texts("Hello, world!"), ["Hello", ",", " world", "!"]);
    }

    #[test]
    fn test_short_words_keep_punctuation() {
        // "a." is too short to split.
        assert_eq!(texts("a. b"), ["a.", " b"]);
    }

    #[test]
    fn test_code_aware_split() {
        let input = "Run this:\n```sh\nls -la\n```\nDone.";
        assert_eq!(
            texts(input),
            [
                "Run",
                " this",
                ":",
                "\n```sh",
                "\nls -la",
                "\n```",
                "\nDone",
                "."
            ]
        );
    }

    #[test]
    fn test_lossless_reconstruction() {
        let samples = [
            "Hello, world!",
            "",
            "   leading and  double  spaces",
            "line one\nline two\n\nline four",
            "```rust\nfn main() {\n    println!(\"hi\");\n}\n```",
            "prose before\n```\ncode: with, punctuation!\n```\nafter",
            "unicode: héllo wörld… 你好!",
            "trailing newline\n",
        ];
        for sample in samples {
            assert_eq!(concat(sample), sample, "lossy split for {sample:?}");
        }
    }

    #[test]
    fn test_empty_input_has_no_tokens() {
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_no_predicate_splitting_inside_fences() {
        let tokens = texts("```\nwords stay together here\n```");
        assert_eq!(
            tokens,
            ["```", "\nwords stay together here", "\n```"]
        );
    }
}
