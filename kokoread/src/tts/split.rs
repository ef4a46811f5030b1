use lazy_static::lazy_static;
use regex::Regex;

use crate::error::ConfigError;

/// Paragraph breaks, sentence-final punctuation at the end of a line, and
/// line breaks that start a list item or a capitalized line.
pub const DEFAULT_SPLIT_PATTERN: &str =
    r"(?:\r?\n){2,}|[:.?!;](?:\r?\n)+|\r?\n([-*]|\d+\.|[A-Z])";

lazy_static! {
    static ref DEFAULT_SPLIT: Regex = Regex::new(DEFAULT_SPLIT_PATTERN).unwrap();
}

/// Decides where the input text is cut into separately synthesized pieces.
///
/// A match is a separator and is dropped. When the pattern has a capture
/// group, the next piece starts where the first group starts, so e.g. a list
/// marker matched by the group stays with its line.
#[derive(Debug, Clone)]
pub struct SplitPattern {
    regex: Regex,
}

impl Default for SplitPattern {
    fn default() -> Self {
        Self {
            regex: DEFAULT_SPLIT.clone(),
        }
    }
}

impl SplitPattern {
    pub fn new(pattern: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            regex: Regex::new(pattern)?,
        })
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Trimmed, non-empty pieces of `text` in order.
    pub fn segments<'t>(&self, text: &'t str) -> Vec<&'t str> {
        let mut pieces = Vec::new();
        let mut start = 0;
        for caps in self.regex.captures_iter(text) {
            let Some(sep) = caps.get(0) else { continue };
            pieces.push(&text[start..sep.start()]);
            start = caps.get(1).map_or(sep.end(), |keep| keep.start());
        }
        pieces.push(&text[start..]);

        pieces
            .into_iter()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_paragraphs_and_line_final_punctuation() {
        let split = SplitPattern::default();
        assert_eq!(
            split.segments("One.\nTwo.\n\nThree"),
            vec!["One", "Two", "Three"]
        );
        assert_eq!(
            split.segments("para one\n\n\npara two"),
            vec!["para one", "para two"]
        );
    }

    #[test]
    fn keeps_list_markers_with_their_line() {
        let split = SplitPattern::default();
        assert_eq!(
            split.segments("Shopping:\n- milk\n* eggs\n2. bread"),
            vec!["Shopping", "- milk", "* eggs", "2. bread"]
        );
    }

    #[test]
    fn capital_letter_starts_a_new_piece_lowercase_does_not() {
        let split = SplitPattern::default();
        assert_eq!(
            split.segments("first line\nSecond line\nand more"),
            vec!["first line", "Second line\nand more"]
        );
    }

    #[test]
    fn handles_crlf() {
        let split = SplitPattern::default();
        assert_eq!(split.segments("Hi.\r\nThere\r\n\r\nYou"), vec!["Hi", "There", "You"]);
    }

    #[test]
    fn text_without_separators_is_one_piece() {
        let split = SplitPattern::default();
        assert_eq!(
            split.segments("  Just one sentence. And another.  "),
            vec!["Just one sentence. And another."]
        );
        assert!(split.segments("").is_empty());
        assert!(split.segments("\n\n\n").is_empty());
    }

    #[test]
    fn custom_pattern() {
        let split = SplitPattern::new(r"\s*\|\s*").unwrap();
        assert_eq!(split.segments("a | b|c"), vec!["a", "b", "c"]);
        assert!(SplitPattern::new("(unclosed").is_err());
    }
}
