//! Text normalization
//!
//! Strips control characters and page artifacts, then collapses whitespace.
//! Normalization is idempotent: running it on its own output changes nothing.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use shared_types::MediaType;
use std::fmt;

lazy_static! {
    /// Running page markers such as "Page 3 of 10"
    static ref PAGE_MARKER_PATTERN: Regex =
        Regex::new(r"(?i)page\s+[0-9]+\s+of\s+[0-9]+").unwrap();

    /// Lines holding nothing but a page number (horizontal whitespace allowed)
    static ref PAGE_NUMBER_LINE_PATTERN: Regex =
        Regex::new(r"(?m)^[^\S\n]*[0-9]+[^\S\n]*$").unwrap();

    static ref BLANK_LINE_RUN_PATTERN: Regex = Regex::new(r"\n{3,}").unwrap();
}

/// How line structure is treated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizeMode {
    /// Every whitespace run, line breaks included, becomes a single space
    #[default]
    Flat,
    /// Spaces collapse within lines; line breaks stay, at most two in a row
    Paragraphs,
}

/// Cleaned text; the only way to build one is [`normalize`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedText(String);

impl NormalizedText {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn word_count(&self) -> usize {
        self.0.split_whitespace().count()
    }

    /// Text covered by a byte span, if the span is in bounds and on char boundaries
    pub fn slice(&self, start: usize, end: usize) -> Option<&str> {
        self.0.get(start..end)
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for NormalizedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalize extracted text.
///
/// `source` selects the character filter: PDF-derived text is restricted to printable
/// ASCII plus line breaks and tabs, since pdf decoders leak glyph-mapping debris.
/// Other sources only lose control characters.
pub fn normalize(text: &str, source: &MediaType, mode: NormalizeMode) -> NormalizedText {
    let filtered: String = if *source == MediaType::Pdf {
        text.chars().filter(|c| is_printable_ascii(*c)).collect()
    } else {
        text.chars()
            .filter(|c| !c.is_control() || c.is_whitespace())
            .collect()
    };

    let stripped = strip_page_artifacts(filtered);

    let collapsed = match mode {
        NormalizeMode::Flat => collapse_whitespace(&stripped),
        NormalizeMode::Paragraphs => collapse_within_lines(&stripped),
    };

    NormalizedText(collapsed)
}

fn is_printable_ascii(c: char) -> bool {
    matches!(c, ' '..='~' | '\n' | '\r' | '\t')
}

/// Remove page markers and page-number lines until none are left.
///
/// Removing one artifact can expose another (a marker split by a page-number line,
/// or a number left alone on its line once a marker beside it goes), so a single
/// pass is not enough for idempotence.
fn strip_page_artifacts(mut text: String) -> String {
    loop {
        let without_markers = PAGE_MARKER_PATTERN.replace_all(&text, "");
        let without_numbers = PAGE_NUMBER_LINE_PATTERN.replace_all(&without_markers, "");
        if without_numbers.len() == text.len() {
            return text;
        }
        text = without_numbers.into_owned();
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn collapse_within_lines(text: &str) -> String {
    let lines: Vec<String> = text.split('\n').map(collapse_whitespace).collect();
    let joined = lines.join("\n");
    let joined = BLANK_LINE_RUN_PATTERN.replace_all(&joined, "\n\n");
    joined.trim_matches('\n').to_string()
}
