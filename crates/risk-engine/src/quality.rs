//! Text quality gate
//!
//! Structural heuristics that catch garbled or fragmented extraction output before
//! it reaches the scanner.

use serde::{Deserialize, Serialize};

/// Minimum character count for meaningful text
pub const MIN_MEANINGFUL_CHARS: usize = 50;

/// Share of characters outside the accepted set above which text is treated as garbage
pub const MAX_INVALID_CHAR_RATIO: f64 = 0.3;

/// Accepted average word length range (inclusive)
pub const MIN_AVG_WORD_LEN: f64 = 2.0;
pub const MAX_AVG_WORD_LEN: f64 = 20.0;

/// Punctuation counted as valid text in addition to letters, digits and whitespace
const ALLOWED_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', '\'', '"', '(', ')', '-'];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityIssue {
    TooShort,
    TooManyInvalidChars,
    NoWords,
    AbnormalWordLength,
}

/// Measurements behind a quality decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityAssessment {
    pub char_count: usize,
    pub word_count: usize,
    pub invalid_char_ratio: f64,
    pub average_word_length: f64,
    /// First check that failed, if any
    pub issue: Option<QualityIssue>,
}

impl QualityAssessment {
    pub fn is_meaningful(&self) -> bool {
        self.issue.is_none()
    }

    pub fn details(&self) -> String {
        match self.issue {
            None => format!(
                "{} characters, {} words, {:.1}% invalid",
                self.char_count,
                self.word_count,
                self.invalid_char_ratio * 100.0
            ),
            Some(QualityIssue::TooShort) => format!(
                "only {} characters (minimum {})",
                self.char_count, MIN_MEANINGFUL_CHARS
            ),
            Some(QualityIssue::TooManyInvalidChars) => format!(
                "{:.1}% of characters are outside the expected set",
                self.invalid_char_ratio * 100.0
            ),
            Some(QualityIssue::NoWords) => "no words found".to_string(),
            Some(QualityIssue::AbnormalWordLength) => format!(
                "average word length {:.1} is outside {}-{}",
                self.average_word_length, MIN_AVG_WORD_LEN, MAX_AVG_WORD_LEN
            ),
        }
    }
}

fn is_valid_char(c: char) -> bool {
    c.is_alphanumeric() || c.is_whitespace() || ALLOWED_PUNCTUATION.contains(&c)
}

/// Measure text and report the first failed check
pub fn assess_quality(text: &str) -> QualityAssessment {
    let char_count = text.chars().count();
    let word_count = text.split_whitespace().count();
    let invalid = text.chars().filter(|c| !is_valid_char(*c)).count();
    let non_whitespace = text.chars().filter(|c| !c.is_whitespace()).count();

    let invalid_char_ratio = if char_count == 0 {
        0.0
    } else {
        invalid as f64 / char_count as f64
    };
    let average_word_length = if word_count == 0 {
        0.0
    } else {
        non_whitespace as f64 / word_count as f64
    };

    let issue = if char_count < MIN_MEANINGFUL_CHARS {
        Some(QualityIssue::TooShort)
    } else if invalid_char_ratio > MAX_INVALID_CHAR_RATIO {
        Some(QualityIssue::TooManyInvalidChars)
    } else if word_count == 0 {
        Some(QualityIssue::NoWords)
    } else if !(MIN_AVG_WORD_LEN..=MAX_AVG_WORD_LEN).contains(&average_word_length) {
        Some(QualityIssue::AbnormalWordLength)
    } else {
        None
    };

    QualityAssessment {
        char_count,
        word_count,
        invalid_char_ratio,
        average_word_length,
        issue,
    }
}

/// Decide whether extracted text is usable for analysis
pub fn is_meaningful(text: &str) -> bool {
    assess_quality(text).is_meaningful()
}
