use shared_types::MediaType;

/// Minimum number of characters for extracted text to count as a successful extraction
pub const MIN_EXTRACTED_CHARS: usize = 50;

/// Plain text produced by the extractor, tagged with the format it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    text: String,
    source: MediaType,
    successful: bool,
}

impl ExtractedText {
    pub fn new(text: String, source: MediaType) -> Self {
        let successful = text.trim().chars().count() >= MIN_EXTRACTED_CHARS;
        Self {
            text,
            source,
            successful,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn source(&self) -> &MediaType {
        &self.source
    }

    /// Non-empty and at least [`MIN_EXTRACTED_CHARS`] characters after trimming
    pub fn is_successful(&self) -> bool {
        self.successful
    }

    pub fn into_text(self) -> String {
        self.text
    }
}
