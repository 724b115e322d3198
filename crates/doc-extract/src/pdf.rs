//! PDF decoding via pdf-extract

use crate::decoder::DocumentDecoder;
use crate::error::ExtractionError;
use std::panic;

/// How far into the file the `%PDF` header may appear
const HEADER_SEARCH_BYTES: usize = 1024;

/// PDF decoder backed by pdf-extract
pub struct PdfDecoder;

impl PdfDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PdfDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentDecoder for PdfDecoder {
    fn name(&self) -> &'static str {
        "pdf-extract"
    }

    fn can_handle(&self, data: &[u8]) -> bool {
        let head = &data[..data.len().min(HEADER_SEARCH_BYTES)];
        head.windows(4).any(|w| w == b"%PDF")
    }

    fn decode(&self, data: &[u8]) -> Result<String, ExtractionError> {
        if !self.can_handle(data) {
            return Err(ExtractionError::ExtractionFailure(
                "Missing %PDF header".to_string(),
            ));
        }

        // pdf-extract panics on some malformed streams instead of returning an error
        match panic::catch_unwind(|| pdf_extract::extract_text_from_mem(data)) {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => Err(classify_error(&e.to_string())),
            Err(_) => Err(ExtractionError::ExtractionFailure(
                "PDF decoder aborted on a malformed content stream".to_string(),
            )),
        }
    }
}

fn classify_error(message: &str) -> ExtractionError {
    let lower = message.to_lowercase();

    if lower.contains("encrypted") || lower.contains("password") {
        return ExtractionError::ExtractionFailure(format!(
            "PDF is password-protected: {}",
            message
        ));
    }

    ExtractionError::ExtractionFailure(format!("Invalid PDF: {}", message))
}
