//! Format extractor - routes a raw document to the decoder for its media type

use crate::decoder::DocumentDecoder;
use crate::docx::DocxDecoder;
use crate::error::ExtractionError;
use crate::pdf::PdfDecoder;
use crate::text::{ExtractedText, MIN_EXTRACTED_CHARS};
use shared_types::{MediaType, RawDocument};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Main extraction entry point
#[derive(Clone)]
pub struct Extractor {
    pdf: Arc<dyn DocumentDecoder>,
    docx: Arc<dyn DocumentDecoder>,
}

impl Extractor {
    pub fn new() -> Self {
        Self {
            pdf: Arc::new(PdfDecoder::new()),
            docx: Arc::new(DocxDecoder::new()),
        }
    }

    /// Build an extractor with substitute decoders for the binary formats
    pub fn with_decoders(pdf: Arc<dyn DocumentDecoder>, docx: Arc<dyn DocumentDecoder>) -> Self {
        Self { pdf, docx }
    }

    /// Extract plain text from a raw document.
    ///
    /// # Errors
    /// - `UnsupportedFormat` - media type is not pdf, docx or plain text
    /// - `EmptyOrImageBasedDocument` - a pdf/docx decoded to fewer than 50 characters
    /// - `ExtractionFailure` - the decoder rejected the byte stream
    ///
    /// Plain text never fails: malformed UTF-8 is replaced, and short text comes back
    /// as an unsuccessful [`ExtractedText`] for the quality gate to judge.
    pub fn extract(&self, raw: &RawDocument) -> Result<ExtractedText, ExtractionError> {
        let media_type = raw.media_type();

        let decoder = match media_type {
            MediaType::PlainText => return Ok(Self::decode_plain_text(raw.bytes())),
            MediaType::Pdf => &self.pdf,
            MediaType::Docx => &self.docx,
            MediaType::Unsupported(mime) => {
                return Err(ExtractionError::UnsupportedFormat(mime.clone()))
            }
        };

        debug!(
            decoder = decoder.name(),
            bytes = raw.bytes().len(),
            "decoding document"
        );

        let extracted = ExtractedText::new(decoder.decode(raw.bytes())?, media_type.clone());
        if !extracted.is_successful() {
            let chars = extracted.text().trim().chars().count();
            warn!(
                decoder = decoder.name(),
                chars,
                min = MIN_EXTRACTED_CHARS,
                "decoder produced too little text"
            );
            return Err(ExtractionError::EmptyOrImageBasedDocument { chars });
        }

        Ok(extracted)
    }

    /// Extract on the blocking pool, giving up once `timeout` elapses.
    ///
    /// A timed-out extraction yields `Cancelled`; whatever the decoder eventually
    /// produces is discarded, so no downstream stage ever sees partial text.
    pub async fn extract_with_timeout(
        &self,
        raw: RawDocument,
        timeout: Duration,
    ) -> Result<ExtractedText, ExtractionError> {
        let extractor = self.clone();
        let task = tokio::task::spawn_blocking(move || extractor.extract(&raw));

        match tokio::time::timeout(timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => Err(ExtractionError::ExtractionFailure(format!(
                "Extraction task failed: {}",
                join_error
            ))),
            Err(_) => {
                let ms = timeout.as_millis() as u64;
                warn!(timeout_ms = ms, "extraction timed out");
                Err(ExtractionError::Cancelled(ms))
            }
        }
    }

    fn decode_plain_text(bytes: &[u8]) -> ExtractedText {
        let decoded = String::from_utf8_lossy(bytes);
        let text: &str = &decoded;
        let text = text.strip_prefix('\u{FEFF}').unwrap_or(text).to_string();
        ExtractedText::new(text, MediaType::PlainText)
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract with the built-in decoders
pub fn extract(raw: &RawDocument) -> Result<ExtractedText, ExtractionError> {
    Extractor::new().extract(raw)
}
