//! DOCX decoding.
//!
//! DOCX files are ZIP archives of Open XML parts; body text lives in
//! `word/document.xml` as `w:t` runs grouped into `w:p` paragraphs.

use crate::decoder::DocumentDecoder;
use crate::error::ExtractionError;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read};
use zip::ZipArchive;

const DOCUMENT_PART: &str = "word/document.xml";

/// Upper bound on the uncompressed main document part
const MAX_DOCUMENT_PART_BYTES: u64 = 64 * 1024 * 1024;

/// DOCX decoder backed by zip + quick-xml
pub struct DocxDecoder;

impl DocxDecoder {
    pub fn new() -> Self {
        Self
    }

    fn read_document_part(data: &[u8]) -> Result<String, ExtractionError> {
        let mut archive = ZipArchive::new(Cursor::new(data)).map_err(|e| {
            ExtractionError::ExtractionFailure(format!("Failed to open DOCX archive: {}", e))
        })?;

        let mut part = archive.by_name(DOCUMENT_PART).map_err(|_| {
            ExtractionError::ExtractionFailure(format!("DOCX archive has no {}", DOCUMENT_PART))
        })?;

        if part.size() > MAX_DOCUMENT_PART_BYTES {
            return Err(ExtractionError::ExtractionFailure(format!(
                "{} is {} bytes, over the {} byte limit",
                DOCUMENT_PART,
                part.size(),
                MAX_DOCUMENT_PART_BYTES
            )));
        }

        let mut xml = String::new();
        part.read_to_string(&mut xml).map_err(|e| {
            ExtractionError::ExtractionFailure(format!("Failed to read {}: {}", DOCUMENT_PART, e))
        })?;

        Ok(xml)
    }
}

impl Default for DocxDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentDecoder for DocxDecoder {
    fn name(&self) -> &'static str {
        "docx"
    }

    fn can_handle(&self, data: &[u8]) -> bool {
        // Local file header magic of a ZIP archive
        data.starts_with(b"PK\x03\x04")
    }

    fn decode(&self, data: &[u8]) -> Result<String, ExtractionError> {
        if !self.can_handle(data) {
            return Err(ExtractionError::ExtractionFailure(
                "Not a DOCX archive: missing ZIP header".to_string(),
            ));
        }

        let xml = Self::read_document_part(data)?;
        document_text(&xml)
    }
}

/// Flatten `word/document.xml` into plain text, one line per paragraph
fn document_text(xml: &str) -> Result<String, ExtractionError> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut text = String::new();
    let mut in_run = false;
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"r" => in_run = true,
                b"t" => in_text = true,
                _ => {}
            },
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"r" => in_run = false,
                b"t" => in_text = false,
                b"p" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                // Tab stops in paragraph properties are also `w:tab`; only runs carry text tabs
                b"tab" if in_run => text.push('\t'),
                b"br" | b"cr" if in_run => text.push('\n'),
                b"p" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Text(ref t)) if in_text => {
                let unescaped = t.unescape().map_err(|e| {
                    ExtractionError::ExtractionFailure(format!(
                        "Bad entity in {}: {}",
                        DOCUMENT_PART, e
                    ))
                })?;
                text.push_str(&unescaped);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ExtractionError::ExtractionFailure(format!(
                    "Malformed {} at byte {}: {}",
                    DOCUMENT_PART,
                    reader.buffer_position(),
                    e
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(text)
}
