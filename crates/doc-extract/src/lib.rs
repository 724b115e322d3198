//! Document text extraction
//!
//! Converts raw document bytes plus a declared media type into plain text:
//! - PDF: pdf-extract
//! - DOCX: `word/document.xml` read through zip + quick-xml
//! - Plain text: lossy UTF-8 decode (never fails)
//!
//! PDF and DOCX decoding sits behind the [`DocumentDecoder`] trait so callers can
//! substitute their own decoders. Extraction is the only stage of the analysis
//! pipeline that can block, so it is also where timeouts apply
//! ([`Extractor::extract_with_timeout`]).

pub mod decoder;
pub mod docx;
pub mod error;
pub mod extractor;
pub mod pdf;
pub mod text;

pub use decoder::DocumentDecoder;
pub use docx::DocxDecoder;
pub use error::ExtractionError;
pub use extractor::{extract, Extractor};
pub use pdf::PdfDecoder;
pub use text::{ExtractedText, MIN_EXTRACTED_CHARS};
