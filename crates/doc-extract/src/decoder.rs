//! Decoder seam for binary document formats

use crate::error::ExtractionError;

/// Turns the bytes of one binary format into plain text.
///
/// Implementations are black boxes to the extractor: it only cares whether text
/// came back and how much of it.
pub trait DocumentDecoder: Send + Sync {
    /// Decoder identifier, used in logs
    fn name(&self) -> &'static str;

    /// Check if the bytes look like something this decoder understands
    fn can_handle(&self, data: &[u8]) -> bool;

    /// Decode the full document text
    fn decode(&self, data: &[u8]) -> Result<String, ExtractionError>;
}
