//! Analysis configuration

use crate::normalizer::NormalizeMode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default extraction budget (30 seconds)
pub const DEFAULT_EXTRACTION_TIMEOUT_MS: u64 = 30_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub normalize_mode: NormalizeMode,
    /// Keep going when extracted text fails the quality gate
    pub allow_low_quality: bool,
    pub extraction_timeout_ms: u64,
}

impl AnalysisConfig {
    pub fn extraction_timeout(&self) -> Duration {
        Duration::from_millis(self.extraction_timeout_ms)
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            normalize_mode: NormalizeMode::Flat,
            allow_low_quality: false,
            extraction_timeout_ms: DEFAULT_EXTRACTION_TIMEOUT_MS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = AnalysisConfig::default();
        assert_eq!(config.normalize_mode, NormalizeMode::Flat);
        assert!(!config.allow_low_quality);
        assert_eq!(config.extraction_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: AnalysisConfig =
            serde_json::from_str(r#"{"normalize_mode": "paragraphs"}"#).unwrap();
        assert_eq!(
            config,
            AnalysisConfig {
                normalize_mode: NormalizeMode::Paragraphs,
                ..AnalysisConfig::default()
            }
        );
    }
}
