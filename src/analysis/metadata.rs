//! Analysis metadata structures

use serde::{Deserialize, Serialize};

/// Analysis metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisMetadata {
    /// Sample rate of the analyzed waveform in Hz
    pub sample_rate: u32,

    /// Processing time in milliseconds
    pub processing_time_ms: f32,

    /// Algorithm version
    pub algorithm_version: String,

    /// `"detected"` or `"fallback"` for the chord sequence
    pub chord_source: String,

    /// `"detected"` or `"fallback"` for the key
    pub key_source: String,

    /// Reasons for every fallback substitution
    pub warnings: Vec<String>,
}

impl Default for AnalysisMetadata {
    fn default() -> Self {
        Self {
            sample_rate: 0,
            processing_time_ms: 0.0,
            algorithm_version: env!("CARGO_PKG_VERSION").to_string(),
            chord_source: "detected".to_string(),
            key_source: "detected".to_string(),
            warnings: vec![],
        }
    }
}
