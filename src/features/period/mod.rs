//! Period estimation modules
//!
//! Convert an onset list to a tempo using:
//! - Autocorrelation
//! - Candidate selection with tempo-octave correction

pub mod autocorrelation;
pub mod candidate_filter;

pub use candidate_filter::select_tempo;

/// BPM candidate with confidence
#[derive(Debug, Clone, PartialEq)]
pub struct BpmCandidate {
    /// BPM estimate
    pub bpm: f32,

    /// Confidence score (0.0-1.0)
    pub confidence: f32,
}
