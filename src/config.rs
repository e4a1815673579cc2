//! Configuration parameters for audio analysis

use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Analysis configuration parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    // Onset detection / tempo
    /// Frame size for onset energy analysis (default: 2048)
    pub frame_size: usize,

    /// Hop size for onset energy analysis (default: 512)
    pub hop_size: usize,

    /// Minimum BPM to consider (default: 60.0)
    pub min_bpm: f32,

    /// Maximum BPM to consider (default: 180.0)
    pub max_bpm: f32,

    /// Tempo reported when no periodicity can be found (default: 120.0)
    pub default_bpm: f32,

    /// Onset peak threshold in dB relative to the maximum flux (default: -30.0)
    pub onset_threshold_db: f32,

    /// Maximum distance in seconds between an onset and a grid beat for the
    /// onset to count as aligned (default: 0.07)
    pub beat_alignment_tolerance: f32,

    // Pitch-class profiling
    /// FFT frame size for pitch-class profiling (default: 4096)
    pub chroma_frame_size: usize,

    /// Hop size for pitch-class profiling (default: 2048)
    pub chroma_hop_size: usize,

    /// Pitch bins per octave before folding to 12 classes (default: 36)
    pub bins_per_octave: usize,

    /// Lowest frequency folded into the profile (default: 32.70 Hz, C1)
    pub min_frequency: f32,

    /// Highest frequency folded into the profile (default: 4186.0 Hz, C8)
    pub max_frequency: f32,

    /// Tuning reference for A4 (default: 440.0 Hz)
    pub center_frequency: f32,

    // Chord segmentation
    /// Chord analysis window length in seconds (default: 0.5)
    pub chord_window_seconds: f32,

    /// Trailing windows shorter than this are discarded (default: 0.25)
    pub min_window_seconds: f32,

    /// A window yields a chord only if its best score exceeds this (default: 0.4)
    pub chord_confidence_threshold: f32,

    // Key estimation
    /// Relative margin by which minor-degree energy must beat major-degree
    /// energy (or vice versa) before the mode is flipped (default: 0.1)
    pub mode_third_margin: f32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            frame_size: 2048,
            hop_size: 512,
            min_bpm: 60.0,
            max_bpm: 180.0,
            default_bpm: 120.0,
            onset_threshold_db: -30.0,
            beat_alignment_tolerance: 0.07,
            chroma_frame_size: 4096,
            chroma_hop_size: 2048,
            bins_per_octave: 36,
            min_frequency: 32.70,
            max_frequency: 4186.0,
            center_frequency: 440.0,
            chord_window_seconds: 0.5,
            min_window_seconds: 0.25,
            chord_confidence_threshold: 0.4,
            mode_third_margin: 0.1,
        }
    }
}

impl AnalysisConfig {
    /// Check that every parameter is usable
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` naming the first offending field
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.frame_size == 0 || self.hop_size == 0 {
            return Err(AnalysisError::InvalidInput(
                "frame_size and hop_size must be > 0".to_string(),
            ));
        }
        if self.chroma_frame_size == 0 || self.chroma_hop_size == 0 {
            return Err(AnalysisError::InvalidInput(
                "chroma_frame_size and chroma_hop_size must be > 0".to_string(),
            ));
        }
        if !(self.min_bpm > 0.0 && self.min_bpm < self.max_bpm) {
            return Err(AnalysisError::InvalidInput(format!(
                "Invalid BPM range: [{:.1}, {:.1}]",
                self.min_bpm, self.max_bpm
            )));
        }
        if !(self.default_bpm > 0.0 && self.default_bpm.is_finite()) {
            return Err(AnalysisError::InvalidInput(format!(
                "default_bpm must be positive, got {}",
                self.default_bpm
            )));
        }
        if self.bins_per_octave == 0 || self.bins_per_octave % 12 != 0 {
            return Err(AnalysisError::InvalidInput(format!(
                "bins_per_octave must be a positive multiple of 12, got {}",
                self.bins_per_octave
            )));
        }
        if !(self.min_frequency > 0.0 && self.min_frequency < self.max_frequency) {
            return Err(AnalysisError::InvalidInput(format!(
                "Invalid frequency range: [{:.2}, {:.2}] Hz",
                self.min_frequency, self.max_frequency
            )));
        }
        if self.center_frequency <= 0.0 {
            return Err(AnalysisError::InvalidInput(
                "center_frequency must be > 0".to_string(),
            ));
        }
        if !(self.chord_window_seconds > 0.0
            && self.min_window_seconds > 0.0
            && self.min_window_seconds <= self.chord_window_seconds)
        {
            return Err(AnalysisError::InvalidInput(format!(
                "Invalid chord windows: window={}, min={}",
                self.chord_window_seconds, self.min_window_seconds
            )));
        }
        if !(0.0..=1.0).contains(&self.chord_confidence_threshold) {
            return Err(AnalysisError::InvalidInput(format!(
                "chord_confidence_threshold must be in [0, 1], got {}",
                self.chord_confidence_threshold
            )));
        }
        if self.beat_alignment_tolerance <= 0.0 || self.mode_third_margin < 0.0 {
            return Err(AnalysisError::InvalidInput(
                "beat_alignment_tolerance must be > 0 and mode_third_margin >= 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load a configuration from a JSON file; missing fields take their defaults
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AnalysisConfig, AnalysisError> {
    let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
        AnalysisError::InvalidInput(format!(
            "Cannot read config {}: {}",
            path.as_ref().display(),
            e
        ))
    })?;
    let config: AnalysisConfig = serde_json::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Save a configuration as pretty-printed JSON
pub fn save_config<P: AsRef<Path>>(config: &AnalysisConfig, path: P) -> Result<(), AnalysisError> {
    let content = serde_json::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}
