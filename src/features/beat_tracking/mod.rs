//! Beat and tempo tracking
//!
//! Estimates a single tempo and a beat grid for the whole waveform:
//! - Peak normalization of a working copy
//! - Energy-flux onset detection
//! - Autocorrelation tempo estimation with octave correction
//! - Constant-tempo grid placement

pub mod grid;

use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::features::onset::energy_flux::detect_energy_flux_onsets;
use crate::features::period::autocorrelation::estimate_bpm_from_autocorrelation;
use crate::features::period::select_tempo;
use crate::io::Waveform;
use crate::preprocessing::normalization::normalize_peak;
use serde::{Deserialize, Serialize};

pub use grid::place_beat_grid;

/// Headroom used when normalizing the onset-detection signal
const ONSET_HEADROOM_DB: f32 = 1.0;

/// Tolerance for treating a candidate as the double of the best tempo
const OCTAVE_TOLERANCE_CENTS: f32 = 50.0;

/// Tempo estimate and beat grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeatTrack {
    /// Tempo in beats per minute (> 0)
    pub tempo_bpm: f32,

    /// Beat times in seconds, strictly increasing
    pub beats: Vec<f32>,

    /// Confidence of the tempo estimate (0.0 when the default tempo was used)
    pub tempo_confidence: f32,
}

/// Estimate tempo and beat grid for a waveform
///
/// When no periodicity can be found (silence, a single hit, too short) the
/// tempo falls back to `config.default_bpm` with zero confidence.
///
/// # Errors
///
/// Returns `AnalysisError` for an empty waveform or non-finite samples
pub fn track_beats(waveform: &Waveform, config: &AnalysisConfig) -> Result<BeatTrack, AnalysisError> {
    let sample_rate = waveform.sample_rate();
    log::debug!(
        "Tracking beats: {} samples at {} Hz",
        waveform.len(),
        sample_rate
    );

    let mut working = waveform.samples().to_vec();
    normalize_peak(&mut working, ONSET_HEADROOM_DB)?;

    let onsets = detect_energy_flux_onsets(
        &working,
        config.frame_size,
        config.hop_size,
        config.onset_threshold_db,
    )?;

    let candidates = estimate_bpm_from_autocorrelation(
        &onsets,
        sample_rate,
        config.hop_size,
        config.min_bpm,
        config.max_bpm,
    )?;

    let (tempo_bpm, tempo_confidence) = match select_tempo(&candidates, OCTAVE_TOLERANCE_CENTS) {
        Some(best) => (best.bpm, best.confidence),
        None => {
            log::warn!(
                "No tempo candidates from {} onsets, using default {:.1} BPM",
                onsets.len(),
                config.default_bpm
            );
            (config.default_bpm, 0.0)
        }
    };

    let onset_times: Vec<f32> = onsets
        .iter()
        .map(|&s| s as f32 / sample_rate as f32)
        .collect();

    let beats = place_beat_grid(
        &onset_times,
        tempo_bpm,
        waveform.duration_seconds(),
        config.beat_alignment_tolerance,
    )?;

    Ok(BeatTrack {
        tempo_bpm,
        beats,
        tempo_confidence,
    })
}
