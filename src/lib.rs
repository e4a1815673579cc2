//! # Karaoke DSP
//!
//! Audio analysis for karaoke backing tracks: tempo and beat grid, chord
//! sequence, tonal center and difficulty, plus tempo-synchronized percussion
//! and multi-track MIDI export.
//!
//! ## Features
//!
//! - **Tempo & Beats**: Energy-flux onsets, FFT autocorrelation, constant-tempo grid
//! - **Chords**: Pitch-class profiles matched against a fixed chord dictionary
//! - **Key**: Krumhansl-Kessler correlation with a scale-degree mode check
//! - **Difficulty**: Easy / Medium / Hard from chord vocabulary, tempo and confidence
//! - **Percussion**: One measure of rock, pop, jazz or electronic drums
//! - **MIDI Export**: Chords, bass and drums on fixed tracks/channels 0, 1 and 9
//!
//! ## Quick Start
//!
//! ```no_run
//! use karaoke_dsp::{analyze_audio, AnalysisConfig};
//!
//! // Load audio samples (mono, f32, normalized)
//! let samples: Vec<f32> = vec![]; // Your audio data
//! let sample_rate = 44100;
//!
//! // Analyze
//! let result = analyze_audio(&samples, sample_rate, AnalysisConfig::default())?;
//!
//! println!("Tempo: {:.2} BPM, key: {:?}", result.tempo, result.key);
//! println!("Chords: {:?}", result.chord_progression);
//! # Ok::<(), karaoke_dsp::AnalysisError>(())
//! ```
//!
//! ## Architecture
//!
//! The analysis pipeline follows this flow:
//!
//! ```text
//! Waveform → Beat Tracking → Chord Segmentation → Key Estimation → Progression/Difficulty → Result
//!                tempo → Percussion ──┐
//!                chords ──────────────┴→ MIDI Export
//! ```
//!
//! Chord segmentation and key estimation never fail: when they cannot run
//! they substitute a fixed default and say so in
//! [`AnalysisMetadata`](analysis::metadata::AnalysisMetadata).

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod export;
pub mod features;
pub mod io;
pub mod percussion;
pub mod preprocessing;

// Re-export main types
pub use analysis::estimate::Estimate;
pub use analysis::metadata::AnalysisMetadata;
pub use analysis::result::{AnalysisResult, ChordEvent, Difficulty, KeyEstimate, KeyMode};
pub use config::AnalysisConfig;
pub use error::AnalysisError;
pub use export::{export_karaoke_midi, MidiExporter, NoteEvent};
pub use io::{decode_audio, Waveform};
pub use percussion::{generate_drum_pattern, DrumHit, DrumInstrument, DrumStyle, PercussionPattern};

use analysis::difficulty::rate_difficulty;
use analysis::progression::summarize_progression;
use features::beat_tracking::track_beats;
use features::chord::segment_chords;
use features::key::estimate_key;
use std::time::Instant;

/// Title used when the caller does not supply one
const UNTITLED: &str = "untitled";

/// Main analysis function
///
/// Analyzes mono audio samples and returns tempo, beats, chords, key,
/// progression and difficulty.
///
/// # Arguments
///
/// * `samples` - Mono audio samples, normalized to [-1.0, 1.0]
/// * `sample_rate` - Sample rate in Hz (typically 22050 or 44100)
/// * `config` - Analysis configuration parameters
///
/// # Returns
///
/// `AnalysisResult` titled "untitled"; use [`analyze_waveform`] to name it
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` for empty samples, a zero sample rate
/// or an invalid configuration, and propagates beat-tracking failures
/// (e.g. `NumericalError` for non-finite samples)
///
/// # Example
///
/// ```no_run
/// use karaoke_dsp::{analyze_audio, AnalysisConfig};
///
/// let samples = vec![0.0f32; 44100 * 30]; // 30 seconds of silence
/// let result = analyze_audio(&samples, 44100, AnalysisConfig::default())?;
/// assert_eq!(result.tempo, 120.0);
/// # Ok::<(), karaoke_dsp::AnalysisError>(())
/// ```
pub fn analyze_audio(
    samples: &[f32],
    sample_rate: u32,
    config: AnalysisConfig,
) -> Result<AnalysisResult, AnalysisError> {
    if samples.is_empty() {
        return Err(AnalysisError::InvalidInput("Empty audio samples".to_string()));
    }
    let waveform = Waveform::new(samples.to_vec(), sample_rate)?;
    analyze_waveform(&waveform, UNTITLED, &config)
}

/// Analyze a decoded waveform
///
/// Runs beat tracking, chord segmentation, key estimation, progression
/// summary and difficulty rating in that order.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` for an empty waveform or an invalid
/// configuration, and propagates beat-tracking failures
pub fn analyze_waveform(
    waveform: &Waveform,
    title: &str,
    config: &AnalysisConfig,
) -> Result<AnalysisResult, AnalysisError> {
    let start_time = Instant::now();

    log::debug!(
        "Starting analysis of '{}': {} samples at {} Hz",
        title,
        waveform.len(),
        waveform.sample_rate()
    );

    if waveform.is_empty() {
        return Err(AnalysisError::InvalidInput("Empty audio samples".to_string()));
    }
    config.validate()?;

    let beat_track = track_beats(waveform, config)?;
    let chords = segment_chords(waveform, config);
    let key = estimate_key(waveform, config);

    let mut warnings = Vec::new();
    warnings.extend(chords.fallback_reason().map(str::to_string));
    warnings.extend(key.fallback_reason().map(str::to_string));
    if beat_track.tempo_confidence <= 0.0 {
        warnings.push(format!(
            "no tempo could be estimated, using default {:.1} BPM",
            config.default_bpm
        ));
    }

    let chord_progression = summarize_progression(chords.value());
    let difficulty = rate_difficulty(chords.value(), beat_track.tempo_bpm);

    let key_estimate = *key.value();
    let metadata = AnalysisMetadata {
        sample_rate: waveform.sample_rate(),
        processing_time_ms: start_time.elapsed().as_secs_f32() * 1000.0,
        algorithm_version: env!("CARGO_PKG_VERSION").to_string(),
        chord_source: chords.source_name().to_string(),
        key_source: key.source_name().to_string(),
        warnings,
    };

    log::debug!(
        "Analysis of '{}' done in {:.1} ms: {:.2} BPM, key {}, {} chords, {}",
        title,
        metadata.processing_time_ms,
        beat_track.tempo_bpm,
        key_estimate.name(),
        chords.value().len(),
        difficulty
    );

    Ok(AnalysisResult {
        title: title.to_string(),
        tempo: round2(beat_track.tempo_bpm),
        duration: round2(waveform.duration_seconds()),
        chords: chords.into_value(),
        beats: beat_track.beats,
        key: Some(key_estimate.label().to_string()),
        key_mode: key_estimate.mode,
        chord_progression: Some(chord_progression),
        difficulty: Some(difficulty),
        metadata,
    })
}

fn round2(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}
