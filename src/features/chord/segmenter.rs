//! Chord segmentation
//!
//! Splits the waveform into fixed windows (default 0.5 s), profiles each one
//! and labels it with the best-matching chord template. A window produces an
//! event only when its best score exceeds the confidence threshold; weaker
//! windows are dropped rather than substituted.
//!
//! If profiling cannot run at all, or no window passes the threshold, the
//! whole sequence is replaced by a fixed four-chord fallback so downstream
//! stages always see at least one chord.

use super::templates::classify_profile;
use crate::analysis::estimate::Estimate;
use crate::analysis::result::ChordEvent;
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::features::chroma::PitchClassProfiler;
use crate::io::Waveform;

/// Fallback chords as (onset, label)
const FALLBACK_CHORDS: [(f32, &str); 4] = [(0.0, "C"), (2.0, "G"), (4.0, "Am"), (6.0, "F")];

/// Confidence reported for fallback chords
const FALLBACK_CONFIDENCE: f32 = 0.8;

/// Window duration reported for fallback chords
const FALLBACK_WINDOW_SECONDS: f32 = 0.5;

/// The fixed C-G-Am-F sequence used when segmentation fails
pub fn fallback_chord_events() -> Vec<ChordEvent> {
    FALLBACK_CHORDS
        .iter()
        .map(|&(onset, label)| {
            ChordEvent::new(onset, label, FALLBACK_CONFIDENCE, FALLBACK_WINDOW_SECONDS)
        })
        .collect()
}

/// Segment a waveform into chord events
///
/// Never fails: decomposition errors and sequences with no confident window
/// become [`Estimate::Fallback`] carrying [`fallback_chord_events`].
///
/// # Arguments
///
/// * `waveform` - Mono waveform
/// * `config` - Window length, threshold and profiling parameters
///
/// # Returns
///
/// Chord events in onset order, each with confidence above
/// `config.chord_confidence_threshold`
///
/// # Example
///
/// ```
/// use karaoke_dsp::features::chord::segment_chords;
/// use karaoke_dsp::{AnalysisConfig, Waveform};
///
/// let silence = Waveform::new(vec![0.0; 22050], 22050)?;
/// let chords = segment_chords(&silence, &AnalysisConfig::default());
/// assert!(chords.is_fallback());
/// assert_eq!(chords.value().len(), 4);
/// # Ok::<(), karaoke_dsp::AnalysisError>(())
/// ```
pub fn segment_chords(waveform: &Waveform, config: &AnalysisConfig) -> Estimate<Vec<ChordEvent>> {
    match detect_chord_events(waveform, config) {
        Ok(events) if events.is_empty() => Estimate::fallback(
            fallback_chord_events(),
            "no window exceeded the chord confidence threshold",
        ),
        Ok(events) => Estimate::Success(events),
        Err(e) => Estimate::fallback(
            fallback_chord_events(),
            format!("chord segmentation failed: {}", e),
        ),
    }
}

/// Label every window whose best template score exceeds the threshold
fn detect_chord_events(
    waveform: &Waveform,
    config: &AnalysisConfig,
) -> Result<Vec<ChordEvent>, AnalysisError> {
    if waveform.is_empty() {
        return Err(AnalysisError::InvalidInput(
            "Cannot segment an empty waveform".to_string(),
        ));
    }

    let profiler = PitchClassProfiler::new(waveform.sample_rate(), config)?;
    let mut events = Vec::new();
    let mut windows = 0usize;

    for window in waveform.windows(config.chord_window_seconds, config.min_window_seconds) {
        windows += 1;
        let profile = profiler.profile(window.samples)?;
        if profile.is_silent() {
            continue;
        }

        let (template, score) = classify_profile(&profile);
        if score > config.chord_confidence_threshold {
            events.push(ChordEvent::new(
                window.onset_seconds,
                template.label,
                round_confidence(score),
                config.chord_window_seconds,
            ));
        }
    }

    log::debug!(
        "Chord segmentation: {} of {} windows labelled",
        events.len(),
        windows
    );

    Ok(events)
}

/// Round to 3 decimals and clamp to [0, 1]
fn round_confidence(score: f32) -> f32 {
    ((score * 1000.0).round() / 1000.0).clamp(0.0, 1.0)
}
