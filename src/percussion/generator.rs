//! Tempo-synchronized percussion generation

use super::styles::DrumStyle;
use super::{DrumHit, DrumInstrument, PercussionPattern, BEATS_PER_MEASURE, MIN_TEMPO_BPM};
use crate::error::AnalysisError;

const KICK_VELOCITY: f32 = 0.8;
const SNARE_VELOCITY: f32 = 0.7;
const HIHAT_VELOCITY: f32 = 0.5;

/// Length of one 4-beat measure in seconds
pub fn measure_duration(tempo_bpm: f32) -> f32 {
    BEATS_PER_MEASURE * 60.0 / tempo_bpm
}

/// Expand a style table into hits at `tempo_bpm`
///
/// Kick, snare and hi-hat hits are collected in that order and stably
/// sorted by offset, so simultaneous hits keep kick before snare before
/// hi-hat. `tempo_bpm` must be at least [`MIN_TEMPO_BPM`].
pub fn generate_drum_hits(tempo_bpm: f32, style: DrumStyle) -> Vec<DrumHit> {
    let beat_duration = 60.0 / tempo_bpm;
    let table = style.pattern();

    let lanes = [
        (DrumInstrument::Kick, table.kick, KICK_VELOCITY),
        (DrumInstrument::Snare, table.snare, SNARE_VELOCITY),
        (DrumInstrument::Hihat, table.hihat, HIHAT_VELOCITY),
    ];

    let mut hits: Vec<DrumHit> = Vec::with_capacity(table.hit_count());
    for (instrument, beats, velocity) in lanes {
        hits.extend(beats.iter().map(|&beat| DrumHit {
            offset_seconds: beat * beat_duration,
            instrument,
            velocity,
        }));
    }

    hits.sort_by(|a, b| a.offset_seconds.total_cmp(&b.offset_seconds));
    hits
}

/// Generate one measure for a tempo and a style tag
///
/// Unknown style tags fall back to rock; the returned pattern names the style
/// actually used.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if `tempo_bpm` is not finite or is
/// below [`MIN_TEMPO_BPM`]
///
/// # Example
///
/// ```
/// use karaoke_dsp::percussion::generate_drum_pattern;
///
/// let pattern = generate_drum_pattern(120.0, "rock")?;
/// assert_eq!(pattern.pattern.len(), 12);
/// assert_eq!(pattern.pattern[0].offset_seconds, 0.0);
/// # Ok::<(), karaoke_dsp::AnalysisError>(())
/// ```
pub fn generate_drum_pattern(tempo_bpm: f32, style_tag: &str) -> Result<PercussionPattern, AnalysisError> {
    if !(tempo_bpm >= MIN_TEMPO_BPM && tempo_bpm.is_finite()) {
        return Err(AnalysisError::InvalidInput(format!(
            "Tempo must be at least {:.3} BPM and finite, got {}",
            MIN_TEMPO_BPM, tempo_bpm
        )));
    }

    let style = DrumStyle::from_tag(style_tag);
    let pattern = generate_drum_hits(tempo_bpm, style);

    log::debug!(
        "Generated {} {} hits at {:.1} BPM ({:.3}s measure)",
        pattern.len(),
        style.name(),
        tempo_bpm,
        measure_duration(tempo_bpm)
    );

    Ok(PercussionPattern {
        tempo: tempo_bpm,
        pattern,
        style: style.name().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offsets(hits: &[DrumHit], instrument: DrumInstrument) -> Vec<f32> {
        hits.iter()
            .filter(|h| h.instrument == instrument)
            .map(|h| h.offset_seconds)
            .collect()
    }

    #[test]
    fn test_rock_at_120() {
        let pattern = generate_drum_pattern(120.0, "rock").unwrap();
        let hits = &pattern.pattern;
        assert_eq!(hits.len(), 12);
        assert_eq!(offsets(hits, DrumInstrument::Kick), vec![0.0, 1.0]);
        assert_eq!(offsets(hits, DrumInstrument::Snare), vec![0.5, 1.5]);
        assert_eq!(
            offsets(hits, DrumInstrument::Hihat),
            vec![0.0, 0.25, 0.5, 0.75, 1.0, 1.25, 1.5, 1.75]
        );
        assert!(hits.windows(2).all(|w| w[0].offset_seconds <= w[1].offset_seconds));
        assert_eq!(pattern.style, "rock");
    }

    #[test]
    fn test_simultaneous_hits_keep_lane_order() {
        let hits = generate_drum_hits(120.0, DrumStyle::Rock);
        assert_eq!(hits[0].instrument, DrumInstrument::Kick);
        assert_eq!(hits[1].instrument, DrumInstrument::Hihat);
        assert_eq!(hits[0].velocity, 0.8);
        assert_eq!(hits[1].velocity, 0.5);
    }

    #[test]
    fn test_properties_for_all_styles() {
        for &tempo in &[40.0f32, 72.5, 120.0, 174.0, 300.0] {
            for style in DrumStyle::ALL {
                let hits = generate_drum_hits(tempo, style);
                let measure = measure_duration(tempo);
                assert_eq!(hits.len(), style.pattern().hit_count());
                assert!(hits.windows(2).all(|w| w[0].offset_seconds <= w[1].offset_seconds));
                assert!(hits
                    .iter()
                    .all(|h| h.offset_seconds >= 0.0 && h.offset_seconds < measure));
                assert!(hits.iter().all(|h| (0.0..=1.0).contains(&h.velocity)));
            }
        }
    }

    #[test]
    fn test_unknown_style_is_rock() {
        let pattern = generate_drum_pattern(100.0, "polka").unwrap();
        assert_eq!(pattern.style, "rock");
        assert_eq!(pattern.pattern, generate_drum_hits(100.0, DrumStyle::Rock));
    }

    #[test]
    fn test_invalid_tempo() {
        assert!(generate_drum_pattern(0.0, "rock").is_err());
        assert!(generate_drum_pattern(-10.0, "pop").is_err());
        assert!(generate_drum_pattern(f32::INFINITY, "jazz").is_err());
    }

    #[test]
    fn test_tempo_too_slow_for_finite_offsets() {
        assert!(matches!(
            generate_drum_pattern(1e-37, "rock"),
            Err(AnalysisError::InvalidInput(_))
        ));
        assert!(generate_drum_pattern(3.0, "rock").is_err());

        let slowest = generate_drum_pattern(MIN_TEMPO_BPM, "electronic").unwrap();
        let measure = measure_duration(MIN_TEMPO_BPM);
        assert!(measure.is_finite());
        for hit in &slowest.pattern {
            assert!(hit.offset_seconds.is_finite());
            assert!(hit.offset_seconds >= 0.0 && hit.offset_seconds < measure);
        }
    }
}
