//! Beat grid placement
//!
//! Lays a constant-tempo grid over the waveform. The grid period comes from
//! the tempo estimate; the phase is the onset time (modulo the period) that
//! lines up the largest number of onsets with grid positions.

use crate::error::AnalysisError;

/// Number of leading onsets tried as phase candidates
const MAX_PHASE_CANDIDATES: usize = 64;

/// Place beats at a constant period across `[0, duration_seconds)`
///
/// # Arguments
///
/// * `onset_times` - Onset times in seconds, ascending
/// * `bpm` - Tempo in beats per minute (> 0)
/// * `duration_seconds` - Length of the waveform
/// * `tolerance` - Maximum onset-to-beat distance (seconds) counted as aligned
///
/// # Returns
///
/// Strictly increasing beat times. Empty when there are no onsets to anchor
/// the phase.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if `bpm` is not positive and finite
pub fn place_beat_grid(
    onset_times: &[f32],
    bpm: f32,
    duration_seconds: f32,
    tolerance: f32,
) -> Result<Vec<f32>, AnalysisError> {
    if !(bpm > 0.0 && bpm.is_finite()) {
        return Err(AnalysisError::InvalidInput(format!(
            "BPM must be positive, got {}",
            bpm
        )));
    }
    if onset_times.is_empty() || duration_seconds <= 0.0 {
        return Ok(Vec::new());
    }

    let period = 60.0 / bpm;
    let phase = best_phase(onset_times, period, tolerance);

    let mut beats = Vec::with_capacity((duration_seconds / period) as usize + 1);
    let mut k = 0u32;
    loop {
        let t = phase + k as f32 * period;
        if t >= duration_seconds {
            break;
        }
        beats.push(t);
        k += 1;
    }

    log::debug!(
        "Beat grid: period={:.4}s, phase={:.4}s, {} beats",
        period,
        phase,
        beats.len()
    );

    Ok(beats)
}

/// Phase in `[0, period)` aligning the most onsets; first candidate wins ties
fn best_phase(onset_times: &[f32], period: f32, tolerance: f32) -> f32 {
    let mut best = (0usize, onset_times[0].rem_euclid(period));

    for &candidate in onset_times.iter().take(MAX_PHASE_CANDIDATES) {
        let phase = candidate.rem_euclid(period);
        let aligned = onset_times
            .iter()
            .filter(|&&t| {
                let offset = (t - phase).rem_euclid(period);
                offset.min(period - offset) <= tolerance
            })
            .count();
        if aligned > best.0 {
            best = (aligned, phase);
        }
    }

    best.1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_follows_onsets() {
        let onsets: Vec<f32> = (0..8).map(|i| 0.1 + i as f32 * 0.5).collect();
        let beats = place_beat_grid(&onsets, 120.0, 4.0, 0.05).unwrap();
        assert_eq!(beats.len(), 8);
        assert!((beats[0] - 0.1).abs() < 1e-4);
        assert!((beats[1] - beats[0] - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_outlier_onset_does_not_set_phase() {
        // First onset is off-grid; the regular ones should win
        let mut onsets = vec![0.03];
        onsets.extend((0..6).map(|i| 0.25 + i as f32 * 0.5));
        let beats = place_beat_grid(&onsets, 120.0, 3.0, 0.05).unwrap();
        assert!((beats[0] - 0.25).abs() < 1e-4, "phase was {}", beats[0]);
    }

    #[test]
    fn test_beats_strictly_increasing_and_bounded() {
        let onsets = vec![0.2, 0.9, 1.4];
        let beats = place_beat_grid(&onsets, 97.0, 10.0, 0.07).unwrap();
        assert!(beats.windows(2).all(|w| w[1] > w[0]));
        assert!(beats.iter().all(|&b| (0.0..10.0).contains(&b)));
    }

    #[test]
    fn test_no_onsets() {
        assert!(place_beat_grid(&[], 120.0, 10.0, 0.07).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_bpm() {
        assert!(place_beat_grid(&[0.5], 0.0, 10.0, 0.07).is_err());
        assert!(place_beat_grid(&[0.5], f32::NAN, 10.0, 0.07).is_err());
    }
}
