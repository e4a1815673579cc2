//! BPM candidate selection with tempo-octave correction
//!
//! Autocorrelation of a quantized onset signal often scores the double
//! period (half tempo) above the true one, because the true lag falls
//! between two integer lags while every pair of beats lands on the double
//! lag. When a candidate near twice the winning tempo carries at least half
//! of the winner's support, the faster metrical level is chosen.

use super::BpmCandidate;

/// Minimum relative support for the double-tempo candidate to take over
const OCTAVE_SUPPORT_RATIO: f32 = 0.5;

/// Pick the final tempo from ranked candidates
///
/// # Arguments
///
/// * `candidates` - Candidates ranked by confidence (highest first)
/// * `octave_tolerance_cents` - How far (in cents) a candidate may sit from
///   exactly twice the best tempo and still count as its octave (default: 50)
///
/// # Returns
///
/// The selected candidate, or `None` if there are no candidates
pub fn select_tempo(candidates: &[BpmCandidate], octave_tolerance_cents: f32) -> Option<BpmCandidate> {
    let best = candidates.first()?.clone();

    let doubled = best.bpm * 2.0;
    let octave = candidates
        .iter()
        .filter(|c| cents_between(c.bpm, doubled).abs() <= octave_tolerance_cents)
        .filter(|c| c.confidence >= best.confidence * OCTAVE_SUPPORT_RATIO)
        .max_by(|a, b| {
            a.confidence
                .partial_cmp(&b.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    match octave {
        Some(faster) => {
            log::debug!(
                "Tempo-octave correction: {:.2} -> {:.2} BPM (support {:.3} vs {:.3})",
                best.bpm,
                faster.bpm,
                faster.confidence,
                best.confidence
            );
            Some(faster.clone())
        }
        None => Some(best),
    }
}

/// Signed distance from `b` to `a` in cents
fn cents_between(a: f32, b: f32) -> f32 {
    1200.0 * (a / b).log2()
}
