//! Difficulty rating
//!
//! Additive score over three scalars:
//! - distinct chord labels: ≤3 → 1, ≤5 → 2, else 3
//! - tempo: ≤80 BPM → 1, ≤120 BPM → 2, else 3
//! - mean confidence below 0.6 → +1
//!
//! Total ≤3 is Easy, ≤5 Medium, otherwise Hard.

use super::result::{ChordEvent, Difficulty};
use std::collections::HashSet;

/// Mean confidence below which the rating is bumped up
const LOW_CONFIDENCE: f32 = 0.6;

/// Additive difficulty score
pub fn difficulty_score(distinct_labels: usize, tempo_bpm: f32, mean_confidence: f32) -> u32 {
    let vocabulary = match distinct_labels {
        0..=3 => 1,
        4..=5 => 2,
        _ => 3,
    };
    let speed = if tempo_bpm <= 80.0 {
        1
    } else if tempo_bpm <= 120.0 {
        2
    } else {
        3
    };
    let uncertainty = if mean_confidence < LOW_CONFIDENCE { 1 } else { 0 };
    vocabulary + speed + uncertainty
}

/// Map the three scalars to a rating
///
/// # Example
///
/// ```
/// use karaoke_dsp::analysis::difficulty::score_difficulty;
/// use karaoke_dsp::Difficulty;
///
/// assert_eq!(score_difficulty(2, 70.0, 0.9), Difficulty::Easy);
/// assert_eq!(score_difficulty(6, 140.0, 0.5), Difficulty::Hard);
/// ```
pub fn score_difficulty(distinct_labels: usize, tempo_bpm: f32, mean_confidence: f32) -> Difficulty {
    match difficulty_score(distinct_labels, tempo_bpm, mean_confidence) {
        0..=3 => Difficulty::Easy,
        4..=5 => Difficulty::Medium,
        _ => Difficulty::Hard,
    }
}

/// Rate a chord sequence played at `tempo_bpm`
///
/// Depends only on the set of labels and the mean confidence, so any
/// reordering of `events` gives the same rating. No chords rates Easy.
pub fn rate_difficulty(events: &[ChordEvent], tempo_bpm: f32) -> Difficulty {
    if events.is_empty() {
        return Difficulty::Easy;
    }
    let distinct: HashSet<&str> = events.iter().map(|e| e.label.as_str()).collect();
    let mean_confidence = events.iter().map(|e| e.confidence).sum::<f32>() / events.len() as f32;

    let rating = score_difficulty(distinct.len(), tempo_bpm, mean_confidence);
    log::debug!(
        "Difficulty: {} distinct chords, {:.1} BPM, mean confidence {:.3} -> {}",
        distinct.len(),
        tempo_bpm,
        mean_confidence,
        rating
    );
    rating
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events(labels: &[&str], confidence: f32) -> Vec<ChordEvent> {
        labels
            .iter()
            .enumerate()
            .map(|(i, l)| ChordEvent::new(i as f32, *l, confidence, 0.5))
            .collect()
    }

    #[test]
    fn test_score_components() {
        assert_eq!(difficulty_score(2, 70.0, 0.9), 2);
        assert_eq!(difficulty_score(6, 140.0, 0.5), 7);
        assert_eq!(difficulty_score(4, 120.0, 0.6), 4);
        assert_eq!(difficulty_score(3, 80.0, 0.59), 3);
    }

    #[test]
    fn test_tiers() {
        assert_eq!(score_difficulty(2, 70.0, 0.9), Difficulty::Easy);
        assert_eq!(score_difficulty(6, 140.0, 0.5), Difficulty::Hard);
        assert_eq!(score_difficulty(4, 100.0, 0.8), Difficulty::Medium);
        assert_eq!(score_difficulty(5, 130.0, 0.9), Difficulty::Medium);
        assert_eq!(score_difficulty(6, 121.0, 0.9), Difficulty::Hard);
    }

    #[test]
    fn test_empty_is_easy() {
        assert_eq!(rate_difficulty(&[], 200.0), Difficulty::Easy);
    }

    #[test]
    fn test_order_invariant() {
        let forward = events(&["C", "G", "Am", "F", "Dm", "E", "C"], 0.7);
        let mut reversed = forward.clone();
        reversed.reverse();
        assert_eq!(rate_difficulty(&forward, 130.0), rate_difficulty(&reversed, 130.0));
        assert_eq!(rate_difficulty(&forward, 130.0), Difficulty::Hard);
    }

    #[test]
    fn test_fallback_sequence_rating() {
        // C G Am F at 0.8 and 120 BPM: 2 + 2 + 0 = 4
        let fallback = events(&["C", "G", "Am", "F"], 0.8);
        assert_eq!(rate_difficulty(&fallback, 120.0), Difficulty::Medium);
    }
}
