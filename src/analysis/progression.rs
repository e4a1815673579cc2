//! Chord progression summary

use super::result::ChordEvent;

/// Chords per group when walking the sequence
const GROUP_SIZE: usize = 4;

/// Maximum labels in a summary
const MAX_PROGRESSION_LEN: usize = 8;

/// Reduce a chord sequence to a short representative label list
///
/// Events are walked in consecutive groups of four and each group's labels are
/// appended in order; the result is cut to the first eight labels. Empty input
/// gives an empty summary.
///
/// # Example
///
/// ```
/// use karaoke_dsp::analysis::progression::summarize_progression;
/// use karaoke_dsp::analysis::result::ChordEvent;
///
/// let events: Vec<ChordEvent> = ["C", "G", "Am", "F", "C", "G", "F", "C", "Dm", "G"]
///     .iter()
///     .enumerate()
///     .map(|(i, l)| ChordEvent::new(i as f32 * 0.5, *l, 0.9, 0.5))
///     .collect();
/// let summary = summarize_progression(&events);
/// assert_eq!(summary, vec!["C", "G", "Am", "F", "C", "G", "F", "C"]);
/// ```
pub fn summarize_progression(events: &[ChordEvent]) -> Vec<String> {
    let mut progression = Vec::with_capacity(MAX_PROGRESSION_LEN);
    for group in events.chunks(GROUP_SIZE) {
        progression.extend(group.iter().map(|e| e.label.clone()));
        if progression.len() >= MAX_PROGRESSION_LEN {
            break;
        }
    }
    progression.truncate(MAX_PROGRESSION_LEN);
    progression
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events(labels: &[&str]) -> Vec<ChordEvent> {
        labels
            .iter()
            .enumerate()
            .map(|(i, l)| ChordEvent::new(i as f32 * 0.5, *l, 0.9, 0.5))
            .collect()
    }

    #[test]
    fn test_empty() {
        assert!(summarize_progression(&[]).is_empty());
    }

    #[test]
    fn test_short_sequence_kept_whole() {
        let summary = summarize_progression(&events(&["Am", "F", "C"]));
        assert_eq!(summary, vec!["Am", "F", "C"]);
    }

    #[test]
    fn test_truncated_to_eight() {
        let labels: Vec<&str> = std::iter::repeat(["C", "G", "Am"]).take(10).flatten().collect();
        let summary = summarize_progression(&events(&labels));
        assert_eq!(summary.len(), 8);
        assert_eq!(summary[..3], ["C", "G", "Am"]);
        assert_eq!(summary[7], "G");
    }
}
