//! Label to pitch tables
//!
//! Chord voicings sit around middle C; bass notes are the chord root two
//! octaves lower. Labels missing from a table produce no notes.

/// MIDI pitches sounded for each chord label
static CHORD_VOICINGS: [(&str, &[u8]); 16] = [
    ("C", &[60, 64, 67]),
    ("G", &[67, 71, 74]),
    ("F", &[65, 69, 72]),
    ("D", &[62, 66, 69]),
    ("A", &[69, 73, 76]),
    ("E", &[64, 68, 71]),
    ("B", &[71, 75, 78]),
    ("Am", &[69, 72, 76]),
    ("Em", &[64, 67, 71]),
    ("Dm", &[62, 65, 69]),
    ("Bm", &[71, 74, 78]),
    ("C5", &[60, 67]),
    ("G5", &[67, 74]),
    ("F5", &[65, 72]),
    ("Csus2", &[60, 62, 67]),
    ("Csus4", &[60, 65, 67]),
];

/// MIDI pitch of the bass note for each chord label
static BASS_NOTES: [(&str, u8); 16] = [
    ("C", 36),
    ("G", 43),
    ("F", 41),
    ("D", 38),
    ("A", 45),
    ("E", 40),
    ("B", 47),
    ("Am", 45),
    ("Em", 40),
    ("Dm", 38),
    ("Bm", 47),
    ("C5", 36),
    ("G5", 43),
    ("F5", 41),
    ("Csus2", 36),
    ("Csus4", 36),
];

/// Pitches of a chord label, if the label is known
pub fn chord_voicing(label: &str) -> Option<&'static [u8]> {
    CHORD_VOICINGS
        .iter()
        .find(|(name, _)| *name == label)
        .map(|&(_, pitches)| pitches)
}

/// Bass pitch of a chord label, if the label is known
pub fn bass_note(label: &str) -> Option<u8> {
    BASS_NOTES
        .iter()
        .find(|(name, _)| *name == label)
        .map(|&(_, pitch)| pitch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::chord::CHORD_TEMPLATES;

    #[test]
    fn test_every_template_has_voicing_and_bass() {
        for template in CHORD_TEMPLATES.iter() {
            assert!(chord_voicing(template.label).is_some(), "{}", template.label);
            assert!(bass_note(template.label).is_some(), "{}", template.label);
        }
    }

    #[test]
    fn test_voicings_match_template_pitch_classes() {
        for template in CHORD_TEMPLATES.iter() {
            let mut classes = [0u8; 12];
            for &pitch in chord_voicing(template.label).unwrap() {
                classes[(pitch % 12) as usize] = 1;
            }
            assert_eq!(classes, template.membership, "{}", template.label);
        }
    }

    #[test]
    fn test_bass_is_chord_root() {
        for template in CHORD_TEMPLATES.iter() {
            let voicing = chord_voicing(template.label).unwrap();
            let bass = bass_note(template.label).unwrap();
            assert_eq!(bass % 12, voicing[0] % 12, "{}", template.label);
            assert!(bass < voicing[0]);
        }
    }

    #[test]
    fn test_unknown_label() {
        assert!(chord_voicing("H7").is_none());
        assert!(bass_note("").is_none());
    }
}
