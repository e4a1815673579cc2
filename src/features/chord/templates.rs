//! Chord template dictionary
//!
//! Each template is a chord label with a binary 12-element membership vector
//! (index 0 = C). Dictionary order is significant: when two templates score
//! exactly the same, the earlier one wins.

use crate::features::chroma::normalization::{cosine_similarity, normalize_unit_sum};
use crate::features::chroma::PitchClassProfile;

/// A named chord and the pitch classes it contains
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChordTemplate {
    /// Chord label
    pub label: &'static str,

    /// 1 for each pitch class in the chord, 0 otherwise
    pub membership: [u8; 12],
}

impl ChordTemplate {
    const fn new(label: &'static str, pitch_classes: &[usize]) -> Self {
        let mut membership = [0u8; 12];
        let mut i = 0;
        while i < pitch_classes.len() {
            membership[pitch_classes[i] % 12] = 1;
            i += 1;
        }
        Self { label, membership }
    }

    /// Membership vector scaled to unit sum
    pub fn normalized(&self) -> [f32; 12] {
        let mut values = [0.0f32; 12];
        for (v, &m) in values.iter_mut().zip(self.membership.iter()) {
            *v = m as f32;
        }
        normalize_unit_sum(&values)
    }

    /// Cosine similarity between this template and a profile
    pub fn score(&self, profile: &PitchClassProfile) -> f32 {
        cosine_similarity(profile.values(), &self.normalized())
    }
}

/// The chord dictionary, in tie-break order
pub static CHORD_TEMPLATES: [ChordTemplate; 16] = [
    // Major triads
    ChordTemplate::new("C", &[0, 4, 7]),
    ChordTemplate::new("G", &[7, 11, 2]),
    ChordTemplate::new("F", &[5, 9, 0]),
    ChordTemplate::new("D", &[2, 6, 9]),
    ChordTemplate::new("A", &[9, 1, 4]),
    ChordTemplate::new("E", &[4, 8, 11]),
    ChordTemplate::new("B", &[11, 3, 6]),
    // Minor triads
    ChordTemplate::new("Am", &[9, 0, 4]),
    ChordTemplate::new("Em", &[4, 7, 11]),
    ChordTemplate::new("Dm", &[2, 5, 9]),
    ChordTemplate::new("Bm", &[11, 2, 6]),
    // Power chords
    ChordTemplate::new("C5", &[0, 7]),
    ChordTemplate::new("G5", &[7, 2]),
    ChordTemplate::new("F5", &[5, 0]),
    // Suspended
    ChordTemplate::new("Csus2", &[0, 2, 7]),
    ChordTemplate::new("Csus4", &[0, 5, 7]),
];

/// Look up a template by label
pub fn find_template(label: &str) -> Option<&'static ChordTemplate> {
    CHORD_TEMPLATES.iter().find(|t| t.label == label)
}

/// Best-matching template for a profile and its raw similarity score
///
/// Templates are scanned in dictionary order and only a strictly higher
/// score replaces the current best, so exact ties keep the earlier template.
pub fn classify_profile(profile: &PitchClassProfile) -> (&'static ChordTemplate, f32) {
    let mut best = &CHORD_TEMPLATES[0];
    let mut best_score = best.score(profile);

    for template in CHORD_TEMPLATES.iter().skip(1) {
        let score = template.score(profile);
        if score > best_score {
            best = template;
            best_score = score;
        }
    }

    (best, best_score)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile_of(pitch_classes: &[usize]) -> PitchClassProfile {
        let mut energies = [0.0f32; 12];
        for &pc in pitch_classes {
            energies[pc] = 1.0;
        }
        PitchClassProfile::from_energies(energies)
    }

    #[test]
    fn test_dictionary_labels_unique() {
        for (i, a) in CHORD_TEMPLATES.iter().enumerate() {
            for b in CHORD_TEMPLATES.iter().skip(i + 1) {
                assert_ne!(a.label, b.label);
            }
        }
    }

    #[test]
    fn test_template_membership() {
        let c = find_template("C").unwrap();
        assert_eq!(c.membership, [1, 0, 0, 0, 1, 0, 0, 1, 0, 0, 0, 0]);
        let bm = find_template("Bm").unwrap();
        assert_eq!(bm.membership.iter().filter(|&&m| m == 1).count(), 3);
        assert_eq!(bm.membership[6], 1);
        assert!(find_template("Xmaj13").is_none());
    }

    #[test]
    fn test_normalized_sums_to_one() {
        for t in CHORD_TEMPLATES.iter() {
            let sum: f32 = t.normalized().iter().sum();
            assert!((sum - 1.0).abs() < 1e-5, "{} sums to {}", t.label, sum);
        }
    }

    #[test]
    fn test_exact_template_scores_one() {
        let profile = PitchClassProfile::from_energies(find_template("C").unwrap().normalized());
        let (best, score) = classify_profile(&profile);
        assert_eq!(best.label, "C");
        assert!((score - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_each_triad_recognized() {
        for t in CHORD_TEMPLATES.iter() {
            let pcs: Vec<usize> = (0..12).filter(|&i| t.membership[i] == 1).collect();
            let (best, _) = classify_profile(&profile_of(&pcs));
            assert_eq!(best.label, t.label);
        }
    }

    #[test]
    fn test_exact_tie_keeps_first_template() {
        // C-D-E-G matches C (C-E-G) and Csus2 (C-D-G) equally
        let profile = profile_of(&[0, 2, 4, 7]);
        let c = find_template("C").unwrap().score(&profile);
        let sus2 = find_template("Csus2").unwrap().score(&profile);
        assert_eq!(c, sus2);
        let (best, _) = classify_profile(&profile);
        assert_eq!(best.label, "C");
    }

    #[test]
    fn test_silent_profile_scores_zero() {
        let (best, score) = classify_profile(&PitchClassProfile::default());
        assert_eq!(best.label, "C");
        assert_eq!(score, 0.0);
    }
}
