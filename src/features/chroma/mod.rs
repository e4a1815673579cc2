//! Pitch-class profiling
//!
//! Fold spectral energy into 12 octave-independent semitone classes:
//! - Profile extraction (STFT mapped onto a fine log-frequency pitch grid)
//! - Profile arithmetic (unit-sum normalization, cosine similarity)

pub mod extractor;
pub mod normalization;

pub use extractor::{compute_pitch_class_profile, PitchClassProfiler};
pub use normalization::{cosine_similarity, normalize_unit_sum};

/// Pitch-class names, C through B, using sharps
pub const PITCH_CLASS_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Name of a pitch class (index taken modulo 12)
pub fn pitch_class_name(index: usize) -> &'static str {
    PITCH_CLASS_NAMES[index % 12]
}

/// Relative energy per pitch class, normalized to unit sum
///
/// A silent input produces the all-zero profile.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PitchClassProfile([f32; 12]);

impl PitchClassProfile {
    /// Build a profile from raw non-negative energies, normalizing to unit sum
    pub fn from_energies(energies: [f32; 12]) -> Self {
        Self(normalize_unit_sum(&energies))
    }

    /// Normalized values, index 0 = C
    pub fn values(&self) -> &[f32; 12] {
        &self.0
    }

    /// Sum of all components (≈1.0, or 0.0 for silence)
    pub fn total(&self) -> f32 {
        self.0.iter().sum()
    }

    /// True if the profile carries no energy
    pub fn is_silent(&self) -> bool {
        self.total() <= f32::EPSILON
    }

    /// Index of the strongest pitch class (first on ties)
    pub fn dominant(&self) -> Option<usize> {
        if self.is_silent() {
            return None;
        }
        let mut best = 0;
        for (i, &v) in self.0.iter().enumerate() {
            if v > self.0[best] {
                best = i;
            }
        }
        Some(best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_normalized() {
        let mut energies = [0.0f32; 12];
        energies[0] = 2.0;
        energies[7] = 2.0;
        let profile = PitchClassProfile::from_energies(energies);
        assert!((profile.total() - 1.0).abs() < 1e-5);
        assert!((profile.values()[0] - 0.5).abs() < 1e-5);
        assert_eq!(profile.dominant(), Some(0));
    }

    #[test]
    fn test_silent_profile() {
        let profile = PitchClassProfile::from_energies([0.0; 12]);
        assert!(profile.is_silent());
        assert_eq!(profile.dominant(), None);
    }

    #[test]
    fn test_names() {
        assert_eq!(pitch_class_name(0), "C");
        assert_eq!(pitch_class_name(9), "A");
        assert_eq!(pitch_class_name(13), "C#");
    }
}
