//! Krumhansl-Kessler key templates
//!
//! Defines tonal profiles for 24 keys (12 major + 12 minor), each a rotation
//! of the C major or C minor probe-tone profile.

/// C major probe-tone ratings (index 0 = C)
pub const MAJOR_PROFILE: [f32; 12] = [
    6.35, 2.23, 3.48, 2.33, 4.38, 4.09, 2.52, 5.19, 2.39, 3.66, 2.29, 2.88,
];

/// C minor probe-tone ratings (index 0 = C)
pub const MINOR_PROFILE: [f32; 12] = [
    6.33, 2.68, 3.52, 5.38, 2.60, 3.53, 2.54, 4.75, 3.98, 2.69, 3.34, 3.17,
];

/// Key templates for all 24 keys
#[derive(Debug, Clone)]
pub struct KeyTemplates {
    /// Major key templates (12 keys: C, C#, D, ..., B)
    pub major: [[f32; 12]; 12],

    /// Minor key templates (12 keys: C, C#, D, ..., B)
    pub minor: [[f32; 12]; 12],
}

impl KeyTemplates {
    /// Create templates by rotating the C profiles to every tonic
    pub fn new() -> Self {
        let mut major = [[0.0f32; 12]; 12];
        let mut minor = [[0.0f32; 12]; 12];
        for tonic in 0..12 {
            major[tonic] = rotate(&MAJOR_PROFILE, tonic);
            minor[tonic] = rotate(&MINOR_PROFILE, tonic);
        }
        Self { major, minor }
    }

    /// Template for the major key on `tonic` (0 = C)
    pub fn get_major_template(&self, tonic: usize) -> &[f32; 12] {
        &self.major[tonic % 12]
    }

    /// Template for the minor key on `tonic` (0 = C)
    pub fn get_minor_template(&self, tonic: usize) -> &[f32; 12] {
        &self.minor[tonic % 12]
    }
}

impl Default for KeyTemplates {
    fn default() -> Self {
        Self::new()
    }
}

/// Shift a C-based profile so that index `tonic` holds the tonic rating
fn rotate(profile: &[f32; 12], tonic: usize) -> [f32; 12] {
    let mut out = [0.0f32; 12];
    for (pc, value) in out.iter_mut().enumerate() {
        *value = profile[(pc + 12 - tonic) % 12];
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation() {
        let templates = KeyTemplates::new();
        // G major: tonic rating at G, dominant rating at D
        let g = templates.get_major_template(7);
        assert_eq!(g[7], 6.35);
        assert_eq!(g[2], 5.19);
        // A minor: minor-third rating at C
        let am = templates.get_minor_template(9);
        assert_eq!(am[9], 6.33);
        assert_eq!(am[0], 5.38);
    }

    #[test]
    fn test_c_templates_unrotated() {
        let templates = KeyTemplates::default();
        assert_eq!(*templates.get_major_template(0), MAJOR_PROFILE);
        assert_eq!(*templates.get_minor_template(12), MINOR_PROFILE);
    }
}
