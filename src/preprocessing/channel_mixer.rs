//! Channel mixing utilities (multichannel to mono conversion)

use crate::error::AnalysisError;

/// Average interleaved multichannel samples down to mono
///
/// # Arguments
///
/// * `interleaved` - Samples ordered frame by frame (`L R L R ...` for stereo)
/// * `channels` - Number of interleaved channels
///
/// # Returns
///
/// Mono samples, one per frame. A trailing partial frame is ignored.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if `channels` is zero
pub fn downmix_interleaved(interleaved: &[f32], channels: usize) -> Result<Vec<f32>, AnalysisError> {
    if channels == 0 {
        return Err(AnalysisError::InvalidInput(
            "Channel count must be > 0".to_string(),
        ));
    }

    if channels == 1 {
        return Ok(interleaved.to_vec());
    }

    let scale = 1.0 / channels as f32;
    Ok(interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() * scale)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mono_passthrough() {
        let mono = downmix_interleaved(&[0.1, 0.2, 0.3], 1).unwrap();
        assert_eq!(mono, vec![0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_stereo_average() {
        let mono = downmix_interleaved(&[1.0, 0.0, 0.5, 0.5, -1.0, 1.0], 2).unwrap();
        assert_eq!(mono, vec![0.5, 0.5, 0.0]);
    }

    #[test]
    fn test_partial_frame_ignored() {
        let mono = downmix_interleaved(&[1.0, 1.0, 1.0], 2).unwrap();
        assert_eq!(mono.len(), 1);
    }

    #[test]
    fn test_zero_channels() {
        assert!(downmix_interleaved(&[1.0], 0).is_err());
    }
}
