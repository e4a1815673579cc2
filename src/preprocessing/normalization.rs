//! Peak normalization
//!
//! Onset thresholds are relative to the loudest flux frame, but the frame
//! energies themselves are absolute; scaling quiet recordings up to a fixed
//! peak keeps the energy-flux threshold meaningful across sources.
//!
//! # Example
//!
//! ```
//! use karaoke_dsp::preprocessing::normalization::normalize_peak;
//!
//! let mut samples = vec![0.25f32, -0.5, 0.1];
//! let meta = normalize_peak(&mut samples, 1.0)?;
//! assert!(meta.gain_db > 0.0);
//! # Ok::<(), karaoke_dsp::AnalysisError>(())
//! ```

use crate::error::AnalysisError;

/// Numerical stability epsilon for divisions
const EPSILON: f32 = 1e-10;

/// Level information returned from normalization
#[derive(Debug, Clone)]
pub struct LoudnessMetadata {
    /// Peak level in dB (before normalization)
    pub peak_db: f32,
    /// RMS level in dB (after normalization)
    pub rms_db: f32,
    /// Gain applied in dB
    pub gain_db: f32,
}

impl Default for LoudnessMetadata {
    fn default() -> Self {
        Self {
            peak_db: f32::NEG_INFINITY,
            rms_db: f32::NEG_INFINITY,
            gain_db: 0.0,
        }
    }
}

/// Reject samples containing NaN or infinity
///
/// # Errors
///
/// Returns `AnalysisError::NumericalError` with the index of the first bad sample
pub fn ensure_finite(samples: &[f32]) -> Result<(), AnalysisError> {
    match samples.iter().position(|x| !x.is_finite()) {
        Some(idx) => Err(AnalysisError::NumericalError(format!(
            "Non-finite sample at index {}",
            idx
        ))),
        None => Ok(()),
    }
}

/// Scale samples so the absolute peak sits `max_headroom_db` below full scale
///
/// Silent input is left untouched and reported with zero gain.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` for empty input and
/// `AnalysisError::NumericalError` for non-finite samples
pub fn normalize_peak(
    samples: &mut [f32],
    max_headroom_db: f32,
) -> Result<LoudnessMetadata, AnalysisError> {
    if samples.is_empty() {
        return Err(AnalysisError::InvalidInput(
            "Empty audio samples".to_string(),
        ));
    }
    ensure_finite(samples)?;

    let peak = samples.iter().map(|&x| x.abs()).fold(0.0f32, f32::max);

    if peak <= EPSILON {
        log::warn!("Audio is silent or extremely quiet, cannot normalize");
        return Ok(LoudnessMetadata::default());
    }

    let peak_db = 20.0 * peak.log10();

    let target_peak_linear = 10.0_f32.powf(-max_headroom_db.max(0.0) / 20.0);
    let gain_linear = target_peak_linear / peak;
    let gain_db = 20.0 * gain_linear.log10();

    for sample in samples.iter_mut() {
        *sample *= gain_linear;
    }

    let rms = (samples.iter().map(|&x| x * x).sum::<f32>() / samples.len() as f32).sqrt();
    let rms_db = if rms > EPSILON {
        20.0 * rms.log10()
    } else {
        f32::NEG_INFINITY
    };

    log::debug!(
        "Peak normalization: peak={:.2} dB, gain={:.2} dB",
        peak_db,
        gain_db
    );

    Ok(LoudnessMetadata {
        peak_db,
        rms_db,
        gain_db,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peak_normalization_reaches_target() {
        let mut samples = vec![0.1f32, -0.2, 0.05];
        normalize_peak(&mut samples, 0.0).unwrap();
        let peak = samples.iter().map(|x| x.abs()).fold(0.0f32, f32::max);
        assert!((peak - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_headroom() {
        let mut samples = vec![0.5f32; 100];
        let meta = normalize_peak(&mut samples, 6.0).unwrap();
        assert!((samples[0] - 0.501).abs() < 0.01);
        assert!(meta.gain_db.abs() < 0.1);
    }

    #[test]
    fn test_silence_untouched() {
        let mut samples = vec![0.0f32; 100];
        let meta = normalize_peak(&mut samples, 1.0).unwrap();
        assert_eq!(meta.gain_db, 0.0);
        assert!(samples.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_empty_and_non_finite() {
        let mut empty: Vec<f32> = vec![];
        assert!(normalize_peak(&mut empty, 1.0).is_err());

        let mut bad = vec![0.1, f32::NAN, 0.2];
        assert!(matches!(
            normalize_peak(&mut bad, 1.0),
            Err(AnalysisError::NumericalError(_))
        ));
    }
}
