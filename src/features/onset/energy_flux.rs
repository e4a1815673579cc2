//! Energy flux onset detection
//!
//! Detects onsets by finding peaks in the frame-by-frame energy derivative.
//!
//! Algorithm:
//! 1. Divide audio into overlapping frames (frame_size, hop_size)
//! 2. Compute RMS energy per frame
//! 3. Compute energy derivative (flux): E_flux[n] = max(0, E[n] - E[n-1])
//! 4. Threshold relative to the maximum flux and peak-pick
//!
//! # Reference
//!
//! Bello, J. P., Daudet, L., Abdallah, S., Duxbury, C., Davies, M., & Sandler, M. B. (2005).
//! A Tutorial on Onset Detection in Music Signals.
//! *IEEE Transactions on Speech and Audio Processing*, 13(5), 1035-1047.

use crate::error::AnalysisError;

/// Numerical stability epsilon
const EPSILON: f32 = 1e-10;

/// Detect onsets using the energy flux method
///
/// # Arguments
///
/// * `samples` - Audio samples (mono, normalized to [-1.0, 1.0])
/// * `frame_size` - Frame size for analysis (typically 2048)
/// * `hop_size` - Hop size between frames (typically 512)
/// * `threshold_db` - Threshold in dB relative to maximum flux (typically -20 to -30 dB)
///
/// # Returns
///
/// Onset positions in samples, sorted and at least half a hop apart
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if `frame_size` or `hop_size` is zero
///
/// # Example
///
/// ```
/// use karaoke_dsp::features::onset::energy_flux::detect_energy_flux_onsets;
///
/// let samples = vec![0.0f32; 44100];
/// let onsets = detect_energy_flux_onsets(&samples, 2048, 512, -20.0)?;
/// assert!(onsets.is_empty());
/// # Ok::<(), karaoke_dsp::AnalysisError>(())
/// ```
pub fn detect_energy_flux_onsets(
    samples: &[f32],
    frame_size: usize,
    hop_size: usize,
    threshold_db: f32,
) -> Result<Vec<usize>, AnalysisError> {
    if frame_size == 0 {
        return Err(AnalysisError::InvalidInput(
            "Frame size must be > 0".to_string(),
        ));
    }
    if hop_size == 0 {
        return Err(AnalysisError::InvalidInput(
            "Hop size must be > 0".to_string(),
        ));
    }
    if samples.len() < frame_size {
        log::debug!(
            "Audio shorter than one frame ({} < {}), no onsets",
            samples.len(),
            frame_size
        );
        return Ok(Vec::new());
    }

    let num_frames = (samples.len() - frame_size) / hop_size + 1;
    if num_frames < 3 {
        return Ok(Vec::new());
    }

    let energies: Vec<f32> = (0..num_frames)
        .map(|i| {
            let frame = &samples[i * hop_size..i * hop_size + frame_size];
            (frame.iter().map(|&x| x * x).sum::<f32>() / frame_size as f32).sqrt()
        })
        .collect();

    let flux: Vec<f32> = energies
        .windows(2)
        .map(|w| (w[1] - w[0]).max(0.0))
        .collect();

    let max_flux = flux.iter().copied().fold(0.0f32, f32::max);
    if max_flux <= EPSILON {
        log::debug!("Energy flux is flat, no onsets detected");
        return Ok(Vec::new());
    }

    let threshold = max_flux * 10.0_f32.powf(threshold_db / 20.0);
    let last = flux.len() - 1;

    // flux[i] is the rise from frame i to frame i + 1, so the onset sits at frame i + 1
    let mut onsets: Vec<usize> = (0..flux.len())
        .filter(|&i| {
            let value = flux[i];
            if value <= threshold {
                return false;
            }
            let rises = i == 0 || value > flux[i - 1];
            let holds = if i == last {
                i > 0
            } else {
                value >= flux[i + 1]
            };
            rises && holds
        })
        .map(|i| (i + 1) * hop_size)
        .filter(|&pos| pos < samples.len())
        .collect();

    onsets.sort_unstable();
    let min_gap = (hop_size / 2).max(1);
    onsets.dedup_by(|later, earlier| *later < *earlier + min_gap);

    log::debug!(
        "Energy flux: max={:.6}, threshold={:.6} ({:.1} dB), {} onsets",
        max_flux,
        threshold,
        threshold_db,
        onsets.len()
    );

    Ok(onsets)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Four-on-the-floor clicks with an exponential decay
    fn generate_kick_pattern(duration_seconds: f32, bpm: f32, sample_rate: f32) -> Vec<f32> {
        let num_samples = (duration_seconds * sample_rate) as usize;
        let mut samples = vec![0.0f32; num_samples];
        let beat_interval = (60.0 / bpm * sample_rate) as usize;
        let kick_samples = (0.15 * sample_rate) as usize;

        let mut pos = 0;
        while pos < num_samples {
            for i in 0..kick_samples.min(num_samples - pos) {
                let t = i as f32 / kick_samples as f32;
                samples[pos + i] = (-t * 5.0).exp() * 0.8;
            }
            pos += beat_interval;
        }
        samples
    }

    #[test]
    fn test_step_function() {
        let mut samples = vec![0.0f32; 44100];
        for s in samples.iter_mut().skip(5000) {
            *s = 0.5;
        }
        let onsets = detect_energy_flux_onsets(&samples, 2048, 512, -30.0).unwrap();
        assert!(!onsets.is_empty());
        assert!(
            onsets[0] >= 3000 && onsets[0] <= 8000,
            "Onset should be near sample 5000, got {}",
            onsets[0]
        );
    }

    #[test]
    fn test_kick_pattern_spacing() {
        let samples = generate_kick_pattern(4.0, 120.0, 44100.0);
        let onsets = detect_energy_flux_onsets(&samples, 2048, 512, -30.0).unwrap();
        assert!(
            onsets.len() >= 6 && onsets.len() <= 20,
            "Expected 6-20 onsets for 120 BPM, got {}",
            onsets.len()
        );

        let intervals: Vec<usize> = onsets.windows(2).map(|w| w[1] - w[0]).collect();
        let avg = intervals.iter().sum::<usize>() / intervals.len();
        assert!(
            (avg as i64 - 22050).abs() < 11025,
            "Average onset interval should be ~22050 samples, got {}",
            avg
        );
    }

    #[test]
    fn test_silence_and_short_audio() {
        assert!(detect_energy_flux_onsets(&[], 2048, 512, -20.0).unwrap().is_empty());
        assert!(detect_energy_flux_onsets(&vec![0.0; 44100], 2048, 512, -20.0)
            .unwrap()
            .is_empty());
        assert!(detect_energy_flux_onsets(&vec![0.5; 1000], 2048, 512, -20.0)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_invalid_parameters() {
        let samples = vec![0.5f32; 44100];
        assert!(detect_energy_flux_onsets(&samples, 0, 512, -20.0).is_err());
        assert!(detect_energy_flux_onsets(&samples, 2048, 0, -20.0).is_err());
    }

    #[test]
    fn test_onsets_sorted_and_separated() {
        let samples = generate_kick_pattern(3.0, 140.0, 22050.0);
        let onsets = detect_energy_flux_onsets(&samples, 1024, 256, -30.0).unwrap();
        assert!(onsets.windows(2).all(|w| w[1] >= w[0] + 128));
    }
}
