//! Autocorrelation-based BPM estimation
//!
//! Finds periodicity in the onset signal using FFT-accelerated autocorrelation.
//!
//! # Algorithm
//!
//! 1. Convert onset list to a frame-rate impulse signal, each impulse spread
//!    over its neighbouring frames so hop-quantized intervals still line up
//! 2. Compute autocorrelation with the identity `ACF = IFFT(|FFT(signal)|²)`
//! 3. Find peaks in the ACF within the lag range implied by the BPM range
//! 4. Refine each peak lag by parabolic interpolation
//! 5. Convert lags to BPM: `BPM = (60 * sample_rate) / (lag * hop_size)`
//!
//! # Reference
//!
//! Ellis, D. P. W., & Pikrakis, A. (2006). Real-time Beat Induction.
//! *Proceedings of the International Conference on Music Information Retrieval*.

use super::BpmCandidate;
use crate::error::AnalysisError;
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

const EPSILON: f32 = 1e-10;

/// Weight given to the frames either side of an onset impulse
const SPREAD_WEIGHT: f32 = 0.5;

/// Estimate BPM candidates from onset periodicity
///
/// # Arguments
///
/// * `onsets` - Onset times in samples
/// * `sample_rate` - Sample rate in Hz
/// * `hop_size` - Hop size used for onset detection (samples per frame)
/// * `min_bpm` - Minimum BPM to consider
/// * `max_bpm` - Maximum BPM to consider
///
/// # Returns
///
/// BPM candidates ranked by confidence (highest first). Fewer than two
/// onsets, or a signal too short to hold the slowest period, yields no
/// candidates.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` for a zero sample rate or hop size,
/// or an empty/inverted BPM range
///
/// # Example
///
/// ```
/// use karaoke_dsp::features::period::autocorrelation::estimate_bpm_from_autocorrelation;
///
/// // One onset every 0.5 s at 44.1 kHz
/// let onsets: Vec<usize> = (0..16).map(|i| i * 22050).collect();
/// let candidates = estimate_bpm_from_autocorrelation(&onsets, 44100, 512, 60.0, 180.0)?;
/// assert!((candidates[0].bpm - 120.0).abs() < 3.0);
/// # Ok::<(), karaoke_dsp::AnalysisError>(())
/// ```
pub fn estimate_bpm_from_autocorrelation(
    onsets: &[usize],
    sample_rate: u32,
    hop_size: usize,
    min_bpm: f32,
    max_bpm: f32,
) -> Result<Vec<BpmCandidate>, AnalysisError> {
    log::debug!(
        "Estimating BPM from autocorrelation: {} onsets, {} Hz, hop={}, range=[{:.1}, {:.1}] BPM",
        onsets.len(),
        sample_rate,
        hop_size,
        min_bpm,
        max_bpm
    );

    if sample_rate == 0 {
        return Err(AnalysisError::InvalidInput(
            "Invalid sample rate: 0".to_string(),
        ));
    }
    if hop_size == 0 {
        return Err(AnalysisError::InvalidInput(
            "Invalid hop size: 0".to_string(),
        ));
    }
    if min_bpm <= 0.0 || max_bpm <= 0.0 || min_bpm >= max_bpm {
        return Err(AnalysisError::InvalidInput(format!(
            "Invalid BPM range: [{:.1}, {:.1}]",
            min_bpm, max_bpm
        )));
    }
    if onsets.len() < 2 {
        log::debug!("Too few onsets for autocorrelation: {}", onsets.len());
        return Ok(vec![]);
    }

    let max_frame = onsets.iter().copied().max().unwrap_or(0) / hop_size;
    let mut beat_signal = vec![0.0f32; max_frame + 2];
    for &onset in onsets {
        let frame = onset / hop_size;
        beat_signal[frame] = 1.0;
        if frame > 0 {
            beat_signal[frame - 1] = beat_signal[frame - 1].max(SPREAD_WEIGHT);
        }
        beat_signal[frame + 1] = beat_signal[frame + 1].max(SPREAD_WEIGHT);
    }

    let acf = compute_autocorrelation_fft(&beat_signal);

    let frames_per_minute = 60.0 * sample_rate as f32 / hop_size as f32;
    let lag_min = (frames_per_minute / max_bpm).ceil() as usize;
    let lag_max = (frames_per_minute / min_bpm).floor() as usize;

    // Peak picking needs one lag of context on each side
    let lag_max = lag_max.min(acf.len().saturating_sub(2));
    if lag_min == 0 || lag_min + 2 > lag_max {
        log::debug!(
            "Lag range [{}, {}] unusable for ACF length {}",
            lag_min,
            lag_max,
            acf.len()
        );
        return Ok(vec![]);
    }

    let max_acf = acf[lag_min..=lag_max].iter().copied().fold(0.0f32, f32::max);
    if max_acf < EPSILON {
        return Ok(vec![]);
    }

    let mut candidates: Vec<BpmCandidate> = find_peaks_in_acf(&acf, lag_min, lag_max)
        .into_iter()
        .map(|(lag, value)| BpmCandidate {
            bpm: frames_per_minute / refine_lag(&acf, lag),
            confidence: (value / max_acf).clamp(0.0, 1.0),
        })
        .filter(|c| c.bpm >= min_bpm && c.bpm <= max_bpm)
        .collect();

    candidates.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    log::debug!("Autocorrelation found {} BPM candidates", candidates.len());

    Ok(candidates)
}

/// Autocorrelation via `IFFT(|FFT(x)|²)`, zero-padded to avoid circular wrap
fn compute_autocorrelation_fft(signal: &[f32]) -> Vec<f32> {
    let n = signal.len();
    let fft_size = (2 * n).next_power_of_two();

    let mut buffer: Vec<Complex<f32>> = signal.iter().map(|&x| Complex::new(x, 0.0)).collect();
    buffer.resize(fft_size, Complex::new(0.0, 0.0));

    let mut planner = FftPlanner::new();
    planner.plan_fft_forward(fft_size).process(&mut buffer);

    for x in buffer.iter_mut() {
        *x = Complex::new(x.norm_sqr(), 0.0);
    }

    planner.plan_fft_inverse(fft_size).process(&mut buffer);

    let scale = 1.0 / fft_size as f32;
    buffer[..n].iter().map(|x| (x.re * scale).max(0.0)).collect()
}

/// Fractional lag of the parabola through `acf[lag - 1..=lag + 1]`
fn refine_lag(acf: &[f32], lag: usize) -> f32 {
    let (y0, y1, y2) = (acf[lag - 1], acf[lag], acf[lag + 1]);
    let denom = y0 - 2.0 * y1 + y2;
    if denom.abs() < EPSILON {
        return lag as f32;
    }
    let offset = (0.5 * (y0 - y2) / denom).clamp(-0.5, 0.5);
    lag as f32 + offset
}

/// Local maxima of the ACF in `[lag_min, lag_max]` with at least 10% prominence
///
/// A two-lag plateau counts as one peak at its right end. Peaks closer than
/// two lags are merged, keeping the higher one.
fn find_peaks_in_acf(acf: &[f32], lag_min: usize, lag_max: usize) -> Vec<(usize, f32)> {
    let max_value = acf[lag_min..=lag_max].iter().copied().fold(0.0f32, f32::max);
    let min_prominence = max_value * 0.1;
    let min_distance = 2;

    let mut peaks: Vec<(usize, f32)> = Vec::new();
    for lag in lag_min..=lag_max {
        let value = acf[lag];
        let left = acf[lag - 1];
        let right = acf[lag + 1];
        if value < left || value <= right || value - left.min(right) < min_prominence {
            continue;
        }

        match peaks.last_mut() {
            Some(last) if lag - last.0 < min_distance => {
                if value > last.1 {
                    *last = (lag, value);
                }
            }
            _ => peaks.push((lag, value)),
        }
    }
    peaks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regular_onsets_120_bpm() {
        let onsets: Vec<usize> = (0..32).map(|i| i * 22050).collect();
        let candidates = estimate_bpm_from_autocorrelation(&onsets, 44100, 512, 60.0, 180.0).unwrap();
        assert!(!candidates.is_empty());
        assert!(
            (candidates[0].bpm - 120.0).abs() < 3.0,
            "Expected ~120 BPM, got {:.2}",
            candidates[0].bpm
        );
        assert!(candidates[0].confidence > 0.0 && candidates[0].confidence <= 1.0);
    }

    #[test]
    fn test_too_few_onsets() {
        let candidates = estimate_bpm_from_autocorrelation(&[1000], 44100, 512, 60.0, 180.0).unwrap();
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_invalid_parameters() {
        let onsets = vec![0, 22050, 44100];
        assert!(estimate_bpm_from_autocorrelation(&onsets, 0, 512, 60.0, 180.0).is_err());
        assert!(estimate_bpm_from_autocorrelation(&onsets, 44100, 0, 60.0, 180.0).is_err());
        assert!(estimate_bpm_from_autocorrelation(&onsets, 44100, 512, 180.0, 60.0).is_err());
    }

    #[test]
    fn test_refine_lag_symmetric_plateau() {
        let acf = vec![0.0, 1.0, 4.0, 4.0, 1.0];
        assert!((refine_lag(&acf, 3) - 2.5).abs() < 1e-6);
        let flat = vec![1.0, 1.0, 1.0];
        assert_eq!(refine_lag(&flat, 1), 1.0);
    }

    #[test]
    fn test_acf_of_impulse_train() {
        let mut signal = vec![0.0f32; 64];
        for i in (0..64).step_by(8) {
            signal[i] = 1.0;
        }
        let acf = compute_autocorrelation_fft(&signal);
        assert!(acf[8] > acf[4]);
        assert!((acf[0] - 8.0).abs() < 1e-3);
    }
}
