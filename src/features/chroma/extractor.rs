//! Pitch-class profile extraction
//!
//! Folds the magnitude spectrum of a sample window into 12 pitch classes.
//!
//! # Algorithm
//!
//! 1. Split the window into Hann-windowed frames (`chroma_frame_size`,
//!    `chroma_hop_size`); a window shorter than one frame is zero-padded
//! 2. FFT each frame and take bin magnitudes
//! 3. Map each bin inside `[min_frequency, min(max_frequency, nyquist)]` to a
//!    fine pitch index `round(bins_per_octave * log2(f / f_C0))`, where `f_C0`
//!    is derived from the A4 tuning reference
//! 4. Round the fine index to the nearest semitone and fold modulo 12
//! 5. Accumulate magnitudes per class over all frames and normalize to unit sum

use super::PitchClassProfile;
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::preprocessing::normalization::ensure_finite;
use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::f32::consts::PI;
use std::sync::Arc;

/// Semitones from C0 up to A4
const SEMITONES_C0_TO_A4: f32 = 57.0;

/// Reusable profiler for one sample rate and configuration
///
/// Holds the FFT plan, the analysis window and the bin-to-class table so
/// that many windows of the same waveform can be profiled cheaply.
pub struct PitchClassProfiler {
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    bin_classes: Vec<Option<usize>>,
    hop_size: usize,
}

impl PitchClassProfiler {
    /// Plan the FFT and the bin mapping for `sample_rate`
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` for a zero sample rate or unusable
    /// frame parameters, and `AnalysisError::ProcessingError` if no FFT bin
    /// falls inside the configured frequency range
    pub fn new(sample_rate: u32, config: &AnalysisConfig) -> Result<Self, AnalysisError> {
        if sample_rate == 0 {
            return Err(AnalysisError::InvalidInput(
                "Invalid sample rate: 0".to_string(),
            ));
        }
        let frame_size = config.chroma_frame_size;
        if frame_size == 0 || config.chroma_hop_size == 0 {
            return Err(AnalysisError::InvalidInput(
                "chroma_frame_size and chroma_hop_size must be > 0".to_string(),
            ));
        }
        if config.bins_per_octave < 12 {
            return Err(AnalysisError::InvalidInput(format!(
                "bins_per_octave must be at least 12, got {}",
                config.bins_per_octave
            )));
        }

        let bin_classes = map_bins_to_pitch_classes(sample_rate, frame_size, config);
        if bin_classes.iter().all(Option::is_none) {
            return Err(AnalysisError::ProcessingError(format!(
                "No FFT bins within [{:.1}, {:.1}] Hz at {} Hz / {} samples",
                config.min_frequency, config.max_frequency, sample_rate, frame_size
            )));
        }

        // Periodic Hann window
        let window = (0..frame_size)
            .map(|i| 0.5 - 0.5 * (2.0 * PI * i as f32 / frame_size as f32).cos())
            .collect();

        let fft = FftPlanner::new().plan_fft_forward(frame_size);

        Ok(Self {
            fft,
            window,
            bin_classes,
            hop_size: config.chroma_hop_size,
        })
    }

    /// Profile a window of samples
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` for an empty window and
    /// `AnalysisError::NumericalError` if it contains NaN or infinite samples
    pub fn profile(&self, samples: &[f32]) -> Result<PitchClassProfile, AnalysisError> {
        if samples.is_empty() {
            return Err(AnalysisError::InvalidInput(
                "Cannot profile an empty window".to_string(),
            ));
        }
        ensure_finite(samples)?;

        let frame_size = self.window.len();
        let num_frames = if samples.len() <= frame_size {
            1
        } else {
            (samples.len() - frame_size) / self.hop_size + 1
        };

        let mut energies = [0.0f32; 12];
        let mut buffer = vec![Complex::new(0.0f32, 0.0); frame_size];

        for frame in 0..num_frames {
            let start = frame * self.hop_size;
            let end = (start + frame_size).min(samples.len());
            let chunk = &samples[start..end];

            for (i, slot) in buffer.iter_mut().enumerate() {
                let x = chunk.get(i).copied().unwrap_or(0.0);
                *slot = Complex::new(x * self.window[i], 0.0);
            }
            self.fft.process(&mut buffer);

            for (bin, class) in self.bin_classes.iter().enumerate() {
                if let Some(pc) = *class {
                    energies[pc] += buffer[bin].norm();
                }
            }
        }

        Ok(PitchClassProfile::from_energies(energies))
    }
}

/// Pitch class for every non-negative-frequency bin, `None` outside the range
fn map_bins_to_pitch_classes(
    sample_rate: u32,
    frame_size: usize,
    config: &AnalysisConfig,
) -> Vec<Option<usize>> {
    let nyquist = sample_rate as f32 / 2.0;
    let upper = config.max_frequency.min(nyquist);
    let bin_hz = sample_rate as f32 / frame_size as f32;
    let reference_c0 = config.center_frequency * 2.0_f32.powf(-SEMITONES_C0_TO_A4 / 12.0);
    let bins_per_semitone = config.bins_per_octave as f32 / 12.0;

    (0..=frame_size / 2)
        .map(|bin| {
            let freq = bin as f32 * bin_hz;
            if freq < config.min_frequency || freq > upper || freq <= 0.0 {
                return None;
            }
            let fine = (config.bins_per_octave as f32 * (freq / reference_c0).log2()).round();
            let semitone = (fine / bins_per_semitone).round() as i64;
            Some(semitone.rem_euclid(12) as usize)
        })
        .collect()
}

/// Profile a sample window in one call
///
/// # Arguments
///
/// * `samples` - Mono samples
/// * `sample_rate` - Sample rate in Hz
/// * `config` - Frame, frequency range and tuning parameters
///
/// # Returns
///
/// Unit-sum pitch-class profile (all zeros for silence)
///
/// # Errors
///
/// Returns `AnalysisError` for empty input, a zero sample rate or non-finite
/// samples
///
/// # Example
///
/// ```
/// use karaoke_dsp::features::chroma::compute_pitch_class_profile;
/// use karaoke_dsp::AnalysisConfig;
///
/// let sr = 22050;
/// let samples: Vec<f32> = (0..sr)
///     .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / sr as f32).sin())
///     .collect();
/// let profile = compute_pitch_class_profile(&samples, sr, &AnalysisConfig::default())?;
/// assert_eq!(profile.dominant(), Some(9)); // A
/// # Ok::<(), karaoke_dsp::AnalysisError>(())
/// ```
pub fn compute_pitch_class_profile(
    samples: &[f32],
    sample_rate: u32,
    config: &AnalysisConfig,
) -> Result<PitchClassProfile, AnalysisError> {
    log::debug!(
        "Profiling {} samples at {} Hz ({} bins/octave)",
        samples.len(),
        sample_rate,
        config.bins_per_octave
    );
    if samples.is_empty() {
        return Err(AnalysisError::InvalidInput(
            "Cannot profile empty audio".to_string(),
        ));
    }
    PitchClassProfiler::new(sample_rate, config)?.profile(samples)
}
