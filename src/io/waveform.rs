//! Decoded mono waveform and window slicing

use crate::error::AnalysisError;

/// Immutable mono sample sequence with its sample rate
///
/// Created once by the loader and read by every stage; all times reported
/// by the pipeline are seconds from the first sample.
#[derive(Debug, Clone)]
pub struct Waveform {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl Waveform {
    /// Wrap decoded samples
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` if `sample_rate` is zero
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Result<Self, AnalysisError> {
        if sample_rate == 0 {
            return Err(AnalysisError::InvalidInput(
                "Invalid sample rate: 0".to_string(),
            ));
        }
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    /// Samples, normalized to [-1.0, 1.0] by the loader
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True if the waveform holds no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds
    pub fn duration_seconds(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }

    /// Convert a time in seconds to a sample index (floored)
    pub fn seconds_to_samples(&self, seconds: f32) -> usize {
        (seconds.max(0.0) * self.sample_rate as f32) as usize
    }

    /// Split into consecutive fixed-length windows
    ///
    /// Windows advance by `window_seconds`; the trailing remainder is kept
    /// only if it lasts at least `min_seconds`.
    pub fn windows(&self, window_seconds: f32, min_seconds: f32) -> Windows<'_> {
        let window_len = self.seconds_to_samples(window_seconds).max(1);
        let min_len = (min_seconds.max(0.0) * self.sample_rate as f32).ceil() as usize;
        Windows {
            waveform: self,
            position: 0,
            window_len,
            min_len: min_len.max(1),
        }
    }
}

/// A window of samples with its onset
#[derive(Debug, Clone, Copy)]
pub struct SampleWindow<'a> {
    /// Window onset in seconds
    pub onset_seconds: f32,
    /// Window samples
    pub samples: &'a [f32],
}

/// Iterator over fixed-length windows of a waveform
#[derive(Debug)]
pub struct Windows<'a> {
    waveform: &'a Waveform,
    position: usize,
    window_len: usize,
    min_len: usize,
}

impl<'a> Iterator for Windows<'a> {
    type Item = SampleWindow<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let data = &self.waveform.samples;
        while self.position < data.len() {
            let start = self.position;
            let end = (start + self.window_len).min(data.len());
            self.position += self.window_len;

            if end - start < self.min_len {
                continue;
            }

            return Some(SampleWindow {
                onset_seconds: start as f32 / self.waveform.sample_rate as f32,
                samples: &data[start..end],
            });
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_sample_rate_rejected() {
        assert!(Waveform::new(vec![0.0; 10], 0).is_err());
    }

    #[test]
    fn test_duration() {
        let wf = Waveform::new(vec![0.0; 22050], 44100).unwrap();
        assert!((wf.duration_seconds() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_windows_drop_short_remainder() {
        // 1.2 s at 100 Hz: windows at 0.0, 0.5 (full), 1.0 (0.2 s < 0.25 s, dropped)
        let wf = Waveform::new(vec![0.0; 120], 100).unwrap();
        let onsets: Vec<f32> = wf.windows(0.5, 0.25).map(|w| w.onset_seconds).collect();
        assert_eq!(onsets, vec![0.0, 0.5]);
    }

    #[test]
    fn test_windows_keep_long_remainder() {
        // 1.3 s at 100 Hz: remainder 0.3 s is kept
        let wf = Waveform::new(vec![0.0; 130], 100).unwrap();
        let windows: Vec<SampleWindow> = wf.windows(0.5, 0.25).collect();
        assert_eq!(windows.len(), 3);
        assert_eq!(windows[2].samples.len(), 30);
        assert!((windows[2].onset_seconds - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_windows_empty() {
        let wf = Waveform::new(vec![], 44100).unwrap();
        assert_eq!(wf.windows(0.5, 0.25).count(), 0);
    }
}
