//! Key detection algorithm
//!
//! Correlates a whole-waveform pitch-class profile with the 24
//! Krumhansl-Kessler key templates, then checks the mode against the
//! scale degrees that separate major from minor.
//!
//! # Reference
//!
//! Krumhansl, C. L., & Kessler, E. J. (1982). Tracing the Dynamic Changes in Perceived
//! Tonal Organization in a Spatial Representation of Musical Keys. *Psychological Review*,
//! 89(4), 334-368.

use super::templates::KeyTemplates;
use crate::analysis::estimate::Estimate;
use crate::analysis::result::{KeyEstimate, KeyMode};
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::features::chroma::{compute_pitch_class_profile, PitchClassProfile};
use crate::io::Waveform;

const EPSILON: f32 = 1e-10;

/// The "C" key reported when estimation cannot run
pub fn fallback_key() -> KeyEstimate {
    KeyEstimate {
        tonic: 0,
        mode: None,
        correlation: 0.0,
    }
}

/// Estimate the key of a waveform
///
/// Never fails: an empty or silent waveform, or any profiling error, yields
/// [`Estimate::Fallback`] with tonic C and no mode.
///
/// # Example
///
/// ```
/// use karaoke_dsp::features::key::estimate_key;
/// use karaoke_dsp::{AnalysisConfig, Waveform};
///
/// let silence = Waveform::new(vec![0.0; 22050], 22050)?;
/// let key = estimate_key(&silence, &AnalysisConfig::default());
/// assert!(key.is_fallback());
/// assert_eq!(key.value().label(), "C");
/// # Ok::<(), karaoke_dsp::AnalysisError>(())
/// ```
pub fn estimate_key(waveform: &Waveform, config: &AnalysisConfig) -> Estimate<KeyEstimate> {
    let templates = KeyTemplates::new();
    let detected = compute_pitch_class_profile(waveform.samples(), waveform.sample_rate(), config)
        .and_then(|profile| detect_key(&profile, &templates, config.mode_third_margin));

    match detected {
        Ok(key) => Estimate::Success(key),
        Err(e) => Estimate::fallback(fallback_key(), format!("key estimation failed: {}", e)),
    }
}

/// Detect the key of a pitch-class profile
///
/// Scores all 24 keys by Pearson correlation (majors C..B, then minors C..B;
/// the first key wins exact ties), then applies the mode heuristic to the
/// winning tonic.
///
/// # Arguments
///
/// * `profile` - Pitch-class profile of the whole passage
/// * `templates` - Key templates (Krumhansl-Kessler profiles)
/// * `mode_margin` - Relative margin the scale-degree evidence must exceed
///   before the mode is flipped
///
/// # Errors
///
/// Returns `AnalysisError::ProcessingError` for a silent or flat profile,
/// which carries no tonal information
pub fn detect_key(
    profile: &PitchClassProfile,
    templates: &KeyTemplates,
    mode_margin: f32,
) -> Result<KeyEstimate, AnalysisError> {
    if profile.is_silent() {
        return Err(AnalysisError::ProcessingError(
            "Pitch-class profile is silent".to_string(),
        ));
    }
    let values = profile.values();
    let spread = values.iter().copied().fold(f32::MIN, f32::max)
        - values.iter().copied().fold(f32::MAX, f32::min);
    if spread < EPSILON {
        return Err(AnalysisError::ProcessingError(
            "Pitch-class profile is flat".to_string(),
        ));
    }

    let mut scores = Vec::with_capacity(24);
    for tonic in 0..12 {
        let r = pearson_correlation(values, templates.get_major_template(tonic));
        scores.push((tonic, KeyMode::Major, r));
    }
    for tonic in 0..12 {
        let r = pearson_correlation(values, templates.get_minor_template(tonic));
        scores.push((tonic, KeyMode::Minor, r));
    }

    let mut best = scores[0];
    for &candidate in scores.iter().skip(1) {
        if candidate.2 > best.2 {
            best = candidate;
        }
    }
    let (tonic, base_mode, base_r) = best;

    let mode = infer_mode(values, tonic, base_mode, mode_margin);
    let correlation = if mode == base_mode {
        base_r
    } else {
        let template = match mode {
            KeyMode::Major => templates.get_major_template(tonic),
            KeyMode::Minor => templates.get_minor_template(tonic),
        };
        pearson_correlation(values, template)
    };

    log::debug!(
        "Key: tonic={} mode={:?} r={:.3} (template best {:?}, r={:.3})",
        tonic,
        mode,
        correlation,
        base_mode,
        base_r
    );

    Ok(KeyEstimate {
        tonic,
        mode: Some(mode),
        correlation,
    })
}

/// Weigh the minor against the major 3rd, 6th and 7th above the tonic
///
/// Each degree pair votes for the side that exceeds the other by more than
/// `margin` (relative), weighted by the difference; the 3rd counts double.
/// The mode is flipped only when the weighted vote clearly disagrees with
/// the template choice.
fn infer_mode(values: &[f32; 12], tonic: usize, base_mode: KeyMode, margin: f32) -> KeyMode {
    let margin = margin.max(0.0);
    let degree = |semitones: usize| values[(tonic + semitones) % 12];

    // (minor degree, major degree, weight)
    let pairs = [(3, 4, 2.0f32), (8, 9, 1.0), (10, 11, 1.0)];

    let mut minor_score = 0.0f32;
    let mut major_score = 0.0f32;
    for &(minor_deg, major_deg, weight) in pairs.iter() {
        let p_min = degree(minor_deg);
        let p_maj = degree(major_deg);
        let diff = (p_min - p_maj).abs();
        if p_min > p_maj * (1.0 + margin) {
            minor_score += diff * weight;
        } else if p_maj > p_min * (1.0 + margin) {
            major_score += diff * weight;
        }
    }

    if minor_score + major_score <= EPSILON {
        return base_mode;
    }

    match base_mode {
        KeyMode::Major if minor_score > major_score * (1.0 + margin * 0.5) => KeyMode::Minor,
        KeyMode::Minor if major_score > minor_score * (1.0 + margin * 0.5) => KeyMode::Major,
        other => other,
    }
}

/// Pearson correlation coefficient of two equal-length vectors
fn pearson_correlation(a: &[f32], b: &[f32]) -> f32 {
    let n = a.len().min(b.len());
    if n == 0 {
        return 0.0;
    }
    let mean_a = a[..n].iter().sum::<f32>() / n as f32;
    let mean_b = b[..n].iter().sum::<f32>() / n as f32;

    let mut cov = 0.0f32;
    let mut var_a = 0.0f32;
    let mut var_b = 0.0f32;
    for (&x, &y) in a[..n].iter().zip(b[..n].iter()) {
        let dx = x - mean_a;
        let dy = y - mean_b;
        cov += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }

    let denom = (var_a * var_b).sqrt();
    if denom < EPSILON {
        0.0
    } else {
        cov / denom
    }
}
