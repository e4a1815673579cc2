//! Key detection modules
//!
//! Estimate the tonal center using:
//! - Krumhansl-Kessler templates (24 keys)
//! - Pearson correlation against a whole-waveform pitch-class profile
//! - A scale-degree mode heuristic

pub mod detector;
pub mod templates;

pub use detector::{detect_key, estimate_key, fallback_key};
pub use templates::KeyTemplates;
