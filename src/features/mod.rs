//! Feature extraction modules
//!
//! This module contains all feature extraction algorithms:
//! - Onset detection (energy flux)
//! - Period estimation (autocorrelation tempo candidates)
//! - Beat tracking (tempo + beat grid)
//! - Pitch-class profiling
//! - Chord segmentation
//! - Key detection

pub mod beat_tracking;
pub mod chord;
pub mod chroma;
pub mod key;
pub mod onset;
pub mod period;
