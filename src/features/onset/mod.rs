//! Onset detection modules
//!
//! - Energy flux (frame RMS derivative with peak picking)

pub mod energy_flux;

pub use energy_flux::detect_energy_flux_onsets;
