//! Audio preprocessing modules
//!
//! Utilities for preparing audio for analysis:
//! - Channel mixing (interleaved multichannel to mono)
//! - Peak normalization of the onset-detection signal

pub mod channel_mixer;
pub mod normalization;
