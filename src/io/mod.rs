//! Audio I/O modules
//!
//! The waveform record shared by every stage, and local file decoding
//! using Symphonia.

pub mod decoder;
pub mod waveform;

pub use decoder::decode_audio;
pub use waveform::Waveform;
