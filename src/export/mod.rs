//! Multi-track MIDI export
//!
//! Chords, a root-note bass line and a percussion measure written as a
//! Standard MIDI File with fixed lanes:
//! - track/channel 0: chords
//! - track/channel 1: bass
//! - track/channel 9: drums (General MIDI percussion)

pub mod midi;
pub mod voicing;

pub use midi::{export_karaoke_midi, MidiExporter, NoteEvent};
pub use voicing::{bass_note, chord_voicing};
