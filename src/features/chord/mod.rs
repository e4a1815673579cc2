//! Chord recognition
//!
//! Template-based chord labelling of fixed-length windows:
//! - Static chord dictionary (major, minor, power and suspended chords)
//! - Nearest-template classification by cosine similarity
//! - Window segmentation with confidence gating and a fixed fallback sequence

pub mod segmenter;
pub mod templates;

pub use segmenter::{fallback_chord_events, segment_chords};
pub use templates::{classify_profile, find_template, ChordTemplate, CHORD_TEMPLATES};
