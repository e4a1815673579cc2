//! Percussion pattern generation
//!
//! One 4/4 measure of kick, snare and hi-hat hits for a tempo and a style.
//! Each style is a static table of beat-fraction offsets; offsets are scaled
//! by the beat duration and merged in time order.

pub mod generator;
pub mod styles;

pub use generator::{generate_drum_hits, generate_drum_pattern, measure_duration};
pub use styles::{DrumStyle, StylePattern};

use serde::{Deserialize, Serialize};

/// Beats per generated measure
pub const BEATS_PER_MEASURE: f32 = 4.0;

/// Slowest supported tempo: a quarter note must fit the 24-bit
/// microsecond field of a MIDI tempo meta-event (0xFF_FFFF)
pub const MIN_TEMPO_BPM: f32 = 60_000_000.0 / 16_777_215.0;

/// Percussion instrument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrumInstrument {
    /// Bass drum
    Kick,
    /// Snare drum
    Snare,
    /// Closed hi-hat
    Hihat,
    /// Crash cymbal
    Crash,
    /// Low tom
    Tom1,
    /// Mid tom
    Tom2,
    /// High tom
    Tom3,
}

impl DrumInstrument {
    /// Lowercase instrument name
    pub fn name(&self) -> &'static str {
        match self {
            DrumInstrument::Kick => "kick",
            DrumInstrument::Snare => "snare",
            DrumInstrument::Hihat => "hihat",
            DrumInstrument::Crash => "crash",
            DrumInstrument::Tom1 => "tom1",
            DrumInstrument::Tom2 => "tom2",
            DrumInstrument::Tom3 => "tom3",
        }
    }

    /// General MIDI percussion key (channel 10)
    pub fn midi_note(&self) -> u8 {
        match self {
            DrumInstrument::Kick => 36,
            DrumInstrument::Snare => 38,
            DrumInstrument::Hihat => 42,
            DrumInstrument::Crash => 49,
            DrumInstrument::Tom1 => 45,
            DrumInstrument::Tom2 => 47,
            DrumInstrument::Tom3 => 50,
        }
    }
}

/// A single drum hit within one measure
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrumHit {
    /// Offset from the start of the measure in seconds
    #[serde(rename = "offset")]
    pub offset_seconds: f32,

    /// Instrument struck
    pub instrument: DrumInstrument,

    /// Relative intensity (0.0-1.0)
    pub velocity: f32,
}

/// Percussion request as received from a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PercussionRequest {
    /// Tempo in BPM
    pub tempo: f32,

    /// Style tag; unknown tags are treated as rock
    #[serde(default = "default_style_tag")]
    pub style: String,
}

fn default_style_tag() -> String {
    DrumStyle::Rock.name().to_string()
}

/// One generated measure with the tempo and the style actually used
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PercussionPattern {
    /// Tempo in BPM
    pub tempo: f32,

    /// Hits sorted by offset
    pub pattern: Vec<DrumHit>,

    /// Resolved style name, not the requested tag: an unknown tag such as
    /// `"polka"` reports `"rock"`
    pub style: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instrument_codes() {
        let expected = [
            (DrumInstrument::Kick, 36),
            (DrumInstrument::Snare, 38),
            (DrumInstrument::Hihat, 42),
            (DrumInstrument::Crash, 49),
            (DrumInstrument::Tom1, 45),
            (DrumInstrument::Tom2, 47),
            (DrumInstrument::Tom3, 50),
        ];
        for (instrument, note) in expected {
            assert_eq!(instrument.midi_note(), note);
        }
    }

    #[test]
    fn test_drum_hit_serialization() {
        let hit = DrumHit {
            offset_seconds: 0.5,
            instrument: DrumInstrument::Hihat,
            velocity: 0.5,
        };
        let json = serde_json::to_value(hit).unwrap();
        assert_eq!(json["offset"], 0.5);
        assert_eq!(json["instrument"], "hihat");
        assert_eq!(DrumInstrument::Tom2.name(), "tom2");
    }

    #[test]
    fn test_request_default_style() {
        let request: PercussionRequest = serde_json::from_str(r#"{"tempo": 96.0}"#).unwrap();
        assert_eq!(request.style, "rock");
    }
}
