//! Analysis result types

use super::metadata::AnalysisMetadata;
use crate::features::chroma::pitch_class_name;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A chord recognized in one analysis window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChordEvent {
    /// Window onset in seconds from the start of the waveform
    #[serde(rename = "timestamp")]
    pub onset_seconds: f32,

    /// Chord label from the template dictionary (e.g. "C", "Am", "G5")
    pub label: String,

    /// Best-match similarity, rounded to 3 decimals (0.0-1.0)
    pub confidence: f32,

    /// Analysis window length in seconds
    pub window_duration: f32,
}

impl ChordEvent {
    /// Create a chord event
    pub fn new(onset_seconds: f32, label: impl Into<String>, confidence: f32, window_duration: f32) -> Self {
        Self {
            onset_seconds,
            label: label.into(),
            confidence,
            window_duration,
        }
    }
}

/// Key mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyMode {
    /// Major (Ionian)
    Major,
    /// Natural minor (Aeolian)
    Minor,
}

/// Estimated tonal center
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeyEstimate {
    /// Tonic pitch class (0 = C, 1 = C#, ..., 11 = B)
    pub tonic: usize,

    /// Mode, if one could be inferred
    pub mode: Option<KeyMode>,

    /// Pearson correlation of the profile with the chosen key profile
    pub correlation: f32,
}

impl KeyEstimate {
    /// Tonic name, one of the 12 pitch-class labels
    ///
    /// # Example
    ///
    /// ```
    /// use karaoke_dsp::analysis::result::{KeyEstimate, KeyMode};
    ///
    /// let key = KeyEstimate { tonic: 9, mode: Some(KeyMode::Minor), correlation: 0.8 };
    /// assert_eq!(key.label(), "A");
    /// assert_eq!(key.name(), "Am");
    /// ```
    pub fn label(&self) -> &'static str {
        pitch_class_name(self.tonic)
    }

    /// Key name in musical notation ("C", "F#", "Am")
    pub fn name(&self) -> String {
        match self.mode {
            Some(KeyMode::Minor) => format!("{}m", self.label()),
            _ => self.label().to_string(),
        }
    }
}

/// Three-tier difficulty rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Difficulty {
    /// Total score ≤ 3
    Easy,
    /// Total score 4-5
    Medium,
    /// Total score ≥ 6
    Hard,
}

impl Difficulty {
    /// Name as reported to consumers
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Complete analysis result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Track title supplied by the caller
    pub title: String,

    /// Tempo in BPM, rounded to 2 decimals
    pub tempo: f32,

    /// Waveform duration in seconds, rounded to 2 decimals
    pub duration: f32,

    /// Chord events in onset order (never empty)
    pub chords: Vec<ChordEvent>,

    /// Beat times in seconds
    pub beats: Vec<f32>,

    /// Tonic pitch-class name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    /// Mode of the estimated key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_mode: Option<KeyMode>,

    /// Representative chord labels (at most 8)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chord_progression: Option<Vec<String>>,

    /// Difficulty rating
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,

    /// Analysis metadata
    #[serde(default)]
    pub metadata: AnalysisMetadata,
}

impl AnalysisResult {
    /// Chord labels in event order
    pub fn chord_labels(&self) -> Vec<String> {
        self.chords.iter().map(|c| c.label.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names() {
        let c = KeyEstimate {
            tonic: 0,
            mode: Some(KeyMode::Major),
            correlation: 0.9,
        };
        assert_eq!(c.label(), "C");
        assert_eq!(c.name(), "C");

        let fsm = KeyEstimate {
            tonic: 6,
            mode: Some(KeyMode::Minor),
            correlation: 0.7,
        };
        assert_eq!(fsm.label(), "F#");
        assert_eq!(fsm.name(), "F#m");

        let unknown = KeyEstimate {
            tonic: 0,
            mode: None,
            correlation: 0.0,
        };
        assert_eq!(unknown.name(), "C");
    }

    #[test]
    fn test_chord_event_serializes_timestamp() {
        let event = ChordEvent::new(2.0, "G", 0.812, 0.5);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["timestamp"], 2.0);
        assert_eq!(json["label"], "G");
        assert_eq!(json["window_duration"], 0.5);
        assert!(json.get("onset_seconds").is_none());
    }

    #[test]
    fn test_difficulty_serialization() {
        assert_eq!(serde_json::to_string(&Difficulty::Medium).unwrap(), "\"Medium\"");
        assert_eq!(Difficulty::Hard.to_string(), "Hard");
    }

    #[test]
    fn test_optional_fields_omitted() {
        let result = AnalysisResult {
            title: "t".to_string(),
            tempo: 120.0,
            duration: 1.0,
            chords: vec![ChordEvent::new(0.0, "C", 0.8, 0.5)],
            beats: vec![],
            key: None,
            key_mode: None,
            chord_progression: None,
            difficulty: None,
            metadata: AnalysisMetadata::default(),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("key").is_none());
        assert!(json.get("difficulty").is_none());
        assert_eq!(json["chords"][0]["label"], "C");

        let back: AnalysisResult = serde_json::from_value(json).unwrap();
        assert_eq!(back.chord_labels(), vec!["C".to_string()]);
    }
}
