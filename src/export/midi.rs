//! Standard MIDI File builder
//!
//! [`MidiExporter`] is threaded by value through its calls: every `add_*`
//! consumes the builder and hands it back, so the session (tempo and the
//! notes collected so far) is never shared or mutated behind the caller's
//! back. Adding notes or finalizing before [`MidiExporter::initialize`] is a
//! contract violation.
//!
//! The file is SMF format 1 at 960 ticks per quarter note with one track
//! chunk per lane (chords, bass, drums). The tempo meta-event sits at tick 0
//! of the first track. Times in seconds become ticks with
//! `round(seconds * tempo / 60 * 960)`.

use super::voicing::{bass_note, chord_voicing};
use crate::analysis::result::AnalysisResult;
use crate::error::AnalysisError;
use crate::percussion::{DrumHit, PercussionPattern, MIN_TEMPO_BPM};
use midly::num::{u15, u24, u28, u4, u7};
use midly::{Format, Header, MetaMessage, MidiMessage, Smf, Timing, TrackEvent, TrackEventKind};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Resolution of the written file
pub const TICKS_PER_QUARTER: u16 = 960;

/// Chord lane (track and channel)
pub const CHORD_TRACK: u8 = 0;

/// Bass lane (track and channel)
pub const BASS_TRACK: u8 = 1;

/// Percussion lane (track and channel)
pub const DRUM_TRACK: u8 = 9;

/// Default chord and bass slot length in seconds
pub const DEFAULT_SLOT_SECONDS: f32 = 0.5;

/// Largest value of the 24-bit tempo meta-event
const MAX_TEMPO_MICROS: u32 = 0xFF_FFFF;

const CHORD_VELOCITY: u8 = 80;
const BASS_VELOCITY: u8 = 70;
const DRUM_NOTE_SECONDS: f32 = 0.25;

/// Lanes in file order with their track names
const LANES: [(u8, &str); 3] = [
    (CHORD_TRACK, "Chords"),
    (BASS_TRACK, "Bass"),
    (DRUM_TRACK, "Drums"),
];

/// A note collected for one lane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoteEvent {
    /// Lane number (0, 1 or 9)
    pub track: u8,
    /// MIDI channel
    pub channel: u8,
    /// MIDI pitch, or percussion key on the drum lane
    pub pitch: u8,
    /// Onset in seconds
    pub onset_seconds: f32,
    /// Duration in seconds (> 0)
    pub duration_seconds: f32,
    /// MIDI velocity (0-127)
    pub velocity: u8,
}

#[derive(Debug, Clone, PartialEq)]
struct Session {
    tempo_bpm: f32,
    chords: Vec<NoteEvent>,
    bass: Vec<NoteEvent>,
    drums: Vec<NoteEvent>,
}

/// By-value multi-track MIDI builder
///
/// # Example
///
/// ```
/// use karaoke_dsp::export::MidiExporter;
/// use karaoke_dsp::percussion::generate_drum_pattern;
///
/// let labels = ["C", "G", "Am", "F"];
/// let drums = generate_drum_pattern(120.0, "rock")?;
/// let bytes = MidiExporter::new()
///     .initialize(120.0)?
///     .add_chord_progression(&labels, 0.5)?
///     .add_bass_line(&labels, 0.5)?
///     .add_drum_pattern(&drums.pattern)?
///     .finalize()?;
/// assert_eq!(&bytes[..4], b"MThd");
///
/// // Adding notes before initialization is rejected
/// assert!(MidiExporter::new().add_bass_line(&labels, 0.5).is_err());
/// # Ok::<(), karaoke_dsp::AnalysisError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MidiExporter {
    session: Option<Session>,
}

impl MidiExporter {
    /// An uninitialized exporter
    pub fn new() -> Self {
        Self { session: None }
    }

    /// Fix the session tempo
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` for a non-finite tempo or one
    /// below [`MIN_TEMPO_BPM`], whose quarter note would not fit the tempo
    /// meta-event, and `AnalysisError::ContractViolation` if already initialized
    pub fn initialize(self, tempo_bpm: f32) -> Result<Self, AnalysisError> {
        if self.session.is_some() {
            return Err(AnalysisError::ContractViolation(
                "MIDI exporter is already initialized".to_string(),
            ));
        }
        if !(tempo_bpm >= MIN_TEMPO_BPM && tempo_bpm.is_finite()) {
            return Err(AnalysisError::InvalidInput(format!(
                "Tempo must be at least {:.3} BPM and finite, got {}",
                MIN_TEMPO_BPM, tempo_bpm
            )));
        }
        Ok(Self {
            session: Some(Session {
                tempo_bpm,
                chords: Vec::new(),
                bass: Vec::new(),
                drums: Vec::new(),
            }),
        })
    }

    /// True once [`MidiExporter::initialize`] has succeeded
    pub fn is_initialized(&self) -> bool {
        self.session.is_some()
    }

    /// Session tempo in BPM
    pub fn tempo(&self) -> Option<f32> {
        self.session.as_ref().map(|s| s.tempo_bpm)
    }

    /// Notes collected for a lane (empty for unknown lanes or before initialization)
    pub fn notes(&self, track: u8) -> &[NoteEvent] {
        match (&self.session, track) {
            (Some(s), CHORD_TRACK) => &s.chords,
            (Some(s), BASS_TRACK) => &s.bass,
            (Some(s), DRUM_TRACK) => &s.drums,
            _ => &[],
        }
    }

    /// Sound label `i` for `slot_seconds` starting at `i * slot_seconds` on track 0
    ///
    /// Unknown labels leave their slot silent.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::ContractViolation` before initialization and
    /// `AnalysisError::InvalidInput` for a non-positive slot
    pub fn add_chord_progression<S: AsRef<str>>(
        self,
        labels: &[S],
        slot_seconds: f32,
    ) -> Result<Self, AnalysisError> {
        let mut session = self.into_session("add_chord_progression")?;
        check_slot(slot_seconds)?;

        for (i, label) in labels.iter().enumerate() {
            let label = label.as_ref();
            let Some(pitches) = chord_voicing(label) else {
                log::debug!("No voicing for chord '{}', slot {} left empty", label, i);
                continue;
            };
            let onset_seconds = i as f32 * slot_seconds;
            session.chords.extend(pitches.iter().map(|&pitch| NoteEvent {
                track: CHORD_TRACK,
                channel: CHORD_TRACK,
                pitch,
                onset_seconds,
                duration_seconds: slot_seconds,
                velocity: CHORD_VELOCITY,
            }));
        }

        Ok(Self {
            session: Some(session),
        })
    }

    /// One root note per label on track 1, aligned with the chord slots
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::ContractViolation` before initialization and
    /// `AnalysisError::InvalidInput` for a non-positive slot
    pub fn add_bass_line<S: AsRef<str>>(
        self,
        labels: &[S],
        slot_seconds: f32,
    ) -> Result<Self, AnalysisError> {
        let mut session = self.into_session("add_bass_line")?;
        check_slot(slot_seconds)?;

        for (i, label) in labels.iter().enumerate() {
            let label = label.as_ref();
            let Some(pitch) = bass_note(label) else {
                log::debug!("No bass note for chord '{}', slot {} left empty", label, i);
                continue;
            };
            session.bass.push(NoteEvent {
                track: BASS_TRACK,
                channel: BASS_TRACK,
                pitch,
                onset_seconds: i as f32 * slot_seconds,
                duration_seconds: slot_seconds,
                velocity: BASS_VELOCITY,
            });
        }

        Ok(Self {
            session: Some(session),
        })
    }

    /// One 0.25 s percussion note per hit on track 9
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::ContractViolation` before initialization
    pub fn add_drum_pattern(self, hits: &[DrumHit]) -> Result<Self, AnalysisError> {
        let mut session = self.into_session("add_drum_pattern")?;

        session.drums.extend(hits.iter().map(|hit| NoteEvent {
            track: DRUM_TRACK,
            channel: DRUM_TRACK,
            pitch: hit.instrument.midi_note(),
            onset_seconds: hit.offset_seconds.max(0.0),
            duration_seconds: DRUM_NOTE_SECONDS,
            velocity: (hit.velocity * 127.0).clamp(0.0, 127.0) as u8,
        }));

        Ok(Self {
            session: Some(session),
        })
    }

    /// Serialize the session to Standard MIDI File bytes
    ///
    /// Identical sessions always produce identical bytes.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::ContractViolation` before initialization and
    /// `AnalysisError::ExportError` if serialization fails
    pub fn finalize(self) -> Result<Vec<u8>, AnalysisError> {
        let session = self.into_session("finalize")?;
        let ticks_per_second = session.tempo_bpm as f64 / 60.0 * TICKS_PER_QUARTER as f64;
        let tempo_us = ((60_000_000.0 / session.tempo_bpm as f64).round() as u32).min(MAX_TEMPO_MICROS);

        let mut tracks = Vec::with_capacity(LANES.len());
        for (index, &(lane, name)) in LANES.iter().enumerate() {
            let notes = match lane {
                CHORD_TRACK => &session.chords,
                BASS_TRACK => &session.bass,
                _ => &session.drums,
            };

            let mut events: Vec<TrackEvent<'static>> = Vec::with_capacity(notes.len() * 2 + 3);
            if index == 0 {
                events.push(TrackEvent {
                    delta: u28::from(0),
                    kind: TrackEventKind::Meta(MetaMessage::Tempo(u24::from(tempo_us))),
                });
            }
            events.push(TrackEvent {
                delta: u28::from(0),
                kind: TrackEventKind::Meta(MetaMessage::TrackName(name.as_bytes())),
            });
            events.extend(note_events(notes, lane, ticks_per_second));
            events.push(TrackEvent {
                delta: u28::from(0),
                kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
            });
            tracks.push(events);
        }

        let smf = Smf {
            header: Header {
                format: Format::Parallel,
                timing: Timing::Metrical(u15::from(TICKS_PER_QUARTER)),
            },
            tracks,
        };

        let mut bytes = Vec::new();
        smf.write(&mut bytes)
            .map_err(|e| AnalysisError::ExportError(format!("Failed to write MIDI data: {:?}", e)))?;

        log::info!(
            "MIDI export: {} chord, {} bass, {} drum notes at {:.2} BPM ({} bytes)",
            session.chords.len(),
            session.bass.len(),
            session.drums.len(),
            session.tempo_bpm,
            bytes.len()
        );

        Ok(bytes)
    }

    fn into_session(self, operation: &str) -> Result<Session, AnalysisError> {
        self.session.ok_or_else(|| {
            AnalysisError::ContractViolation(format!(
                "{} called before the MIDI exporter was initialized",
                operation
            ))
        })
    }
}

fn check_slot(slot_seconds: f32) -> Result<(), AnalysisError> {
    if slot_seconds > 0.0 && slot_seconds.is_finite() {
        Ok(())
    } else {
        Err(AnalysisError::InvalidInput(format!(
            "Slot duration must be positive, got {}",
            slot_seconds
        )))
    }
}

fn seconds_to_ticks(seconds: f32, ticks_per_second: f64) -> u32 {
    (seconds.max(0.0) as f64 * ticks_per_second).round() as u32
}

/// Note-on/off messages for one lane, delta-encoded
///
/// Messages are ordered by tick; at equal ticks note-offs come first so a
/// repeated pitch is released before it is struck again.
fn note_events(notes: &[NoteEvent], channel: u8, ticks_per_second: f64) -> Vec<TrackEvent<'static>> {
    // (tick, is_note_on, pitch, velocity)
    let mut timeline: Vec<(u32, bool, u8, u8)> = Vec::with_capacity(notes.len() * 2);
    for note in notes {
        let on = seconds_to_ticks(note.onset_seconds, ticks_per_second);
        let off = seconds_to_ticks(note.onset_seconds + note.duration_seconds, ticks_per_second)
            .max(on.saturating_add(1));
        timeline.push((on, true, note.pitch, note.velocity));
        timeline.push((off, false, note.pitch, 0));
    }
    timeline.sort_by_key(|&(tick, is_on, _, _)| (tick, is_on));

    let mut events = Vec::with_capacity(timeline.len());
    let mut last_tick = 0u32;
    for (tick, is_on, pitch, velocity) in timeline {
        let message = if is_on {
            MidiMessage::NoteOn {
                key: u7::from(pitch),
                vel: u7::from(velocity),
            }
        } else {
            MidiMessage::NoteOff {
                key: u7::from(pitch),
                vel: u7::from(0),
            }
        };
        events.push(TrackEvent {
            delta: u28::from(tick - last_tick),
            kind: TrackEventKind::Midi {
                channel: u4::from(channel),
                message,
            },
        });
        last_tick = tick;
    }
    events
}

/// Export an analysis (and optionally a percussion measure) to a MIDI file
///
/// Every chord event becomes one 0.5 s slot on the chord and bass lanes, in
/// event order, at the analyzed tempo.
///
/// # Returns
///
/// Number of bytes written
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` for a tempo below [`MIN_TEMPO_BPM`] and
/// `AnalysisError::ExportError` if the file cannot be written
pub fn export_karaoke_midi<P: AsRef<Path>>(
    result: &AnalysisResult,
    percussion: Option<&PercussionPattern>,
    path: P,
) -> Result<usize, AnalysisError> {
    let labels = result.chord_labels();

    let mut exporter = MidiExporter::new()
        .initialize(result.tempo)?
        .add_chord_progression(labels.as_slice(), DEFAULT_SLOT_SECONDS)?
        .add_bass_line(labels.as_slice(), DEFAULT_SLOT_SECONDS)?;
    if let Some(pattern) = percussion {
        exporter = exporter.add_drum_pattern(&pattern.pattern)?;
    }
    let bytes = exporter.finalize()?;

    let path = path.as_ref();
    let mut file = File::create(path)?;
    file.write_all(&bytes)?;

    log::info!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(bytes.len())
}
