//! Example: Analyze an audio file and export a karaoke backing MIDI file
//!
//! Usage:
//!   cargo run --release --example export_midi -- <audio-file> <out.mid> [rock|pop|jazz|electronic]
//!
//! The output has three tracks: chords (channel 0), bass (channel 1) and
//! drums (channel 9).

use karaoke_dsp::{analyze_waveform, decode_audio, export_karaoke_midi, generate_drum_pattern, AnalysisConfig};
use std::env;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.len() < 2 {
        eprintln!("Usage: export_midi <audio-file> <out.mid> [rock|pop|jazz|electronic]");
        std::process::exit(2);
    }
    let style = args.get(2).map(String::as_str).unwrap_or("rock");

    let waveform = decode_audio(&args[0])?;
    let result = analyze_waveform(&waveform, &args[0], &AnalysisConfig::default())?;
    let drums = generate_drum_pattern(result.tempo, style)?;

    let bytes = export_karaoke_midi(&result, Some(&drums), &args[1])?;

    println!(
        "Wrote {} ({} bytes): {:.1} BPM, {} chords, {} drum hits ({})",
        args[1],
        bytes,
        result.tempo,
        result.chords.len(),
        drums.pattern.len(),
        drums.style
    );

    Ok(())
}
