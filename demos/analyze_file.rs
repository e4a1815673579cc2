//! Example: Analyze a single audio file
//!
//! Usage:
//!   cargo run --release --example analyze_file -- <audio-file> [--config config.json]
//!
//! Prints the analysis result as pretty JSON on stdout.

use karaoke_dsp::config::load_config;
use karaoke_dsp::{analyze_waveform, decode_audio, AnalysisConfig};
use std::env;
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let path = args
        .next()
        .ok_or("Usage: analyze_file <audio-file> [--config config.json]")?;

    let config = match (args.next().as_deref(), args.next()) {
        (Some("--config"), Some(config_path)) => load_config(config_path)?,
        (None, _) => AnalysisConfig::default(),
        _ => return Err("Usage: analyze_file <audio-file> [--config config.json]".into()),
    };

    let waveform = decode_audio(&path)?;
    let title = Path::new(&path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("untitled");

    let result = analyze_waveform(&waveform, title, &config)?;

    eprintln!("Analysis Results:");
    eprintln!("  Tempo: {:.2} BPM ({} beats)", result.tempo, result.beats.len());
    eprintln!(
        "  Key: {} ({})",
        result.key.as_deref().unwrap_or("-"),
        result.metadata.key_source
    );
    eprintln!(
        "  Chords: {} events ({})",
        result.chords.len(),
        result.metadata.chord_source
    );
    if let Some(difficulty) = result.difficulty {
        eprintln!("  Difficulty: {}", difficulty);
    }
    for warning in &result.metadata.warnings {
        eprintln!("  Warning: {}", warning);
    }
    eprintln!("  Processing time: {:.2} ms", result.metadata.processing_time_ms);

    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}
