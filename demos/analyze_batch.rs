//! Example: Analyze multiple audio files in parallel
//!
//! Usage:
//!   cargo run --release --example analyze_batch -- [--jobs N] [--json] <file1> <file2> ...
//!
//! Notes:
//! - Parallelism is across files. Each file analysis is single-threaded.
//! - Default workers: (available CPU threads - 1), keeping one core free for the system.

use karaoke_dsp::{analyze_waveform, decode_audio, AnalysisConfig, AnalysisResult};
use rayon::prelude::*;
use std::env;
use std::path::Path;
use std::time::Instant;

fn default_jobs() -> usize {
    let n = std::thread::available_parallelism().map(|v| v.get()).unwrap_or(1);
    std::cmp::max(1, n.saturating_sub(1))
}

fn percentile(mut xs: Vec<f32>, p: f32) -> Option<f32> {
    if xs.is_empty() {
        return None;
    }
    xs.sort_by(|a, b| a.total_cmp(b));
    let idx = ((xs.len() - 1) as f32 * p.clamp(0.0, 1.0)).round() as usize;
    Some(xs[idx.min(xs.len() - 1)])
}

fn analyze_path(path: &str, config: &AnalysisConfig) -> Result<AnalysisResult, String> {
    let waveform = decode_audio(path).map_err(|e| format!("decode failed: {e}"))?;
    let title = Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("untitled");
    analyze_waveform(&waveform, title, config).map_err(|e| format!("analysis failed: {e}"))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut json = false;
    let mut jobs: Option<usize> = None;
    let mut paths: Vec<String> = Vec::new();

    let mut args = env::args().skip(1);
    while let Some(a) = args.next() {
        match a.as_str() {
            "--json" => json = true,
            "--jobs" => {
                let v = args.next().ok_or("--jobs requires a value")?.parse::<usize>()?;
                jobs = Some(std::cmp::max(1, v));
            }
            "--help" | "-h" => {
                eprintln!(
                    "Usage: analyze_batch [--jobs N] [--json] <file1> <file2> ...\n\
                     \n\
                     --jobs N   Parallel workers (default: CPU-1)\n\
                     --json     Emit one JSON object per line (JSONL)\n"
                );
                return Ok(());
            }
            _ => paths.push(a),
        }
    }

    if paths.is_empty() {
        eprintln!("ERROR: Provide at least one audio file path. Use --help for usage.");
        std::process::exit(2);
    }

    let jobs = jobs.unwrap_or_else(default_jobs);
    eprintln!("Batch: {} files, jobs={}", paths.len(), jobs);

    let config = AnalysisConfig::default();
    config.validate()?;

    let t0 = Instant::now();
    let pool = rayon::ThreadPoolBuilder::new().num_threads(jobs).build()?;

    let outs: Vec<(String, Result<AnalysisResult, String>)> = pool.install(|| {
        paths
            .par_iter()
            .map(|path| (path.clone(), analyze_path(path, &config)))
            .collect()
    });

    for (path, out) in &outs {
        match (out, json) {
            (Ok(result), true) => {
                let mut value = serde_json::to_value(result)?;
                value["path"] = serde_json::Value::String(path.clone());
                println!("{}", serde_json::to_string(&value)?);
            }
            (Err(e), true) => {
                println!("{}", serde_json::json!({ "path": path, "error": e }));
            }
            (Ok(result), false) => {
                println!(
                    "{}\ttempo={:.2}\tkey={}\tchords={}\tdifficulty={}\t{:.1} ms",
                    path,
                    result.tempo,
                    result.key.as_deref().unwrap_or("-"),
                    result.chord_progression.as_deref().unwrap_or(&[]).join(" "),
                    result.difficulty.map_or("-".to_string(), |d| d.to_string()),
                    result.metadata.processing_time_ms
                );
            }
            (Err(e), false) => println!("{}\tERROR: {}", path, e),
        }
    }

    let ok: Vec<&AnalysisResult> = outs.iter().filter_map(|(_, r)| r.as_ref().ok()).collect();
    let fallbacks = ok
        .iter()
        .filter(|r| r.metadata.chord_source == "fallback")
        .count();
    let times: Vec<f32> = ok.iter().map(|r| r.metadata.processing_time_ms).collect();

    eprintln!(
        "Done: {}/{} analyzed ({} with fallback chords) in {:.2}s",
        ok.len(),
        outs.len(),
        fallbacks,
        t0.elapsed().as_secs_f32()
    );
    if let (Some(p50), Some(p95)) = (percentile(times.clone(), 0.5), percentile(times, 0.95)) {
        eprintln!("Per-file processing: p50={:.1} ms, p95={:.1} ms", p50, p95);
    }

    Ok(())
}
