//! Audio decoding using Symphonia
//!
//! Decodes a local audio file (any container/codec in Symphonia's default
//! registry) into a mono [`Waveform`]. This is the acquisition boundary of
//! the pipeline: every failure here is reported as
//! `AnalysisError::DecodingError` and nothing downstream substitutes a value.

use crate::error::AnalysisError;
use crate::io::waveform::Waveform;
use crate::preprocessing::channel_mixer::downmix_interleaved;
use std::fs::File;
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Decode an audio file to a mono waveform
///
/// # Arguments
///
/// * `path` - Path to audio file
///
/// # Errors
///
/// Returns `AnalysisError::DecodingError` if the file cannot be opened, has no
/// decodable audio track, or a non-recoverable decode error occurs
pub fn decode_audio<P: AsRef<Path>>(path: P) -> Result<Waveform, AnalysisError> {
    let path = path.as_ref();
    log::debug!("Decoding audio file: {}", path.display());

    let src = File::open(path).map_err(|e| {
        AnalysisError::DecodingError(format!("Cannot open {}: {}", path.display(), e))
    })?;
    let mss = MediaSourceStream::new(Box::new(src), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| AnalysisError::DecodingError(format!("Unsupported format: {}", e)))?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| AnalysisError::DecodingError("No supported audio tracks found".to_string()))?;

    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| AnalysisError::DecodingError("Track has no sample rate".to_string()))?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| AnalysisError::DecodingError(format!("Unsupported codec: {}", e)))?;

    let mut mono: Vec<f32> = Vec::new();
    let mut sample_buf: Option<SampleBuffer<f32>> = None;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => {
                return Err(AnalysisError::DecodingError(format!(
                    "Failed to read packet: {}",
                    e
                )))
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                let channels = spec.channels.count();

                let buf = sample_buf.get_or_insert_with(|| {
                    SampleBuffer::<f32>::new(decoded.capacity() as u64, spec)
                });
                if buf.capacity() < decoded.capacity() * channels {
                    *buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
                }
                buf.copy_interleaved_ref(decoded);

                mono.extend(downmix_interleaved(buf.samples(), channels)?);
            }
            Err(SymphoniaError::DecodeError(msg)) => {
                // Corrupted packets are skipped; the rest of the stream is still usable.
                log::warn!("Skipping undecodable packet: {}", msg);
                continue;
            }
            Err(e) => {
                return Err(AnalysisError::DecodingError(format!(
                    "Decoder failure: {}",
                    e
                )))
            }
        }
    }

    if mono.is_empty() {
        return Err(AnalysisError::DecodingError(format!(
            "No audio decoded from {}",
            path.display()
        )));
    }

    log::debug!(
        "Decoded {} mono samples at {} Hz ({:.2}s)",
        mono.len(),
        sample_rate,
        mono.len() as f32 / sample_rate as f32
    );

    Waveform::new(mono, sample_rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file() {
        let result = decode_audio("/nonexistent/path/to/audio.wav");
        assert!(matches!(result, Err(AnalysisError::DecodingError(_))));
    }

    #[test]
    fn test_garbage_file() {
        let path = std::env::temp_dir().join(format!(
            "karaoke_dsp_garbage_{}.wav",
            std::process::id()
        ));
        std::fs::write(&path, b"definitely not audio").unwrap();
        let result = decode_audio(&path);
        assert!(matches!(result, Err(AnalysisError::DecodingError(_))));
        let _ = std::fs::remove_file(&path);
    }
}
