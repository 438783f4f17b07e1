//! WAV output — mono 16-bit PCM, either as bytes in memory or as a file.

use std::fs::File;
use std::io::{BufWriter, Cursor, Seek, Write};
use std::path::Path;

use crate::error::{ArenaError, Result};

use super::SAMPLE_RATE;

const SPEC: hound::WavSpec = hound::WavSpec {
    channels: 1,
    sample_rate: SAMPLE_RATE,
    bits_per_sample: 16,
    sample_format: hound::SampleFormat::Int,
};

/// Convert float samples to 16-bit PCM: clamp to [-1, 1], scale by 32767,
/// truncate toward zero.
pub fn to_pcm_i16(samples: &[f64]) -> Vec<i16> {
    samples
        .iter()
        .map(|&s| (s.clamp(-1.0, 1.0) * 32767.0) as i16)
        .collect()
}

fn write_pcm<W: Write + Seek>(writer: W, samples: &[f64]) -> hound::Result<()> {
    let mut writer = hound::WavWriter::new(writer, SPEC)?;
    for sample in to_pcm_i16(samples) {
        writer.write_sample(sample)?;
    }
    writer.finalize()
}

/// Render a mono float buffer to WAV bytes.
pub fn render_wav(samples: &[f64]) -> Result<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::with_capacity(44 + samples.len() * 2));
    write_pcm(&mut cursor, samples).map_err(ArenaError::WavEncode)?;
    Ok(cursor.into_inner())
}

/// Write a mono float buffer to a WAV file.
pub fn write_wav(path: &Path, samples: &[f64]) -> Result<()> {
    let file = File::create(path).map_err(|e| ArenaError::io(path, e))?;
    write_pcm(BufWriter::new(file), samples).map_err(|e| ArenaError::wav(path, e))
}
