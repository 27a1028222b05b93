//! PCM conversion and WAV export

use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};

use crate::params::audio_constants::PCM_FULL_SCALE;
use super::synthesis::NoteBuffer;
use super::AudioError;

/// Convert f32 samples (nominally -1.0 to 1.0) to 16-bit PCM
///
/// Values are clamped symmetrically to ±32767; NaN and infinities become 0.
pub fn to_pcm_i16(samples: &[f32]) -> Vec<i16> {
    samples.iter().map(|&s| sample_to_pcm(s)).collect()
}

/// Convert one f32 sample to 16-bit PCM
pub fn sample_to_pcm(sample: f32) -> i16 {
    if !sample.is_finite() {
        return 0;
    }
    (sample * PCM_FULL_SCALE)
        .round()
        .clamp(-PCM_FULL_SCALE, PCM_FULL_SCALE) as i16
}

/// Convert 16-bit PCM back to f32 in -1.0 to 1.0
pub fn from_pcm_i16(samples: &[i16]) -> Vec<f32> {
    samples.iter().map(|&s| s as f32 / PCM_FULL_SCALE).collect()
}

/// Write a note as a 16-bit mono WAV file
pub fn write_wav(buffer: &NoteBuffer, path: &Path) -> Result<(), AudioError> {
    let spec = WavSpec {
        channels: 1,
        sample_rate: buffer.sample_rate_hz,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec)?;
    for &sample in &buffer.samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;

    log::debug!(
        "Wrote {} samples at {} Hz to {}",
        buffer.samples.len(),
        buffer.sample_rate_hz,
        path.display()
    );
    Ok(())
}
