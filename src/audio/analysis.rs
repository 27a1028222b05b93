//! Spectral pitch check for rendered notes.

use rustfft::{num_complex::Complex, FftPlanner};
use std::f32::consts::PI;

use super::synthesis::NoteBuffer;
use crate::params::AnalysisConfig;

/// Frequency (Hz) of the strongest spectral peak in the start of `buffer`
///
/// Analyzes the first `fft_size` samples (zero-padded if the note is
/// shorter) under a Hann window, and refines the peak bin by parabolic
/// interpolation. Returns None for an empty or silent buffer.
pub fn dominant_frequency(buffer: &NoteBuffer, config: &AnalysisConfig) -> Option<f32> {
    let size = config.fft_size;
    let len = buffer.samples.len().min(size);
    if len == 0 || buffer.sample_rate_hz == 0 || size < 4 {
        return None;
    }

    // Window only the real samples so padding doesn't skew the window
    let mut spectrum = vec![Complex::new(0.0f32, 0.0); size];
    for (i, &sample) in buffer.samples[..len].iter().enumerate() {
        let window = hann_window(i, len);
        spectrum[i] = Complex::new(sample as f32 * window, 0.0);
    }

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(size);
    fft.process(&mut spectrum);

    let magnitudes: Vec<f32> = spectrum[..size / 2].iter().map(|c| c.norm()).collect();
    let first = config
        .hz_to_bin(config.min_hz, buffer.sample_rate_hz)
        .max(1);
    let last = magnitudes.len() - 1;
    if first >= last {
        return None;
    }

    let (peak, peak_mag) = magnitudes[first..last]
        .iter()
        .enumerate()
        .map(|(i, &m)| (i + first, m))
        .fold((first, 0.0f32), |best, cur| if cur.1 > best.1 { cur } else { best });
    if peak_mag <= 0.0 {
        return None;
    }

    // Parabolic interpolation between neighbouring bins
    let (left, right) = (magnitudes[peak - 1], magnitudes[peak + 1]);
    let denom = left - 2.0 * peak_mag + right;
    let offset = if denom.abs() > f32::EPSILON {
        (0.5 * (left - right) / denom).clamp(-0.5, 0.5)
    } else {
        0.0
    };

    Some(config.bin_to_hz(peak as f32 + offset, buffer.sample_rate_hz))
}

/// Hann window function for FFT analysis
pub fn hann_window(index: usize, size: usize) -> f32 {
    if size < 2 {
        return 1.0;
    }
    0.5 * (1.0 - ((2.0 * PI * index as f32) / (size as f32 - 1.0)).cos())
}
