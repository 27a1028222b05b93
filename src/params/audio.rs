//! Synthesis and analysis configuration.

/// Note synthesis configuration
#[derive(Debug, Clone)]
pub struct SynthConfig {
    /// Output sample rate (Hz)
    /// Matches the mono 16-bit track the instruments were tuned against
    pub sample_rate_hz: u32,

    /// Seed for breath/reed/shaker noise
    /// None = fresh seed per note (non-reproducible output)
    pub noise_seed: Option<u64>,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: audio_constants::SAMPLE_RATE_HZ,
            noise_seed: None,
        }
    }
}

impl SynthConfig {
    /// Validate configuration (sample rate must be > 0)
    pub fn validate(&self) -> Result<(), String> {
        if self.sample_rate_hz == 0 {
            return Err("Sample rate must be > 0".to_string());
        }
        Ok(())
    }
}

/// Spectral analysis configuration for pitch checks
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// FFT window size (must be power of 2)
    /// 8192 @ 44.1kHz ≈ 5.4 Hz per bin
    pub fft_size: usize,

    /// Lowest frequency considered when picking the peak (Hz)
    /// Skips the DC bin and sub-audio rumble
    pub min_hz: f32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            fft_size: 8192,
            min_hz: 20.0,
        }
    }
}

impl AnalysisConfig {
    /// Convert frequency (Hz) to FFT bin index
    pub fn hz_to_bin(&self, hz: f32, sample_rate_hz: u32) -> usize {
        ((hz * self.fft_size as f32) / sample_rate_hz as f32) as usize
    }

    /// Convert a (possibly fractional) FFT bin back to Hz
    pub fn bin_to_hz(&self, bin: f32, sample_rate_hz: u32) -> f32 {
        bin * sample_rate_hz as f32 / self.fft_size as f32
    }

    /// Validate configuration (FFT size must be power of 2, etc.)
    pub fn validate(&self) -> Result<(), String> {
        if !self.fft_size.is_power_of_two() {
            return Err(format!(
                "FFT size must be power of 2, got {}",
                self.fft_size
            ));
        }
        if self.min_hz < 0.0 {
            return Err(format!("Minimum frequency must be >= 0, got {}", self.min_hz));
        }
        Ok(())
    }
}

/// Audio constants (compile-time)
pub mod audio_constants {
    /// Default sample rate (Hz)
    pub const SAMPLE_RATE_HZ: u32 = 44100;

    /// Largest magnitude written to a 16-bit sample
    /// -32768 is never produced
    pub const PCM_FULL_SCALE: f32 = 32767.0;
}
