//! Additive note synthesis.
//!
//! A note is a sum of sinusoids (fundamental plus weighted partials) shaped
//! by the profile's envelope, optionally modulated, then scaled and
//! converted to 16-bit PCM. Rendering is pure apart from the injected
//! [`NoiseSource`], so notes can be rendered on any thread.

use std::f64::consts::TAU;
use std::time::Duration;

use super::export::to_pcm_i16;
use super::noise::NoiseSource;
use super::profile::{InstrumentProfile, NoiseShape, PartialShaping};
use crate::params::SynthConfig;

/// Rendered mono 16-bit note
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteBuffer {
    pub samples: Vec<i16>,
    pub sample_rate_hz: u32,
}

impl NoteBuffer {
    pub fn silent(sample_rate_hz: u32) -> Self {
        Self {
            samples: Vec::new(),
            sample_rate_hz,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Playing time at the buffer's sample rate
    pub fn duration(&self) -> Duration {
        if self.sample_rate_hz == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.samples.len() as f64 / self.sample_rate_hz as f64)
    }

    /// Largest absolute sample value
    pub fn peak(&self) -> u16 {
        self.samples
            .iter()
            .map(|s| s.unsigned_abs())
            .max()
            .unwrap_or(0)
    }

    /// Add `other` into this buffer starting at `offset` samples, growing as needed
    ///
    /// Overlapping samples saturate at ±32767.
    pub fn mix_at(&mut self, offset: usize, other: &NoteBuffer) {
        let end = offset + other.samples.len();
        if self.samples.len() < end {
            self.samples.resize(end, 0);
        }
        for (dst, &src) in self.samples[offset..end].iter_mut().zip(&other.samples) {
            *dst = dst.saturating_add(src).max(-i16::MAX);
        }
    }
}

/// Note renderer at a fixed sample rate
#[derive(Debug, Clone)]
pub struct Synth {
    sample_rate_hz: u32,
    noise_seed: Option<u64>,
}

impl Default for Synth {
    fn default() -> Self {
        Self::from_config(&SynthConfig::default())
    }
}

impl Synth {
    pub fn new(sample_rate_hz: u32) -> Self {
        Self {
            sample_rate_hz,
            noise_seed: None,
        }
    }

    pub fn from_config(config: &SynthConfig) -> Self {
        Self {
            sample_rate_hz: config.sample_rate_hz,
            noise_seed: config.noise_seed,
        }
    }

    pub fn sample_rate_hz(&self) -> u32 {
        self.sample_rate_hz
    }

    /// Noise source following the configured seed policy
    pub fn noise_source(&self) -> NoiseSource {
        NoiseSource::from_seed(self.noise_seed)
    }

    /// Number of samples in a note of `duration_ms`
    pub fn sample_count(&self, duration_ms: u32) -> usize {
        (self.sample_rate_hz as u64 * duration_ms as u64 / 1000) as usize
    }

    /// Render a note to 16-bit PCM
    ///
    /// Invalid input (non-positive or non-finite frequency, zero duration)
    /// yields an empty buffer rather than an error.
    pub fn render(
        &self,
        profile: &InstrumentProfile,
        frequency_hz: f32,
        duration_ms: u32,
        noise: &mut NoiseSource,
    ) -> NoteBuffer {
        let samples = self.render_f32(profile, frequency_hz, duration_ms, noise);
        log::debug!(
            "Rendered {} at {:.2} Hz: {} samples",
            profile.name,
            frequency_hz,
            samples.len()
        );
        NoteBuffer {
            samples: to_pcm_i16(&samples),
            sample_rate_hz: self.sample_rate_hz,
        }
    }

    /// Render a note as f32 samples (output gain applied, not yet clamped)
    pub fn render_f32(
        &self,
        profile: &InstrumentProfile,
        frequency_hz: f32,
        duration_ms: u32,
        noise: &mut NoiseSource,
    ) -> Vec<f32> {
        if !frequency_hz.is_finite() || frequency_hz <= 0.0 || self.sample_rate_hz == 0 {
            return Vec::new();
        }
        let num_samples = self.sample_count(duration_ms);
        let sample_rate = self.sample_rate_hz as f32;
        let duration_s = num_samples as f32 / sample_rate;
        let dt = 1.0 / self.sample_rate_hz as f64;

        // Phases in cycles. Partials ride on `base`; the fundamental has its
        // own accumulator so a pitch bend only moves the fundamental.
        let mut base_phase = 0.0f64;
        let mut fundamental_phase = 0.0f64;

        let mut samples = Vec::with_capacity(num_samples);
        for i in 0..num_samples {
            let t = i as f32 / sample_rate;
            let env = profile.envelope.level(t, duration_s);

            let vibrato = profile
                .vibrato
                .map_or(1.0, |v| 1.0 + v.depth * ramp_in(v.ramp_s, t) * sine(v.rate_hz, t));
            let bend = profile
                .pitch_bend
                .map_or(1.0, |b| 1.0 + b.depth * (-b.decay * t).exp());

            let base_angle = TAU * base_phase;
            let mut fundamental = (TAU * fundamental_phase).sin() as f32;
            if let Some(buzz) = profile.reed_buzz {
                fundamental *= 1.0 + buzz.depth * (buzz.ratio as f64 * base_angle).sin() as f32;
            }
            let mut tone = profile.fundamental * fundamental;

            for partial in profile.partials {
                let weight = match partial.shaping {
                    PartialShaping::Steady => partial.weight,
                    PartialShaping::Enveloped => partial.weight * env,
                    PartialShaping::Pulsed { rate_hz } => partial.weight * sine(rate_hz, t),
                };
                tone += weight * (partial.ratio as f64 * base_angle).sin() as f32;
            }

            let mut value = match profile.noise {
                // Breath follows the envelope and is enveloped again with the tone
                Some(NoiseShape::Breath { amount }) => {
                    (tone + noise.centered() * amount * env) * env
                }
                Some(NoiseShape::Shaker { ring, rattle }) => {
                    let shake = noise.centered() * (base_angle.sin() as f32) * ring
                        + (2.0 * base_angle).sin() as f32 * rattle * noise.unit();
                    (tone + shake) * env
                }
                None => tone * env,
            };

            if let Some(trem) = profile.tremolo {
                value *= 1.0
                    + trem.depth
                        * ramp_in(trem.ramp_s, t)
                        * sine(trem.rate_hz, t)
                        * (-trem.decay * t).exp();
            }

            samples.push(value * profile.output_gain);

            let instantaneous = frequency_hz as f64 * vibrato as f64;
            base_phase += instantaneous * dt;
            fundamental_phase += instantaneous * bend as f64 * dt;
        }

        samples
    }
}

/// sin(2π·rate·t)
fn sine(rate_hz: f32, t: f32) -> f32 {
    (std::f32::consts::TAU * rate_hz * t).sin()
}

/// Linear 0 to 1 ramp over `ramp_s` seconds (1 immediately when `ramp_s` is 0)
fn ramp_in(ramp_s: f32, t: f32) -> f32 {
    if ramp_s > 0.0 {
        (t / ramp_s).min(1.0)
    } else {
        1.0
    }
}

/// Render `frequency_hz` on `profile` for `duration_ms` at 44.1 kHz
///
/// Noisy profiles draw a fresh seed; use [`Synth::render`] with a seeded
/// [`NoiseSource`] for reproducible output.
pub fn synthesize(profile: &InstrumentProfile, frequency_hz: f32, duration_ms: u32) -> NoteBuffer {
    let synth = Synth::default();
    let mut noise = synth.noise_source();
    synth.render(profile, frequency_hz, duration_ms, &mut noise)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::envelope::Envelope;
    use crate::audio::profile::{Instrument, Vibrato, PIANO};

    #[test]
    fn test_piano_a4_scenario() {
        let buffer = synthesize(&PIANO, 440.0, 100);
        assert_eq!(buffer.len(), 4410);
        assert_eq!(buffer.sample_rate_hz, 44100);
        assert!(buffer.samples[0].abs() <= 1);
        assert!(buffer.samples.iter().all(|&s| s >= -32767));
        assert!(buffer.peak() > 1000);
    }

    #[test]
    fn test_sample_count_uses_integer_math() {
        let synth = Synth::new(44100);
        assert_eq!(synth.sample_count(1), 44);
        assert_eq!(synth.sample_count(1200), 52920);
        assert_eq!(Synth::new(22050).sample_count(333), 7342);
        // u32::MAX ms does not overflow the intermediate product
        assert_eq!(
            Synth::new(48000).sample_count(u32::MAX),
            (48000u64 * u32::MAX as u64 / 1000) as usize
        );
    }

    #[test]
    fn test_every_instrument_stays_in_range() {
        let synth = Synth::new(44100);
        for instrument in Instrument::ALL {
            let profile = instrument.profile();
            let mut noise = NoiseSource::seeded(3);
            let buffer = synth.render(profile, 440.0, profile.default_duration_ms, &mut noise);
            assert_eq!(buffer.len(), synth.sample_count(profile.default_duration_ms));
            assert!(buffer.samples.iter().all(|&s| s != i16::MIN), "{}", instrument);
            assert!(buffer.peak() > 0, "{} rendered silence", instrument);
        }
    }

    #[test]
    fn test_every_instrument_stays_within_its_headroom() {
        let synth = Synth::new(44100);
        for instrument in Instrument::ALL {
            let profile = instrument.profile();
            let tremolo = profile.tremolo.map_or(0.0, |t| t.depth);
            // 1% slack for float rounding
            let bound = (profile.peak_sum() * profile.output_gain * 1.01 * (1.0 + tremolo))
                .min(1.0)
                * 32767.0
                + 1.0;

            for seed in 0..4 {
                let mut noise = NoiseSource::seeded(seed);
                let buffer = synth.render(profile, 440.0, profile.default_duration_ms, &mut noise);
                assert!(
                    (buffer.peak() as f32) <= bound,
                    "{} peaked at {} above {}",
                    instrument,
                    buffer.peak(),
                    bound
                );
            }
        }
    }

    #[test]
    fn test_breath_noise_is_enveloped_twice() {
        let breath = InstrumentProfile {
            name: "breath",
            fundamental: 0.0,
            partials: &[],
            envelope: Envelope::Fade,
            vibrato: None,
            tremolo: None,
            pitch_bend: None,
            reed_buzz: None,
            noise: Some(NoiseShape::Breath { amount: 1.0 }),
            output_gain: 1.0,
            default_note_hz: 440.0,
            default_duration_ms: 1000,
        };
        let synth = Synth::new(44100);
        let buffer = synth.render(&breath, 440.0, 1000, &mut NoiseSource::seeded(11));

        assert!(buffer.peak() > 0);
        for (i, &sample) in buffer.samples.iter().enumerate().skip(22050) {
            let env = 1.0 - i as f32 / 44100.0;
            let bound = 0.5 * env * env * 32767.0 + 2.0;
            assert!(
                (sample.unsigned_abs() as f32) <= bound,
                "sample {} = {} exceeds {}",
                i,
                sample,
                bound
            );
        }
    }

    #[test]
    fn test_vibrato_and_tremolo_ramp_in() {
        assert_eq!(ramp_in(0.0, 0.3), 1.0);
        assert_eq!(ramp_in(0.8, 0.0), 0.0);
        assert!((ramp_in(0.8, 0.4) - 0.5).abs() < 1e-6);
        assert_eq!(ramp_in(0.8, 2.0), 1.0);

        // A vibrato voice differs from the plain one only once the ramp starts
        let plain = PIANO.clone();
        let wobbly = InstrumentProfile {
            vibrato: Some(Vibrato {
                rate_hz: 5.0,
                depth: 0.02,
                ramp_s: 0.5,
            }),
            ..PIANO.clone()
        };
        let a = synthesize(&plain, 440.0, 500);
        let b = synthesize(&wobbly, 440.0, 500);
        assert_eq!(a.len(), b.len());
        assert_eq!(a.samples[..2], b.samples[..2]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_noise_free_profiles_are_deterministic() {
        for instrument in Instrument::ALL {
            let profile = instrument.profile();
            if profile.is_noisy() {
                continue;
            }
            let a = synthesize(profile, 392.0, 300);
            let b = synthesize(profile, 392.0, 300);
            assert_eq!(a, b, "{} differs between renders", instrument);
        }
    }

    #[test]
    fn test_noisy_profiles_repeat_with_seed() {
        let synth = Synth::new(44100);
        for instrument in [Instrument::Flute, Instrument::Maraca] {
            let profile = instrument.profile();
            let a = synth.render(profile, 523.25, 200, &mut NoiseSource::seeded(42));
            let b = synth.render(profile, 523.25, 200, &mut NoiseSource::seeded(42));
            let c = synth.render(profile, 523.25, 200, &mut NoiseSource::seeded(43));
            assert_eq!(a, b);
            assert_ne!(a, c);
        }
    }

    #[test]
    fn test_invalid_input_gives_empty_buffer() {
        let synth = Synth::new(44100);
        let mut noise = NoiseSource::seeded(0);
        assert!(synth.render(&PIANO, 0.0, 100, &mut noise).is_empty());
        assert!(synth.render(&PIANO, -440.0, 100, &mut noise).is_empty());
        assert!(synth.render(&PIANO, f32::NAN, 100, &mut noise).is_empty());
        assert!(synth.render(&PIANO, f32::INFINITY, 100, &mut noise).is_empty());
        assert!(synth.render(&PIANO, 440.0, 0, &mut noise).is_empty());
    }

    #[test]
    fn test_piano_decays() {
        let buffer = synthesize(&PIANO, 261.63, 1200);
        let early = buffer.samples[441..4410].iter().map(|s| s.unsigned_abs()).max().unwrap();
        let late = buffer.samples[48000..].iter().map(|s| s.unsigned_abs()).max().unwrap();
        assert!(late < early / 4);
    }

    #[test]
    fn test_mix_at_grows_and_saturates() {
        let mut track = NoteBuffer {
            samples: vec![30000, 30000],
            sample_rate_hz: 44100,
        };
        let hit = NoteBuffer {
            samples: vec![10000, -10000, 5],
            sample_rate_hz: 44100,
        };
        track.mix_at(1, &hit);
        assert_eq!(track.samples, vec![30000, 32767, -10000, 5]);

        let mut low = NoteBuffer {
            samples: vec![-30000],
            sample_rate_hz: 44100,
        };
        low.mix_at(
            0,
            &NoteBuffer {
                samples: vec![-30000],
                sample_rate_hz: 44100,
            },
        );
        assert_eq!(low.samples, vec![-32767]);
    }

    #[test]
    fn test_duration() {
        let buffer = NoteBuffer {
            samples: vec![0; 22050],
            sample_rate_hz: 44100,
        };
        assert_eq!(buffer.duration(), Duration::from_millis(500));
        assert_eq!(NoteBuffer::silent(44100).duration(), Duration::ZERO);
    }
}
