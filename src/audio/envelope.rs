//! Amplitude envelopes.
//!
//! Each instrument shapes its note with one of a few curves. All of them are
//! evaluated from the time since note-on and the total note length, so a
//! note always fades out by its own end.

use std::f32::consts::PI;

/// Amplitude-over-time shape of a note
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Envelope {
    /// Smoothstep attack, gently wobbling sustain, smoothstep release
    ///
    /// The release occupies the last `release_s` of the note.
    Smooth { attack_s: f32, release_s: f32 },

    /// Linear attack, flat plateau, exponential release
    ///
    /// The plateau lasts until `hold_fraction` of the note; the release then
    /// decays as e^(-decay_rate * progress) over the remainder.
    AttackHoldDecay {
        attack_s: f32,
        hold_fraction: f32,
        decay_rate: f32,
    },

    /// Optional short linear attack, then e^(-decay_rate * t) with no sustain
    Percussive { attack_s: f32, decay_rate: f32 },

    /// Sine swell, wobbling sustain, cosine release (breathy wind sound)
    SineSwell {
        attack_s: f32,
        sustain_fraction: f32,
        wobble_hz: f32,
        wobble_depth: f32,
    },

    /// Straight line from 1 down to 0 over the note
    Fade,
}

/// Depth of the slow sustain wobble in `Smooth`
const SMOOTH_WOBBLE_DEPTH: f32 = 0.01;
/// Rate of the slow sustain wobble in `Smooth` (Hz)
const SMOOTH_WOBBLE_HZ: f32 = 0.3;

/// Hermite ease `x²(3 − 2x)` on a clamped input
pub fn smoothstep(x: f32) -> f32 {
    let x = x.clamp(0.0, 1.0);
    x * x * (3.0 - 2.0 * x)
}

impl Envelope {
    /// Envelope level at `t` seconds into a note lasting `duration_s`
    ///
    /// Always >= 0; only the sustain wobble of `Smooth` exceeds 1 (by 1%).
    pub fn level(&self, t: f32, duration_s: f32) -> f32 {
        if t < 0.0 || t >= duration_s {
            return 0.0;
        }

        let level = match *self {
            Envelope::Smooth {
                attack_s,
                release_s,
            } => {
                let attack = attack_s.min(duration_s * 0.5);
                let release_start = (duration_s - release_s).max(attack);
                if t < attack {
                    smoothstep(t / attack)
                } else if t < release_start {
                    1.0 + SMOOTH_WOBBLE_DEPTH * (2.0 * PI * SMOOTH_WOBBLE_HZ * t).sin()
                } else {
                    smoothstep((duration_s - t) / (duration_s - release_start))
                }
            }

            Envelope::AttackHoldDecay {
                attack_s,
                hold_fraction,
                decay_rate,
            } => {
                let hold_end = duration_s * hold_fraction;
                if t < attack_s {
                    t / attack_s
                } else if t < hold_end {
                    1.0
                } else {
                    let release = (duration_s - hold_end).max(f32::EPSILON);
                    (-((t - hold_end) / release) * decay_rate).exp()
                }
            }

            Envelope::Percussive {
                attack_s,
                decay_rate,
            } => {
                if t < attack_s {
                    t / attack_s
                } else {
                    (-(t - attack_s) * decay_rate).exp()
                }
            }

            Envelope::SineSwell {
                attack_s,
                sustain_fraction,
                wobble_hz,
                wobble_depth,
            } => {
                let release_start = duration_s * sustain_fraction;
                let level = if t < attack_s {
                    (PI * t / (2.0 * attack_s)).sin()
                } else if t < release_start {
                    1.0 - wobble_depth * (2.0 * PI * wobble_hz * t).sin()
                } else {
                    let release = (duration_s - release_start).max(f32::EPSILON);
                    (PI * (t - release_start) / (2.0 * release)).cos()
                };
                level.clamp(0.0, 1.0)
            }

            Envelope::Fade => 1.0 - t / duration_s,
        };

        level.max(0.0)
    }

    /// Envelope curve sampled over a whole note
    ///
    /// Useful for visualization or debugging.
    pub fn generate(&self, duration_s: f32, sample_rate_hz: u32) -> Vec<f32> {
        let num_samples = (duration_s * sample_rate_hz as f32) as usize;
        (0..num_samples)
            .map(|i| self.level(i as f32 / sample_rate_hz as f32, duration_s))
            .collect()
    }
}
