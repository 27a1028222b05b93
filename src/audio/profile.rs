//! Instrument profile registry.
//!
//! Every playable instrument is described declaratively here: which partials
//! it has, how its amplitude evolves, and how it is modulated. Which notes an
//! instrument can play lives separately in `notes`.

use std::fmt;
use std::str::FromStr;

use super::envelope::Envelope;
use super::AudioError;

/// How a partial's level varies over the note (on top of the note envelope)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PartialShaping {
    /// Constant weight
    Steady,
    /// Weight scaled by the envelope a second time (fades faster than the body)
    Enveloped,
    /// Weight multiplied by sin(2π·rate·t) (shimmer)
    Pulsed { rate_hz: f32 },
}

/// One sinusoidal component at `ratio` × the fundamental
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Partial {
    /// Frequency ratio to the fundamental (near-integer, slightly detuned for realism)
    pub ratio: f32,
    /// Amplitude relative to the fundamental
    pub weight: f32,
    pub shaping: PartialShaping,
}

impl Partial {
    pub const fn steady(ratio: f32, weight: f32) -> Self {
        Self {
            ratio,
            weight,
            shaping: PartialShaping::Steady,
        }
    }

    pub const fn enveloped(ratio: f32, weight: f32) -> Self {
        Self {
            ratio,
            weight,
            shaping: PartialShaping::Enveloped,
        }
    }

    pub const fn pulsed(ratio: f32, weight: f32, rate_hz: f32) -> Self {
        Self {
            ratio,
            weight,
            shaping: PartialShaping::Pulsed { rate_hz },
        }
    }
}

/// Frequency modulation: instantaneous frequency × (1 + depth·sin(2π·rate·t))
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vibrato {
    pub rate_hz: f32,
    pub depth: f32,
    /// Time for the depth to ramp in from zero (seconds, 0 = immediate)
    pub ramp_s: f32,
}

/// Amplitude modulation: × (1 + depth·ramp·sin(2π·rate·t)·e^(-decay·t))
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tremolo {
    pub rate_hz: f32,
    pub depth: f32,
    /// Decay rate of the modulation depth (1/s, 0 = constant)
    pub decay: f32,
    /// Time for the depth to ramp in from zero (seconds, 0 = immediate)
    pub ramp_s: f32,
}

/// Pluck pitch drop: fundamental frequency × (1 + depth·e^(-decay·t))
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchBend {
    pub depth: f32,
    pub decay: f32,
}

/// Reed buzz: fundamental × (1 + depth·sin(ratio × fundamental phase))
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReedBuzz {
    pub ratio: f32,
    pub depth: f32,
}

/// Random component mixed into the timbre
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NoiseShape {
    /// Uniform breath noise of `amount`, scaled by the envelope
    Breath { amount: f32 },
    /// Noise ring-modulated by the fundamental plus a randomly gated rattle at 2×
    Shaker { ring: f32, rattle: f32 },
}

/// Complete synthesis parameters for one instrument
#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentProfile {
    pub name: &'static str,
    /// Weight of the fundamental sinusoid (0 for pure-noise instruments)
    pub fundamental: f32,
    pub partials: &'static [Partial],
    pub envelope: Envelope,
    pub vibrato: Option<Vibrato>,
    pub tremolo: Option<Tremolo>,
    pub pitch_bend: Option<PitchBend>,
    pub reed_buzz: Option<ReedBuzz>,
    pub noise: Option<NoiseShape>,
    /// Final scale before 16-bit conversion (headroom against constructive sums)
    pub output_gain: f32,
    /// Frequency used when a note name is not in the instrument's table (Hz)
    pub default_note_hz: f32,
    /// Length of a tapped note (ms)
    pub default_duration_ms: u32,
}

impl InstrumentProfile {
    /// True when output depends on the noise source
    pub fn is_noisy(&self) -> bool {
        self.noise.is_some()
    }

    /// Worst-case amplitude before the output gain, if all components align
    pub fn peak_sum(&self) -> f32 {
        let buzz = self.reed_buzz.map_or(0.0, |b| b.depth);
        let noise = match self.noise {
            Some(NoiseShape::Breath { amount }) => amount * 0.5,
            Some(NoiseShape::Shaker { ring, rattle }) => ring * 0.5 + rattle,
            None => 0.0,
        };
        self.fundamental * (1.0 + buzz)
            + self.partials.iter().map(|p| p.weight.abs()).sum::<f32>()
            + noise
    }
}

pub static PIANO: InstrumentProfile = InstrumentProfile {
    name: "piano",
    fundamental: 1.0,
    partials: &[
        Partial::steady(2.01, 0.4),
        Partial::steady(3.02, 0.25),
        Partial::steady(4.03, 0.15),
    ],
    envelope: Envelope::Percussive {
        attack_s: 0.01,
        decay_rate: 2.5,
    },
    vibrato: None,
    tremolo: None,
    pitch_bend: None,
    reed_buzz: None,
    noise: None,
    output_gain: 0.3,
    default_note_hz: 440.0,
    default_duration_ms: 1200,
};

pub static FLUTE: InstrumentProfile = InstrumentProfile {
    name: "flute",
    fundamental: 1.0,
    partials: &[Partial::steady(3.0, 0.25), Partial::steady(5.0, 0.15)],
    envelope: Envelope::SineSwell {
        attack_s: 0.08,
        sustain_fraction: 0.75,
        wobble_hz: 2.0,
        wobble_depth: 0.1,
    },
    vibrato: None,
    tremolo: None,
    pitch_bend: None,
    reed_buzz: None,
    noise: Some(NoiseShape::Breath { amount: 0.06 }),
    output_gain: 0.35,
    default_note_hz: 523.25,
    default_duration_ms: 1000,
};

/// Long, pure flute voice for the dedicated flute screen
pub static SOFT_FLUTE: InstrumentProfile = InstrumentProfile {
    name: "soft-flute",
    fundamental: 0.8,
    partials: &[Partial::enveloped(2.0, 0.12)],
    envelope: Envelope::Smooth {
        attack_s: 0.4,
        release_s: 0.6,
    },
    vibrato: None,
    // Gentle 5 Hz wobble fading in over the first 0.8 s
    tremolo: Some(Tremolo {
        rate_hz: 5.0,
        depth: 0.008,
        decay: 0.0,
        ramp_s: 0.8,
    }),
    pitch_bend: None,
    reed_buzz: None,
    noise: None,
    output_gain: 0.49,
    default_note_hz: 523.25,
    default_duration_ms: 1500,
};

pub static HARMONICA: InstrumentProfile = InstrumentProfile {
    name: "harmonica",
    fundamental: 1.0,
    partials: &[Partial::steady(2.0, 0.7), Partial::steady(3.0, 0.5)],
    envelope: Envelope::AttackHoldDecay {
        attack_s: 0.05,
        hold_fraction: 0.8,
        decay_rate: 5.0,
    },
    vibrato: None,
    tremolo: Some(Tremolo {
        rate_hz: 4.5,
        depth: 0.03,
        decay: 0.0,
        ramp_s: 0.0,
    }),
    pitch_bend: None,
    reed_buzz: Some(ReedBuzz {
        ratio: 8.0,
        depth: 0.1,
    }),
    noise: None,
    output_gain: 0.35,
    default_note_hz: 440.0,
    default_duration_ms: 800,
};

pub static TRUMPET: InstrumentProfile = InstrumentProfile {
    name: "trumpet",
    fundamental: 1.0,
    partials: &[
        Partial::steady(2.0, 0.8),
        Partial::steady(3.0, 0.6),
        Partial::steady(4.0, 0.4),
        Partial::steady(5.0, 0.3),
        // Brass brightness
        Partial::enveloped(6.0, 0.2),
    ],
    envelope: Envelope::AttackHoldDecay {
        attack_s: 0.1,
        hold_fraction: 0.7,
        decay_rate: 3.0,
    },
    vibrato: None,
    tremolo: None,
    pitch_bend: None,
    reed_buzz: None,
    noise: None,
    output_gain: 0.4,
    default_note_hz: 440.0,
    default_duration_ms: 1000,
};

pub static XYLOPHONE: InstrumentProfile = InstrumentProfile {
    name: "xylophone",
    fundamental: 1.0,
    partials: &[
        Partial::steady(2.0, 0.3),
        Partial::steady(3.0, 0.2),
        Partial::steady(4.0, 0.15),
        // Wood resonance below the struck pitch
        Partial::enveloped(0.5, 0.1),
    ],
    envelope: Envelope::Percussive {
        attack_s: 0.0,
        decay_rate: 3.5,
    },
    vibrato: None,
    tremolo: None,
    pitch_bend: None,
    reed_buzz: None,
    noise: None,
    output_gain: 0.5,
    default_note_hz: 523.25,
    default_duration_ms: 800,
};

pub static HARP: InstrumentProfile = InstrumentProfile {
    name: "harp",
    fundamental: 1.0,
    partials: &[
        Partial::steady(2.0, 0.5),
        Partial::steady(3.0, 0.33),
        Partial::steady(4.0, 0.25),
    ],
    envelope: Envelope::Percussive {
        attack_s: 0.0,
        decay_rate: 2.2,
    },
    vibrato: None,
    tremolo: Some(Tremolo {
        rate_hz: 6.0,
        depth: 0.05,
        decay: 3.0,
        ramp_s: 0.0,
    }),
    pitch_bend: Some(PitchBend {
        depth: 0.02,
        decay: 10.0,
    }),
    reed_buzz: None,
    noise: None,
    output_gain: 0.4,
    default_note_hz: 440.0,
    default_duration_ms: 1500,
};

pub static MARACA: InstrumentProfile = InstrumentProfile {
    name: "maraca",
    fundamental: 0.0,
    partials: &[],
    envelope: Envelope::Percussive {
        attack_s: 0.0,
        decay_rate: 8.0,
    },
    vibrato: None,
    tremolo: None,
    pitch_bend: None,
    reed_buzz: None,
    noise: Some(NoiseShape::Shaker {
        ring: 0.7,
        rattle: 0.3,
    }),
    output_gain: 0.6,
    default_note_hz: 900.0,
    default_duration_ms: 200,
};

pub static BELL: InstrumentProfile = InstrumentProfile {
    name: "bell",
    fundamental: 1.0,
    partials: &[
        // Inharmonic bell partials
        Partial::steady(2.76, 0.6),
        Partial::steady(5.40, 0.4),
        Partial::pulsed(16.2, 0.15, 5.0),
    ],
    envelope: Envelope::Percussive {
        attack_s: 0.0,
        decay_rate: 0.8,
    },
    vibrato: None,
    tremolo: None,
    pitch_bend: None,
    reed_buzz: None,
    noise: None,
    output_gain: 0.4,
    default_note_hz: 523.25,
    default_duration_ms: 2000,
};

/// Playable instruments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instrument {
    Piano,
    Flute,
    SoftFlute,
    Harmonica,
    Trumpet,
    Xylophone,
    Harp,
    Maraca,
    Bell,
}

impl Instrument {
    pub const ALL: [Instrument; 9] = [
        Instrument::Piano,
        Instrument::Flute,
        Instrument::SoftFlute,
        Instrument::Harmonica,
        Instrument::Trumpet,
        Instrument::Xylophone,
        Instrument::Harp,
        Instrument::Maraca,
        Instrument::Bell,
    ];

    /// Synthesis parameters for this instrument
    pub fn profile(self) -> &'static InstrumentProfile {
        match self {
            Instrument::Piano => &PIANO,
            Instrument::Flute => &FLUTE,
            Instrument::SoftFlute => &SOFT_FLUTE,
            Instrument::Harmonica => &HARMONICA,
            Instrument::Trumpet => &TRUMPET,
            Instrument::Xylophone => &XYLOPHONE,
            Instrument::Harp => &HARP,
            Instrument::Maraca => &MARACA,
            Instrument::Bell => &BELL,
        }
    }

    pub fn name(self) -> &'static str {
        self.profile().name
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Instrument {
    type Err = AudioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        Instrument::ALL
            .into_iter()
            .find(|i| i.name() == wanted)
            .ok_or_else(|| AudioError::UnknownInstrument(s.to_string()))
    }
}
