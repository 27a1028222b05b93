//! Maraca rhythms, shakes and the success chime.

use std::fmt;
use std::str::FromStr;

use super::envelope::Envelope;
use super::noise::NoiseSource;
use super::notes::{C5, E5, G5};
use super::profile::{Instrument, InstrumentProfile, Partial, MARACA};
use super::synthesis::{NoteBuffer, Synth};
use super::AudioError;

/// Dance rhythm played as a sequence of maraca hits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RhythmPattern {
    Salsa,
    Samba,
    Rumba,
    ChaCha,
}

impl RhythmPattern {
    pub const ALL: [RhythmPattern; 4] = [
        RhythmPattern::Salsa,
        RhythmPattern::Samba,
        RhythmPattern::Rumba,
        RhythmPattern::ChaCha,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RhythmPattern::Salsa => "salsa",
            RhythmPattern::Samba => "samba",
            RhythmPattern::Rumba => "rumba",
            RhythmPattern::ChaCha => "cha-cha",
        }
    }

    /// Hit start times from the beginning of the pattern (ms)
    pub fn offsets_ms(self) -> &'static [u32] {
        match self {
            RhythmPattern::Salsa => &[0, 200, 400, 700, 900, 1100],
            RhythmPattern::Samba => &[0, 150, 300, 600, 750, 900, 1200],
            RhythmPattern::Rumba => &[0, 300, 600, 800, 1100],
            RhythmPattern::ChaCha => &[0, 200, 400, 500, 700, 900, 1000, 1200],
        }
    }

    /// Shaker frequency of every hit (Hz)
    pub fn hit_hz(self) -> f32 {
        match self {
            RhythmPattern::Salsa => 900.0,
            RhythmPattern::Samba => 850.0,
            RhythmPattern::Rumba => 950.0,
            RhythmPattern::ChaCha => 800.0,
        }
    }

    /// Length of each hit (ms)
    pub fn hit_ms(self) -> u32 {
        match self {
            RhythmPattern::Salsa => 150,
            RhythmPattern::Samba => 120,
            RhythmPattern::Rumba => 180,
            RhythmPattern::ChaCha => 100,
        }
    }

    /// Time from the first hit to the end of the last one (ms)
    pub fn length_ms(self) -> u32 {
        self.offsets_ms().last().copied().unwrap_or(0) + self.hit_ms()
    }
}

impl fmt::Display for RhythmPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RhythmPattern {
    type Err = AudioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace(['_', ' '], "-");
        let wanted = if wanted == "chacha" { "cha-cha".to_string() } else { wanted };
        RhythmPattern::ALL
            .into_iter()
            .find(|p| p.name() == wanted)
            .ok_or_else(|| AudioError::UnknownPattern(s.to_string()))
    }
}

/// Which maraca was shaken
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaracaSide {
    Left,
    Right,
    Both,
    Center,
}

impl MaracaSide {
    /// Shaker frequencies sounded together for this side (Hz)
    pub fn frequencies(self) -> &'static [f32] {
        match self {
            MaracaSide::Left => &[800.0],
            MaracaSide::Right => &[1000.0],
            MaracaSide::Both => &[800.0, 1000.0],
            MaracaSide::Center => &[900.0],
        }
    }
}

impl FromStr for MaracaSide {
    type Err = AudioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "left" | "l" => Ok(MaracaSide::Left),
            "right" | "r" => Ok(MaracaSide::Right),
            "both" => Ok(MaracaSide::Both),
            "center" | "centre" | "c" => Ok(MaracaSide::Center),
            _ => Err(AudioError::UnknownNote {
                instrument: Instrument::Maraca,
                note: s.to_string(),
            }),
        }
    }
}

/// C major triad fading linearly to silence
pub static CHIME: InstrumentProfile = InstrumentProfile {
    name: "chime",
    fundamental: 1.0,
    partials: &[Partial::steady(E5 / C5, 1.0), Partial::steady(G5 / C5, 1.0)],
    envelope: Envelope::Fade,
    vibrato: None,
    tremolo: None,
    pitch_bend: None,
    reed_buzz: None,
    noise: None,
    output_gain: 0.2,
    default_note_hz: C5,
    default_duration_ms: 300,
};

/// Mix every hit of `pattern` into one buffer
pub fn render_pattern(
    synth: &Synth,
    pattern: RhythmPattern,
    noise: &mut NoiseSource,
) -> NoteBuffer {
    let mut track = NoteBuffer::silent(synth.sample_rate_hz());
    for &offset_ms in pattern.offsets_ms() {
        let hit = synth.render(&MARACA, pattern.hit_hz(), pattern.hit_ms(), noise);
        track.mix_at(synth.sample_count(offset_ms), &hit);
    }
    log::debug!(
        "Rendered {} rhythm: {} hits, {} samples",
        pattern,
        pattern.offsets_ms().len(),
        track.len()
    );
    track
}

/// One shake of the chosen maraca(s)
pub fn render_shake(synth: &Synth, side: MaracaSide, noise: &mut NoiseSource) -> NoteBuffer {
    let mut shake = NoteBuffer::silent(synth.sample_rate_hz());
    for &hz in side.frequencies() {
        let hit = synth.render(&MARACA, hz, MARACA.default_duration_ms, noise);
        shake.mix_at(0, &hit);
    }
    shake
}

/// Short rising triad played when a game is won
pub fn success_chime(synth: &Synth) -> NoteBuffer {
    // Chime is noise-free, so any source will do
    let mut noise = NoiseSource::seeded(0);
    synth.render(&CHIME, CHIME.default_note_hz, CHIME.default_duration_ms, &mut noise)
}
