//! Note name to frequency tables, one per instrument.
//!
//! Timbre lives in `profile`; these tables only say which pitches each
//! instrument's keys produce. Names are matched case-insensitively, and the
//! octave-up C of the diatonic scales is spelled `C2`.

use super::profile::Instrument;

pub const C4: f32 = 261.63;
pub const C_SHARP4: f32 = 277.18;
pub const D4: f32 = 293.66;
pub const D_SHARP4: f32 = 311.13;
pub const E4: f32 = 329.63;
pub const F4: f32 = 349.23;
pub const F_SHARP4: f32 = 369.99;
pub const G4: f32 = 392.00;
pub const G_SHARP4: f32 = 415.30;
pub const A4: f32 = 440.00;
pub const A_SHARP4: f32 = 466.16;
pub const B4: f32 = 493.88;
pub const C5: f32 = 523.25;
pub const D5: f32 = 587.33;
pub const E5: f32 = 659.25;
pub const F5: f32 = 698.46;
pub const G5: f32 = 783.99;
pub const A5: f32 = 880.00;
pub const B5: f32 = 987.77;
pub const C6: f32 = 1046.50;
pub const F_SHARP5: f32 = 739.99;

/// (name, frequency in Hz)
pub type NoteTable = &'static [(&'static str, f32)];

const PIANO_NOTES: NoteTable = &[
    ("C", C4),
    ("C#", C_SHARP4),
    ("D", D4),
    ("D#", D_SHARP4),
    ("E", E4),
    ("F", F4),
    ("F#", F_SHARP4),
    ("G", G4),
    ("G#", G_SHARP4),
    ("A", A4),
    ("A#", A_SHARP4),
    ("B", B4),
    ("C2", C5),
];

const FLUTE_NOTES: NoteTable = &[
    ("C", C4),
    ("D", D4),
    ("Eb", D_SHARP4),
    ("E", E4),
    ("F", F4),
    ("F#", F_SHARP4),
    ("G", G4),
    ("A", A4),
    ("Bb", A_SHARP4),
    ("B", B4),
    ("C2", C5),
];

/// Blow and draw reeds of a G harmonica
const HARMONICA_NOTES: NoteTable = &[
    ("G", G4),
    ("B", B4),
    ("C", C5),
    ("D", D5),
    ("E", E5),
    ("F", F5),
    ("F#", F_SHARP5),
    ("A", A5),
];

const TRUMPET_NOTES: NoteTable = &[
    ("C", C4),
    ("D", D4),
    ("E", E4),
    ("F", F4),
    ("F#", F_SHARP4),
    ("G", G4),
    ("A", A4),
    ("Bb", A_SHARP4),
    ("B", B4),
    ("C2", C5),
];

/// One octave up from the piano
const XYLOPHONE_NOTES: NoteTable = &[
    ("C", C5),
    ("D", D5),
    ("E", E5),
    ("F", F5),
    ("G", G5),
    ("A", A5),
    ("B", B5),
    ("C2", C6),
];

/// Sargam over an octave and a half; `'` marks the upper octave
const SOFT_FLUTE_NOTES: NoteTable = &[
    ("Sa", C4),
    ("Re", D4),
    ("Ga", E4),
    ("Ma", F4),
    ("Pa", G4),
    ("Dha", A4),
    ("Ni", B4),
    ("Sa'", C5),
    ("Re'", D5),
    ("Ga'", E5),
    ("Ma'", F5),
    ("Pa'", G5),
];

/// Sargam syllables on a C tonic
const HARP_NOTES: NoteTable = &[
    ("Sa", C4),
    ("Re", D4),
    ("Ga", E4),
    ("Ma", F4),
    ("Pa", G4),
    ("Dha", A4),
    ("Ni", B4),
];

/// Keys available on an instrument, in scale order
pub fn scale(instrument: Instrument) -> NoteTable {
    match instrument {
        Instrument::Piano | Instrument::Bell => PIANO_NOTES,
        Instrument::Flute => FLUTE_NOTES,
        Instrument::SoftFlute => SOFT_FLUTE_NOTES,
        Instrument::Harmonica => HARMONICA_NOTES,
        Instrument::Trumpet => TRUMPET_NOTES,
        Instrument::Xylophone => XYLOPHONE_NOTES,
        Instrument::Harp => HARP_NOTES,
        // Shaker pitch comes from `MaracaSide`
        Instrument::Maraca => &[],
    }
}

/// Frequency of a named key, if the instrument has it
///
/// Unicode accidentals (♯ ♭) are accepted as well as `#` and `b`.
pub fn frequency(instrument: Instrument, name: &str) -> Option<f32> {
    let wanted = normalize(name);
    scale(instrument)
        .iter()
        .find(|(note, _)| normalize(note) == wanted)
        .map(|&(_, hz)| hz)
}

/// Frequency of a named key, falling back to the instrument's default pitch
pub fn resolve(instrument: Instrument, name: &str) -> f32 {
    frequency(instrument, name).unwrap_or_else(|| {
        let hz = instrument.profile().default_note_hz;
        log::debug!("No note {:?} on {}, using {} Hz", name, instrument, hz);
        hz
    })
}

fn normalize(name: &str) -> String {
    name.trim()
        .replace('♯', "#")
        .replace('♭', "b")
        .to_lowercase()
}
