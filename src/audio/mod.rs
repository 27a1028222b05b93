//! Instrument synthesis, analysis and playback.
//!
//! Notes are rendered offline into 16-bit PCM buffers by [`Synth`]. A
//! rendered note can be analyzed, written to WAV, or handed to a [`Voice`]
//! for playback (live output needs the `playback` feature).

pub mod analysis;
pub mod envelope;
pub mod export;
pub mod noise;
pub mod notes;
pub mod profile;
pub mod rhythm;
pub mod synthesis;
#[cfg(feature = "playback")]
pub mod system;
pub mod voice;

// Re-export main types
pub use analysis::dominant_frequency;
pub use envelope::Envelope;
pub use export::write_wav;
pub use noise::NoiseSource;
pub use profile::{Instrument, InstrumentProfile};
pub use rhythm::{render_pattern, render_shake, success_chime, MaracaSide, RhythmPattern};
pub use synthesis::{synthesize, NoteBuffer, Synth};
#[cfg(feature = "playback")]
pub use system::AudioSystem;
pub use voice::Voice;

/// Errors from audio output, export and name lookup
///
/// Rendering itself never fails; bad input renders silence.
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("no audio output device found")]
    NoOutputDevice,

    #[cfg(feature = "playback")]
    #[error("failed to get audio config: {0}")]
    DeviceConfig(#[from] cpal::DefaultStreamConfigError),

    #[cfg(feature = "playback")]
    #[error("failed to build audio stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[cfg(feature = "playback")]
    #[error("failed to start audio stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error("built without live playback (enable the `playback` feature)")]
    PlaybackDisabled,

    #[error("WAV export failed: {0}")]
    Wav(#[from] hound::Error),

    #[error("unknown instrument {0:?}")]
    UnknownInstrument(String),

    #[error("unknown note {note:?} for {instrument}")]
    UnknownNote { instrument: Instrument, note: String },

    #[error("unknown rhythm pattern {0:?}")]
    UnknownPattern(String),

    #[error("invalid audio config: {0}")]
    InvalidConfig(String),
}
