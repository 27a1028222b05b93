//! Live output stream driving a [`Voice`].

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use super::synthesis::NoteBuffer;
use super::voice::Voice;
use super::AudioError;

/// Default output device playing one voice
pub struct AudioSystem {
    voice: Voice,

    /// Audio output stream (kept alive)
    _stream: cpal::Stream,

    device_rate_hz: u32,
}

impl AudioSystem {
    /// Open the default output device and start streaming silence
    pub fn new() -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(AudioError::NoOutputDevice)?;

        let config = device.default_output_config()?;
        let device_rate_hz = config.sample_rate().0;
        let channels = config.channels() as usize;

        log::info!(
            "Audio: {} @ {}Hz, {} channel(s)",
            device.name().unwrap_or_else(|_| "Unknown".to_string()),
            device_rate_hz,
            channels
        );

        let voice = Voice::new();
        let callback_voice = voice.clone();

        let stream = device.build_output_stream(
            &config.into(),
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                callback_voice.fill_output(data, channels, device_rate_hz);
            },
            |err| log::warn!("Audio stream error: {}", err),
            None,
        )?;
        stream.play()?;

        Ok(Self {
            voice,
            _stream: stream,
            device_rate_hz,
        })
    }

    /// Play a note, cutting off the previous one
    pub fn play(&self, note: NoteBuffer) {
        self.voice.play(note);
    }

    pub fn stop(&self) {
        self.voice.stop();
    }

    pub fn is_playing(&self) -> bool {
        self.voice.is_playing()
    }

    pub fn device_rate_hz(&self) -> u32 {
        self.device_rate_hz
    }

    /// Handle to the voice (for callers that keep their own reference)
    pub fn voice(&self) -> &Voice {
        &self.voice
    }
}
