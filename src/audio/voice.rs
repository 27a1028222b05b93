//! Single-slot note player fed to the output stream.

use std::sync::{Arc, Mutex};

use super::synthesis::NoteBuffer;
use crate::params::audio_constants::PCM_FULL_SCALE;

/// Note currently sounding and how far into it playback is
#[derive(Debug, Default)]
struct Slot {
    note: Option<Arc<NoteBuffer>>,
    /// Read position in note samples (fractional when resampling)
    position: f64,
}

/// One-note-at-a-time player
///
/// Cloning gives another handle to the same slot, so the UI thread can call
/// `play` while the stream callback calls `fill_output`. Starting a note
/// cuts off whatever was playing.
#[derive(Debug, Clone, Default)]
pub struct Voice {
    slot: Arc<Mutex<Slot>>,
}

impl Voice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start `note` from the beginning, replacing the current one
    pub fn play(&self, note: NoteBuffer) {
        self.play_shared(Arc::new(note));
    }

    /// Like `play`, for a note that is reused (e.g. a cached key)
    pub fn play_shared(&self, note: Arc<NoteBuffer>) {
        match self.slot.lock() {
            Ok(mut slot) => {
                slot.note = (!note.is_empty()).then_some(note);
                slot.position = 0.0;
            }
            Err(_) => log::warn!("Voice lock poisoned; note dropped"),
        }
    }

    pub fn stop(&self) {
        if let Ok(mut slot) = self.slot.lock() {
            slot.note = None;
            slot.position = 0.0;
        }
    }

    pub fn is_playing(&self) -> bool {
        self.slot.lock().map(|slot| slot.note.is_some()).unwrap_or(false)
    }

    /// Fill an interleaved output block, resampling to `device_rate_hz`
    ///
    /// The mono note is copied to every channel. Frames past the end of the
    /// note, or with nothing playing, are silent.
    pub fn fill_output(&self, out: &mut [f32], channels: usize, device_rate_hz: u32) {
        out.fill(0.0);
        if channels == 0 || device_rate_hz == 0 {
            return;
        }
        let Ok(mut slot) = self.slot.lock() else {
            return;
        };
        let Some(note) = slot.note.clone() else {
            return;
        };

        let step = note.sample_rate_hz as f64 / device_rate_hz as f64;
        let samples = &note.samples;
        let mut position = slot.position;

        for frame in out.chunks_mut(channels) {
            let index = position as usize;
            if index >= samples.len() {
                break;
            }
            let frac = (position - index as f64) as f32;
            let current = samples[index] as f32;
            let next = samples.get(index + 1).map_or(0.0, |&s| s as f32);
            let value = (current + (next - current) * frac) / PCM_FULL_SCALE;

            frame.fill(value);
            position += step;
        }

        if position as usize >= samples.len() {
            slot.note = None;
            slot.position = 0.0;
        } else {
            slot.position = position;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(len: usize, rate: u32) -> NoteBuffer {
        NoteBuffer {
            samples: (0..len as i16).map(|i| (i % 32) * 1000).collect(),
            sample_rate_hz: rate,
        }
    }

    #[test]
    fn test_idle_voice_is_silent() {
        let voice = Voice::new();
        let mut out = [1.0f32; 8];
        voice.fill_output(&mut out, 2, 44100);
        assert!(out.iter().all(|&s| s == 0.0));
        assert!(!voice.is_playing());
    }

    #[test]
    fn test_plays_to_end_then_stops() {
        let voice = Voice::new();
        voice.play(ramp(4, 44100));
        assert!(voice.is_playing());

        let mut out = [9.0f32; 12];
        voice.fill_output(&mut out, 2, 44100);

        // Stereo copy of each sample, then silence
        let expected: Vec<f32> = [0.0, 1000.0, 2000.0, 3000.0]
            .iter()
            .flat_map(|&s| [s / 32767.0, s / 32767.0])
            .chain([0.0; 4])
            .collect();
        assert_eq!(out.to_vec(), expected);
        assert!(!voice.is_playing());
    }

    #[test]
    fn test_playback_continues_across_blocks() {
        let voice = Voice::new();
        voice.play(ramp(6, 44100));

        let mut first = [0.0f32; 3];
        voice.fill_output(&mut first, 1, 44100);
        let mut second = [0.0f32; 3];
        voice.fill_output(&mut second, 1, 44100);

        assert!((second[0] - 3000.0 / 32767.0).abs() < 1e-6);
        assert!(!voice.is_playing());
    }

    #[test]
    fn test_new_note_replaces_old() {
        let voice = Voice::new();
        voice.play(ramp(100, 44100));
        let mut out = [0.0f32; 10];
        voice.fill_output(&mut out, 1, 44100);

        voice.play(ramp(3, 44100));
        voice.fill_output(&mut out, 1, 44100);
        assert_eq!(out[0], 0.0);
        assert!((out[1] - 1000.0 / 32767.0).abs() < 1e-6);
        assert_eq!(out[3], 0.0);
    }

    #[test]
    fn test_resamples_to_device_rate() {
        let voice = Voice::new();
        voice.play(ramp(4, 22050));

        let mut out = [0.0f32; 8];
        voice.fill_output(&mut out, 1, 44100);

        // Half-rate note: every other output sample is interpolated
        assert!((out[1] - 500.0 / 32767.0).abs() < 1e-6);
        assert!((out[2] - 1000.0 / 32767.0).abs() < 1e-6);
        assert!(!voice.is_playing());
    }

    #[test]
    fn test_stop_and_empty_notes() {
        let voice = Voice::new();
        voice.play(ramp(100, 44100));
        voice.stop();
        assert!(!voice.is_playing());

        voice.play(NoteBuffer::silent(44100));
        assert!(!voice.is_playing());
    }
}
