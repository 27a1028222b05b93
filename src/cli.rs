//! Command-line argument parsing.

use clap::{Parser, Subcommand};
use image::Rgba;
use std::path::PathBuf;

use crate::audio::{notes, AudioError, Instrument, MaracaSide, RhythmPattern};
use crate::fill::Backpressure;
use crate::params::{audio_constants, FillConfig, SynthConfig};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "playroom")]
#[command(about = "Coloring-page flood fill and toy instrument synthesis", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Flood-fill a region of an image from a seed pixel
    Fill(FillArgs),
    /// Render one instrument note
    Note(NoteArgs),
    /// Render a maraca rhythm pattern
    Rhythm(RhythmArgs),
}

#[derive(clap::Args, Debug)]
pub struct FillArgs {
    /// Image to fill (any format the image crate reads)
    pub input: PathBuf,

    /// Where to save the filled image
    pub output: PathBuf,

    /// Seed column (pixels)
    #[arg(long, allow_negative_numbers = true)]
    pub x: i32,

    /// Seed row (pixels)
    #[arg(long, allow_negative_numbers = true)]
    pub y: i32,

    /// Fill color as RRGGBB or RRGGBBAA hex
    #[arg(long, value_name = "HEX", default_value = "FF0000")]
    pub color: String,

    /// Per-channel RGB tolerance
    #[arg(long, default_value = "50")]
    pub tolerance: u8,

    /// Maximum pixels to recolor (default: a quarter of the image)
    #[arg(long, value_name = "PIXELS")]
    pub budget: Option<usize>,

    /// Work queue capacity
    #[arg(long, value_name = "ENTRIES", default_value = "5000")]
    pub queue_cap: usize,

    /// Evict the oldest queued pixel instead of dropping new ones when full
    #[arg(long)]
    pub drop_oldest: bool,

    /// Refuse to start on a pixel that is not blank (coloring-page mode)
    #[arg(long)]
    pub blank_only: bool,
}

impl FillArgs {
    /// Fill configuration with command-line overrides applied
    pub fn fill_config(&self) -> FillConfig {
        let base = if self.blank_only {
            FillConfig::coloring_page()
        } else {
            FillConfig::default()
        };
        FillConfig {
            tolerance: self.tolerance,
            pixel_budget: self.budget,
            queue_capacity: self.queue_cap,
            backpressure: if self.drop_oldest {
                Backpressure::DropOldest
            } else {
                Backpressure::DropNewest
            },
            ..base
        }
    }

    pub fn parse_color(&self) -> Result<Rgba<u8>, String> {
        parse_hex_color(&self.color)
    }
}

#[derive(clap::Args, Debug)]
pub struct NoteArgs {
    /// piano, flute, soft-flute, harmonica, trumpet, xylophone, harp, maraca, bell
    pub instrument: String,

    /// Key name (C, F#, Bb, Sa...), a frequency in Hz, or a side for maraca
    pub note: String,

    /// Note length (default: the instrument's own length)
    #[arg(long, value_name = "MS")]
    pub duration_ms: Option<u32>,

    #[command(flatten)]
    pub output: OutputArgs,
}

impl NoteArgs {
    pub fn parse_instrument(&self) -> Result<Instrument, AudioError> {
        self.instrument.parse()
    }

    /// Frequency of the requested note on `instrument`
    ///
    /// Accepts a key from the instrument's table or a plain frequency.
    pub fn parse_frequency(&self, instrument: Instrument) -> Result<f32, AudioError> {
        if let Some(hz) = notes::frequency(instrument, &self.note) {
            return Ok(hz);
        }
        match self.note.trim().parse::<f32>() {
            Ok(hz) if hz.is_finite() && hz > 0.0 => Ok(hz),
            _ => Err(AudioError::UnknownNote {
                instrument,
                note: self.note.clone(),
            }),
        }
    }

    pub fn parse_side(&self) -> Result<MaracaSide, AudioError> {
        self.note.parse()
    }
}

#[derive(clap::Args, Debug)]
pub struct RhythmArgs {
    /// salsa, samba, rumba or cha-cha
    pub pattern: String,

    #[command(flatten)]
    pub output: OutputArgs,
}

impl RhythmArgs {
    pub fn parse_pattern(&self) -> Result<RhythmPattern, AudioError> {
        self.pattern.parse()
    }
}

/// Where rendered audio goes
#[derive(clap::Args, Debug)]
pub struct OutputArgs {
    /// Write the rendered audio to a 16-bit mono WAV file
    #[arg(long, value_name = "PATH")]
    pub wav: Option<PathBuf>,

    /// Play through the default output device (needs the `playback` feature)
    #[arg(long)]
    pub play: bool,

    /// Seed for breath and shaker noise (reproducible output)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Render sample rate
    #[arg(long, value_name = "HZ", default_value_t = audio_constants::SAMPLE_RATE_HZ)]
    pub sample_rate: u32,
}

impl OutputArgs {
    pub fn synth_config(&self) -> SynthConfig {
        SynthConfig {
            sample_rate_hz: self.sample_rate,
            noise_seed: self.seed,
        }
    }
}

/// Parse `RRGGBB` or `RRGGBBAA` (optionally prefixed with `#`) into a color
pub fn parse_hex_color(text: &str) -> Result<Rgba<u8>, String> {
    let hex = text.trim().trim_start_matches('#');
    if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
        return Err(format!("Expected RRGGBB or RRGGBBAA, got '{}'", text));
    }

    let channel = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16)
            .map_err(|_| format!("Invalid hex digits in color '{}'", text))
    };
    let alpha = if hex.len() == 8 { channel(6)? } else { 255 };
    Ok(Rgba([channel(0)?, channel(2)?, channel(4)?, alpha]))
}
