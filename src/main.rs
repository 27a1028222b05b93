//! Playroom - coloring pages and toy instruments
//!
//! Command-line harness for the flood-fill engine and the instrument
//! synthesizer: fill a region of an image, or render a note or rhythm to
//! WAV and (with the `playback` feature) the speakers.

use anyhow::{Context, Result};
use clap::Parser;
use std::time::Instant;

use playroom::audio::{
    self, dominant_frequency, render_pattern, render_shake, Instrument, NoteBuffer, Synth,
};
use playroom::cli::{Args, Command, FillArgs, NoteArgs, OutputArgs, RhythmArgs};
use playroom::fill::FillEngine;
use playroom::params::AnalysisConfig;

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    match args.command {
        Command::Fill(fill) => run_fill(&fill),
        Command::Note(note) => run_note(&note),
        Command::Rhythm(rhythm) => run_rhythm(&rhythm),
    }
}

fn run_fill(args: &FillArgs) -> Result<()> {
    let color = args.parse_color().map_err(anyhow::Error::msg)?;
    let engine = FillEngine::new(args.fill_config()).context("Invalid fill settings")?;

    let mut image = image::open(&args.input)
        .with_context(|| format!("Failed to open {}", args.input.display()))?
        .to_rgba8();
    println!(
        "Image: {} ({}x{})",
        args.input.display(),
        image.width(),
        image.height()
    );

    let start = Instant::now();
    let request = engine.request_for(&image, args.x, args.y, color);
    let outcome = engine.run(&mut image, &request, None)?;
    println!(
        "Fill at ({}, {}): {:?} in {:.1?}",
        args.x,
        args.y,
        outcome,
        start.elapsed()
    );
    if outcome.is_partial() {
        println!("Region only partially filled (budget {} pixels)", request.pixel_budget);
    }

    image
        .save(&args.output)
        .with_context(|| format!("Failed to save {}", args.output.display()))?;
    println!("Saved: {}", args.output.display());
    Ok(())
}

fn run_note(args: &NoteArgs) -> Result<()> {
    let instrument = args.parse_instrument()?;
    let synth = synth_for(&args.output)?;
    let mut noise = synth.noise_source();

    let buffer = if instrument == Instrument::Maraca {
        let side = args.parse_side()?;
        println!("Maraca: {:?} shake", side);
        render_shake(&synth, side, &mut noise)
    } else {
        let profile = instrument.profile();
        let hz = args.parse_frequency(instrument)?;
        let duration_ms = args.duration_ms.unwrap_or(profile.default_duration_ms);
        println!("{}: {} ({:.2} Hz) for {} ms", instrument, args.note, hz, duration_ms);
        synth.render(profile, hz, duration_ms, &mut noise)
    };

    report(&buffer);
    deliver(buffer, &args.output)
}

fn run_rhythm(args: &RhythmArgs) -> Result<()> {
    let pattern = args.parse_pattern()?;
    let synth = synth_for(&args.output)?;
    let mut noise = synth.noise_source();

    println!(
        "Rhythm: {} ({} hits over {} ms)",
        pattern,
        pattern.offsets_ms().len(),
        pattern.length_ms()
    );
    let buffer = render_pattern(&synth, pattern, &mut noise);

    report(&buffer);
    deliver(buffer, &args.output)
}

fn synth_for(output: &OutputArgs) -> Result<Synth> {
    let config = output.synth_config();
    config.validate().map_err(audio::AudioError::InvalidConfig)?;
    Ok(Synth::from_config(&config))
}

/// Print length, peak and detected pitch of a rendered buffer
fn report(buffer: &NoteBuffer) {
    println!(
        "Rendered: {} samples ({:.3}s @ {}Hz), peak {}",
        buffer.len(),
        buffer.duration().as_secs_f32(),
        buffer.sample_rate_hz,
        buffer.peak()
    );
    match dominant_frequency(buffer, &AnalysisConfig::default()) {
        Some(hz) => println!("Dominant frequency: {:.2} Hz", hz),
        None => println!("Dominant frequency: none (silent)"),
    }
}

/// Write and/or play a rendered buffer as requested
fn deliver(buffer: NoteBuffer, output: &OutputArgs) -> Result<()> {
    if let Some(path) = &output.wav {
        audio::write_wav(&buffer, path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("Saved: {}", path.display());
    }
    if output.play {
        play(buffer)?;
    }
    Ok(())
}

#[cfg(feature = "playback")]
fn play(buffer: NoteBuffer) -> Result<()> {
    use std::time::Duration;

    let system = audio::AudioSystem::new()?;
    let length = buffer.duration();
    system.play(buffer);

    // Let the stream drain; give up a little after the note should have ended
    let deadline = Instant::now() + length + Duration::from_millis(500);
    while system.is_playing() && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(20));
    }
    std::thread::sleep(Duration::from_millis(100));
    Ok(())
}

#[cfg(not(feature = "playback"))]
fn play(_buffer: NoteBuffer) -> Result<()> {
    Err(audio::AudioError::PlaybackDisabled.into())
}
