//! Playroom library - coloring-page flood fill and toy instrument synthesis

pub mod audio;
pub mod cli;
pub mod fill;
pub mod params;
