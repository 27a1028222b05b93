//! Flood fill for coloring pages.
//!
//! Breadth-first recoloring of 4-connected similar-colored regions, bounded by
//! a pixel budget and a capped work queue, with cooperative cancellation.

mod color;
mod engine;
mod page;
mod queue;
mod raster;
mod worker;

// Re-export public types
pub use color::{is_blank, is_similar};
pub use engine::{fill, FillEngine, FillOutcome, FillRequest, SkipReason};
pub use page::ColoringPage;
pub use queue::{Backpressure, BoundedQueue, PushResult};
pub use raster::{PixelBuffer, Raster};
pub use worker::{CancelToken, FillReport, FillWorker};

/// Errors that abort a fill (partial mutation stays in the image)
#[derive(Debug, thiserror::Error)]
pub enum FillError {
    #[error("pixel ({x}, {y}) is unavailable in a {width}x{height} raster")]
    PixelUnavailable {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    #[error("raster buffer holds {actual} bytes, expected {expected} for {width}x{height} RGBA")]
    CorruptRaster {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("canvas lock poisoned by a panicked fill")]
    CanvasPoisoned,

    #[error("invalid fill config: {0}")]
    InvalidConfig(String),
}
