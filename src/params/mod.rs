//! Parameter definitions with physical units and documented semantics.
//!
//! All tuning constants live here with:
//! - Units (pixels, Hz, milliseconds, etc.)
//! - Documented ranges and meanings
//! - Validation where a bad value would break an invariant

mod audio;
mod fill;

// Re-export all types
pub use audio::{audio_constants, AnalysisConfig, SynthConfig};
pub use fill::FillConfig;
