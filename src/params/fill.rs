//! Flood-fill budgets and similarity thresholds.
//!
//! The budget defaults were tuned on phone-sized bitmaps and are meant to be
//! retuned per target, not treated as fixed contracts.

use crate::fill::Backpressure;

/// Flood-fill configuration
#[derive(Debug, Clone)]
pub struct FillConfig {
    /// Per-channel RGB tolerance (0-255)
    /// A pixel matches when |r1-r2|, |g1-g2| and |b1-b2| are all within this
    pub tolerance: u8,

    /// Explicit pixel budget (pixels recolored per fill)
    /// None = image area / `budget_divisor`
    pub pixel_budget: Option<usize>,

    /// Divisor applied to the image area when no explicit budget is set
    /// Default 4 (a quarter of the image)
    pub budget_divisor: usize,

    /// Maximum pending entries in the work queue
    pub queue_capacity: usize,

    /// What happens to a push when the queue is full
    pub backpressure: Backpressure,

    /// Pixels with alpha below this are always fill candidates
    /// Lets line art on anti-aliased transparent backgrounds fill cleanly
    pub translucent_alpha: u8,

    /// Pixels processed between cancellation checks
    pub cancel_check_interval: usize,

    /// Only start a fill when the seed pixel is blank (near-white or translucent)
    /// Stops taps on outlines from recoloring the line art
    pub blank_seed_only: bool,
}

impl Default for FillConfig {
    fn default() -> Self {
        Self {
            tolerance: 50,
            pixel_budget: None,
            budget_divisor: 4,
            queue_capacity: 5000,
            backpressure: Backpressure::DropNewest,
            translucent_alpha: 128,
            cancel_check_interval: 1024,
            blank_seed_only: false,
        }
    }
}

impl FillConfig {
    /// Defaults used for coloring-page templates (seed guard enabled)
    pub fn coloring_page() -> Self {
        Self {
            blank_seed_only: true,
            ..Self::default()
        }
    }

    /// Pixel budget for an image of the given size (never 0)
    pub fn budget_for(&self, width: u32, height: u32) -> usize {
        let area = width as usize * height as usize;
        self.pixel_budget
            .unwrap_or(area / self.budget_divisor.max(1))
            .max(1)
    }

    /// Validate configuration (budgets and capacities must be > 0)
    pub fn validate(&self) -> Result<(), String> {
        if self.pixel_budget == Some(0) {
            return Err("Pixel budget must be > 0".to_string());
        }
        if self.budget_divisor == 0 {
            return Err("Budget divisor must be > 0".to_string());
        }
        if self.queue_capacity == 0 {
            return Err("Queue capacity must be > 0".to_string());
        }
        if self.cancel_check_interval == 0 {
            return Err("Cancel check interval must be > 0".to_string());
        }
        Ok(())
    }
}
