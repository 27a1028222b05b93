//! Breadth-first flood fill with pixel and queue budgets.
//!
//! The fill recolors the 4-connected region of pixels similar to the seed
//! pixel. Two bounds keep the cost independent of the image:
//!
//! - **Pixel budget**: at most `pixel_budget` pixels are recolored. Once it is
//!   spent the fill stops and the region stays partially filled. On large
//!   bitmaps this is a visible limitation: a second tap finishes the job.
//! - **Queue capacity**: pending work lives in a [`BoundedQueue`]; pushes that
//!   do not fit follow the configured [`Backpressure`](super::Backpressure)
//!   policy, so the only allocation that scales with the image is the
//!   visited bitmap.

use image::Rgba;
use std::time::Instant;

use super::color::{is_blank, is_similar};
use super::queue::{BoundedQueue, PushResult};
use super::raster::Raster;
use super::worker::CancelToken;
use super::FillError;
use crate::params::FillConfig;

/// One fill operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillRequest {
    /// Seed column in image space (may be negative for off-image taps)
    pub seed_x: i32,
    /// Seed row in image space
    pub seed_y: i32,
    /// Per-channel RGB tolerance (0-255)
    pub tolerance: u8,
    /// Color written to every filled pixel
    pub color: Rgba<u8>,
    /// Maximum pixels recolored
    pub pixel_budget: usize,
}

/// Why a fill did not touch the image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    SeedOutOfBounds,
    /// Seed pixel already has the replacement color
    AlreadyFilled,
    /// Seed pixel is line art (blank-seed-only mode)
    SeedNotBlank,
}

/// How a fill ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillOutcome {
    Skipped(SkipReason),
    /// Every reachable candidate was recolored
    Completed { pixels: usize },
    /// Stopped with work pending because the pixel budget ran out
    BudgetExhausted { pixels: usize },
    /// Stopped because a newer request superseded this one
    Cancelled { pixels: usize },
}

impl FillOutcome {
    /// Number of pixels recolored
    pub fn pixels(&self) -> usize {
        match *self {
            FillOutcome::Skipped(_) => 0,
            FillOutcome::Completed { pixels }
            | FillOutcome::BudgetExhausted { pixels }
            | FillOutcome::Cancelled { pixels } => pixels,
        }
    }

    /// True when the region may be only partially filled
    pub fn is_partial(&self) -> bool {
        matches!(
            self,
            FillOutcome::BudgetExhausted { .. } | FillOutcome::Cancelled { .. }
        )
    }
}

/// Flood-fill engine holding the tuning parameters
#[derive(Debug, Clone, Default)]
pub struct FillEngine {
    config: FillConfig,
}

impl FillEngine {
    /// Create an engine after validating its configuration
    pub fn new(config: FillConfig) -> Result<Self, FillError> {
        config.validate().map_err(FillError::InvalidConfig)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &FillConfig {
        &self.config
    }

    /// Build a request with the configured tolerance and budget for `raster`
    pub fn request_for<R: Raster + ?Sized>(
        &self,
        raster: &R,
        seed_x: i32,
        seed_y: i32,
        color: Rgba<u8>,
    ) -> FillRequest {
        let (width, height) = raster.size();
        FillRequest {
            seed_x,
            seed_y,
            tolerance: self.config.tolerance,
            color,
            pixel_budget: self.config.budget_for(width, height),
        }
    }

    /// Run one fill in place
    ///
    /// # Arguments
    /// * `raster` - Image to recolor (mutated in place)
    /// * `request` - Seed, tolerance, color and budget
    /// * `cancel` - Optional token polled every `cancel_check_interval` pixels
    ///
    /// # Returns
    /// * The outcome, or an error if the raster failed mid-scan. On error the
    ///   pixels recolored so far stay recolored.
    pub fn run<R: Raster + ?Sized>(
        &self,
        raster: &mut R,
        request: &FillRequest,
        cancel: Option<&CancelToken>,
    ) -> Result<FillOutcome, FillError> {
        let (width, height) = raster.size();

        let (Ok(seed_x), Ok(seed_y)) =
            (u32::try_from(request.seed_x), u32::try_from(request.seed_y))
        else {
            return Ok(FillOutcome::Skipped(SkipReason::SeedOutOfBounds));
        };
        if seed_x >= width || seed_y >= height {
            return Ok(FillOutcome::Skipped(SkipReason::SeedOutOfBounds));
        }

        raster.check()?;
        let pixel_at = |raster: &R, x: u32, y: u32| {
            raster.get(x, y).ok_or(FillError::PixelUnavailable {
                x,
                y,
                width,
                height,
            })
        };

        let target = pixel_at(&*raster, seed_x, seed_y)?;
        if target == request.color {
            return Ok(FillOutcome::Skipped(SkipReason::AlreadyFilled));
        }
        if self.config.blank_seed_only
            && !is_blank(target, request.tolerance, self.config.translucent_alpha)
        {
            return Ok(FillOutcome::Skipped(SkipReason::SeedNotBlank));
        }

        let start = Instant::now();
        let width_us = width as usize;
        let budget = request.pixel_budget.max(1);
        let check_every = self.config.cancel_check_interval.max(1);

        // Marked when a pixel enters the queue, so each pixel is decided once
        let mut seen = vec![false; width_us * height as usize];
        let mut queue = BoundedQueue::new(self.config.queue_capacity, self.config.backpressure);

        seen[seed_y as usize * width_us + seed_x as usize] = true;
        queue.push((seed_x, seed_y));

        let mut filled = 0usize;
        let mut popped = 0usize;

        let outcome = loop {
            let Some((x, y)) = queue.pop() else {
                break FillOutcome::Completed { pixels: filled };
            };

            popped += 1;
            if popped % check_every == 0 && cancel.is_some_and(CancelToken::is_cancelled) {
                break FillOutcome::Cancelled { pixels: filled };
            }

            let pixel = pixel_at(&*raster, x, y)?;
            let candidate = is_similar(pixel, target, request.tolerance)
                || pixel.0[3] < self.config.translucent_alpha;
            if !candidate {
                continue;
            }
            // Only a pending candidate makes the fill partial
            if filled >= budget {
                break FillOutcome::BudgetExhausted { pixels: filled };
            }

            if !raster.put(x, y, request.color) {
                return Err(FillError::PixelUnavailable {
                    x,
                    y,
                    width,
                    height,
                });
            }
            filled += 1;

            for (nx, ny) in neighbors(x, y, width, height) {
                let index = ny as usize * width_us + nx as usize;
                if seen[index] {
                    continue;
                }
                match queue.push((nx, ny)) {
                    PushResult::Accepted => seen[index] = true,
                    PushResult::Dropped(_) => {}
                    PushResult::Evicted((ex, ey)) => {
                        seen[index] = true;
                        seen[ey as usize * width_us + ex as usize] = false;
                    }
                }
            }
        };

        if queue.dropped() > 0 {
            log::warn!(
                "Fill queue saturated at {} entries ({} pushes dropped)",
                queue.capacity(),
                queue.dropped()
            );
        }
        match outcome {
            FillOutcome::BudgetExhausted { pixels } => log::warn!(
                "Fill stopped at pixel budget ({} of {}x{}), region partially filled",
                pixels,
                width,
                height
            ),
            _ => log::debug!(
                "Fill from ({}, {}) finished: {:?} in {:.2}ms",
                seed_x,
                seed_y,
                outcome,
                start.elapsed().as_secs_f64() * 1000.0
            ),
        }

        Ok(outcome)
    }
}

/// In-bounds 4-connected neighbors (right, left, down, up)
fn neighbors(x: u32, y: u32, width: u32, height: u32) -> impl Iterator<Item = (u32, u32)> {
    let right = (x + 1 < width).then(|| (x + 1, y));
    let left = x.checked_sub(1).map(|x| (x, y));
    let down = (y + 1 < height).then(|| (x, y + 1));
    let up = y.checked_sub(1).map(|y| (x, y));
    [right, left, down, up].into_iter().flatten()
}

/// Fill with default tuning, as called from a touch handler
///
/// Recolors the region around (seed_x, seed_y) whose RGB channels are within
/// `tolerance` of the seed pixel, stopping after `pixel_budget` pixels.
pub fn fill<R: Raster + ?Sized>(
    raster: &mut R,
    seed_x: i32,
    seed_y: i32,
    tolerance: u8,
    new_color: Rgba<u8>,
    pixel_budget: usize,
) -> Result<FillOutcome, FillError> {
    let request = FillRequest {
        seed_x,
        seed_y,
        tolerance,
        color: new_color,
        pixel_budget,
    };
    FillEngine::default().run(raster, &request, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fill::{Backpressure, PixelBuffer};
    use image::RgbaImage;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

    fn count(image: &RgbaImage, color: Rgba<u8>) -> usize {
        image.pixels().filter(|p| **p == color).count()
    }

    /// White canvas with a closed black square outline from (2,2) to (7,7)
    fn boxed_canvas() -> RgbaImage {
        let mut image = RgbaImage::from_pixel(10, 10, WHITE);
        for i in 2..=7 {
            image.put_pixel(i, 2, BLACK);
            image.put_pixel(i, 7, BLACK);
            image.put_pixel(2, i, BLACK);
            image.put_pixel(7, i, BLACK);
        }
        image
    }

    #[test]
    fn test_white_canvas_fills_completely() {
        let mut image = RgbaImage::from_pixel(10, 10, WHITE);
        let outcome = fill(&mut image, 0, 0, 50, RED, 1000).unwrap();

        assert_eq!(outcome, FillOutcome::Completed { pixels: 100 });
        assert_eq!(count(&image, RED), 100);
    }

    #[test]
    fn test_fill_with_same_color_is_noop() {
        let mut image = RgbaImage::from_pixel(6, 6, RED);
        let before = image.clone();

        let outcome = fill(&mut image, 3, 3, 50, RED, 1000).unwrap();
        assert_eq!(outcome, FillOutcome::Skipped(SkipReason::AlreadyFilled));
        assert_eq!(image, before);
    }

    #[test]
    fn test_seed_out_of_bounds_is_noop() {
        let mut image = RgbaImage::from_pixel(4, 4, WHITE);
        let before = image.clone();

        for (x, y) in [(-1, 0), (0, -1), (4, 0), (0, 4)] {
            let outcome = fill(&mut image, x, y, 50, RED, 1000).unwrap();
            assert_eq!(outcome, FillOutcome::Skipped(SkipReason::SeedOutOfBounds));
        }
        assert_eq!(image, before);
    }

    #[test]
    fn test_border_is_respected() {
        let mut image = boxed_canvas();
        let outcome = fill(&mut image, 4, 4, 50, RED, 1000).unwrap();

        // Interior of the square is 4x4
        assert_eq!(outcome, FillOutcome::Completed { pixels: 16 });
        for y in 0..10 {
            for x in 0..10 {
                let inside = (3..=6).contains(&x) && (3..=6).contains(&y);
                let on_border = ((2..=7).contains(&x) && (y == 2 || y == 7))
                    || ((2..=7).contains(&y) && (x == 2 || x == 7));
                let expected = if inside {
                    RED
                } else if on_border {
                    BLACK
                } else {
                    WHITE
                };
                assert_eq!(*image.get_pixel(x, y), expected, "pixel ({}, {})", x, y);
            }
        }
    }

    #[test]
    fn test_outside_fill_wraps_around_border() {
        let mut image = boxed_canvas();
        let outcome = fill(&mut image, 0, 0, 50, RED, 1000).unwrap();

        // 100 pixels - 36 box pixels (border + interior)
        assert_eq!(outcome.pixels(), 64);
        assert_eq!(*image.get_pixel(4, 4), WHITE);
    }

    #[test]
    fn test_diagonal_gap_does_not_leak() {
        // Black diagonal splits the image; 4-connectivity cannot cross it
        let mut image = RgbaImage::from_pixel(5, 5, WHITE);
        for i in 0..5 {
            image.put_pixel(i, i, BLACK);
        }
        let outcome = fill(&mut image, 4, 0, 50, RED, 1000).unwrap();

        assert_eq!(outcome.pixels(), 10);
        assert_eq!(*image.get_pixel(0, 4), WHITE);
    }

    #[test]
    fn test_budget_bounds_mutation() {
        for budget in [1, 7, 25, 99] {
            let mut image = RgbaImage::from_pixel(10, 10, WHITE);
            let outcome = fill(&mut image, 5, 5, 50, RED, budget).unwrap();

            assert_eq!(outcome, FillOutcome::BudgetExhausted { pixels: budget });
            assert!(outcome.is_partial());
            assert_eq!(count(&image, RED), budget);
        }
    }

    #[test]
    fn test_budget_equal_to_region_completes() {
        let mut image = RgbaImage::from_pixel(10, 10, WHITE);
        let outcome = fill(&mut image, 0, 0, 50, RED, 100).unwrap();
        assert_eq!(outcome, FillOutcome::Completed { pixels: 100 });
        assert_eq!(count(&image, RED), 100);
    }

    #[test]
    fn test_budget_exactly_covering_enclosed_region_completes() {
        // Border pixels left in the queue are not pending work
        let mut image = boxed_canvas();
        let outcome = fill(&mut image, 4, 4, 50, RED, 16).unwrap();
        assert_eq!(outcome, FillOutcome::Completed { pixels: 16 });
        assert!(!outcome.is_partial());
        assert_eq!(count(&image, RED), 16);
    }

    #[test]
    fn test_budget_one_short_of_region_is_partial() {
        let mut image = boxed_canvas();
        let outcome = fill(&mut image, 4, 4, 50, RED, 15).unwrap();
        assert_eq!(outcome, FillOutcome::BudgetExhausted { pixels: 15 });
        assert_eq!(count(&image, RED), 15);
    }

    #[test]
    fn test_default_budget_is_quarter_area() {
        let engine = FillEngine::default();
        let mut image = RgbaImage::from_pixel(20, 20, WHITE);
        let request = engine.request_for(&image, 10, 10, RED);

        assert_eq!(request.pixel_budget, 100);
        let outcome = engine.run(&mut image, &request, None).unwrap();
        assert_eq!(outcome, FillOutcome::BudgetExhausted { pixels: 100 });
    }

    #[test]
    fn test_tolerance_monotonicity() {
        // Horizontal gradient: column x has gray level 255 - 10x
        let mut gradient = RgbaImage::new(20, 4);
        for (x, _, pixel) in gradient.enumerate_pixels_mut() {
            let level = 255 - 10 * x as u8;
            *pixel = Rgba([level, level, level, 255]);
        }

        let mut previous = 0;
        for tolerance in [0u8, 5, 10, 25, 60, 120, 200, 255] {
            let mut image = gradient.clone();
            let outcome = fill(&mut image, 0, 0, tolerance, RED, 10_000).unwrap();
            assert!(
                outcome.pixels() >= previous,
                "tolerance {} filled {} < {}",
                tolerance,
                outcome.pixels(),
                previous
            );
            previous = outcome.pixels();
        }
        assert_eq!(previous, 80);
    }

    #[test]
    fn test_translucent_pixels_are_candidates() {
        // White seed region touching a transparent strip
        let mut image = RgbaImage::from_pixel(6, 2, WHITE);
        for x in 3..6 {
            image.put_pixel(x, 0, Rgba([0, 0, 0, 0]));
            image.put_pixel(x, 1, Rgba([0, 0, 0, 40]));
        }
        let outcome = fill(&mut image, 0, 0, 10, RED, 1000).unwrap();
        assert_eq!(outcome.pixels(), 12);
    }

    #[test]
    fn test_blank_seed_only_skips_line_art() {
        let engine = FillEngine::new(FillConfig::coloring_page()).unwrap();
        let mut image = boxed_canvas();
        let before = image.clone();

        let request = engine.request_for(&image, 2, 2, RED);
        let outcome = engine.run(&mut image, &request, None).unwrap();
        assert_eq!(outcome, FillOutcome::Skipped(SkipReason::SeedNotBlank));
        assert_eq!(image, before);

        let request = engine.request_for(&image, 4, 4, RED);
        let outcome = engine.run(&mut image, &request, None).unwrap();
        assert!(matches!(outcome, FillOutcome::Completed { pixels: 16 }));
    }

    #[test]
    fn test_tiny_queue_stays_bounded_and_partial() {
        let config = FillConfig {
            queue_capacity: 2,
            pixel_budget: Some(10_000),
            ..FillConfig::default()
        };
        let engine = FillEngine::new(config).unwrap();
        let mut image = RgbaImage::from_pixel(50, 50, WHITE);
        let request = engine.request_for(&image, 25, 25, RED);

        let outcome = engine.run(&mut image, &request, None).unwrap();
        assert!(outcome.pixels() >= 1);
        assert_eq!(count(&image, RED), outcome.pixels());
    }

    #[test]
    fn test_drop_oldest_policy_still_fills_connected_pixels() {
        let config = FillConfig {
            queue_capacity: 3,
            backpressure: Backpressure::DropOldest,
            pixel_budget: Some(10_000),
            ..FillConfig::default()
        };
        let engine = FillEngine::new(config).unwrap();
        let mut image = RgbaImage::from_pixel(30, 30, WHITE);
        let request = engine.request_for(&image, 0, 0, RED);

        let outcome = engine.run(&mut image, &request, None).unwrap();
        assert!(outcome.pixels() > 1);
        assert_eq!(count(&image, RED), outcome.pixels());
    }

    #[test]
    fn test_cancelled_token_stops_fill() {
        let config = FillConfig {
            cancel_check_interval: 1,
            ..FillConfig::default()
        };
        let engine = FillEngine::new(config).unwrap();
        let mut image = RgbaImage::from_pixel(10, 10, WHITE);
        let request = engine.request_for(&image, 0, 0, RED);

        let cancel = CancelToken::new();
        cancel.cancel();
        let outcome = engine.run(&mut image, &request, Some(&cancel)).unwrap();
        assert_eq!(outcome, FillOutcome::Cancelled { pixels: 0 });
    }

    #[test]
    fn test_corrupt_buffer_is_an_error() {
        let mut bytes = vec![255u8; 15];
        let mut buffer = PixelBuffer::new(2, 2, &mut bytes);

        let result = fill(&mut buffer, 0, 0, 50, RED, 100);
        assert!(matches!(result, Err(FillError::CorruptRaster { .. })));
    }

    #[test]
    fn test_pixel_buffer_fill() {
        let mut bytes = vec![255u8; 3 * 3 * 4];
        let mut buffer = PixelBuffer::new(3, 3, &mut bytes);

        let outcome = fill(&mut buffer, 1, 1, 0, RED, 100).unwrap();
        assert_eq!(outcome.pixels(), 9);
        assert!(bytes.chunks(4).all(|px| px == [255, 0, 0, 255]));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = FillConfig {
            cancel_check_interval: 0,
            ..FillConfig::default()
        };
        assert!(matches!(
            FillEngine::new(config),
            Err(FillError::InvalidConfig(_))
        ));
    }
}
