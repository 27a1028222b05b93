//! Coloring page: template, working canvas and the tap-to-fill flow.

use glam::Vec2;
use image::{Rgba, RgbaImage};
use std::sync::{Arc, Mutex};

use super::engine::{FillEngine, FillOutcome};
use super::worker::{FillReport, FillWorker};
use super::FillError;

/// A line-art template being colored in
pub struct ColoringPage {
    template: RgbaImage,
    canvas: Arc<Mutex<RgbaImage>>,
    worker: FillWorker,
    color: Rgba<u8>,
}

impl ColoringPage {
    /// Start a page from a template; the canvas begins as a copy of it
    pub fn new(template: RgbaImage, engine: FillEngine) -> Self {
        let canvas = Arc::new(Mutex::new(template.clone()));
        let worker = FillWorker::new(Arc::clone(&canvas), engine);
        Self {
            template,
            canvas,
            worker,
            color: Rgba([255, 0, 0, 255]),
        }
    }

    /// Image size in pixels
    pub fn dimensions(&self) -> (u32, u32) {
        self.template.dimensions()
    }

    pub fn set_color(&mut self, color: Rgba<u8>) {
        self.color = color;
    }

    pub fn color(&self) -> Rgba<u8> {
        self.color
    }

    /// Map a point in view space to image pixel coordinates
    ///
    /// The image is assumed stretched to fill the view. Returns None for a
    /// degenerate view or a point outside it.
    pub fn view_to_image(&self, point: Vec2, view_size: Vec2) -> Option<(i32, i32)> {
        if view_size.x <= 0.0 || view_size.y <= 0.0 || !point.is_finite() {
            return None;
        }
        let (width, height) = self.dimensions();
        let scaled = (point * Vec2::new(width as f32, height as f32) / view_size).floor();

        let inside = scaled.x >= 0.0
            && scaled.y >= 0.0
            && scaled.x < width as f32
            && scaled.y < height as f32;
        inside.then(|| (scaled.x as i32, scaled.y as i32))
    }

    /// Handle a touch: fill from the touched pixel in the background
    ///
    /// Returns false when the touch landed outside the image.
    pub fn tap(&mut self, point: Vec2, view_size: Vec2) -> bool {
        match self.view_to_image(point, view_size) {
            Some((x, y)) => {
                self.worker.submit(x, y, self.color);
                true
            }
            None => false,
        }
    }

    /// Fill synchronously on the calling thread (cancels any background fill)
    pub fn fill_now(&mut self, x: i32, y: i32) -> Result<FillOutcome, FillError> {
        self.worker.cancel();
        let mut image = self.canvas.lock().map_err(|_| FillError::CanvasPoisoned)?;
        let engine = self.worker.engine();
        let request = engine.request_for(&*image, x, y, self.color);
        engine.run(&mut *image, &request, None)
    }

    /// Wait for the background fill and return its report
    pub fn wait(&mut self) -> Option<FillReport> {
        self.worker.wait()
    }

    pub fn is_busy(&self) -> bool {
        self.worker.is_busy()
    }

    /// Restore the canvas to the untouched template
    ///
    /// Ignored (returns false) while a fill is running.
    pub fn clear(&mut self) -> Result<bool, FillError> {
        if self.worker.is_busy() {
            return Ok(false);
        }
        let mut image = self.canvas.lock().map_err(|_| FillError::CanvasPoisoned)?;
        image.clone_from(&self.template);
        Ok(true)
    }

    /// Copy of the current canvas (for display or saving)
    pub fn snapshot(&self) -> Result<RgbaImage, FillError> {
        let image = self.canvas.lock().map_err(|_| FillError::CanvasPoisoned)?;
        Ok(image.clone())
    }

    /// Shared handle to the canvas (e.g. for a renderer)
    pub fn canvas(&self) -> Arc<Mutex<RgbaImage>> {
        Arc::clone(&self.canvas)
    }
}
