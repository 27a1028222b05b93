//! Background fill worker with supersede-on-tap cancellation.

use image::{Rgba, RgbaImage};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use super::engine::{FillEngine, FillOutcome};
use super::FillError;

/// Shared cancellation flag polled by a running fill
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Result of one background fill, delivered to the interactive thread
#[derive(Debug)]
pub struct FillReport {
    pub seed: (i32, i32),
    pub color: Rgba<u8>,
    pub result: Result<FillOutcome, FillError>,
    pub elapsed: Duration,
}

/// The fill currently running on the worker thread
struct InFlight {
    cancel: CancelToken,
    handle: thread::JoinHandle<()>,
}

/// Runs fills off the interactive thread, at most one at a time per canvas
///
/// Submitting a new fill cancels the running one and waits for it to let go
/// of the canvas. The superseded fill may leave a partially recolored region
/// behind; the next fill simply works on top of it.
pub struct FillWorker {
    canvas: Arc<Mutex<RgbaImage>>,
    engine: Arc<FillEngine>,
    current: Option<InFlight>,
    reports_tx: Sender<FillReport>,
    reports_rx: Receiver<FillReport>,
}

impl FillWorker {
    /// Create a worker that fills `canvas` with the given engine
    pub fn new(canvas: Arc<Mutex<RgbaImage>>, engine: FillEngine) -> Self {
        let (reports_tx, reports_rx) = mpsc::channel();
        Self {
            canvas,
            engine: Arc::new(engine),
            current: None,
            reports_tx,
            reports_rx,
        }
    }

    pub fn engine(&self) -> &FillEngine {
        &self.engine
    }

    /// Start a fill at (x, y), superseding any fill still running
    pub fn submit(&mut self, x: i32, y: i32, color: Rgba<u8>) {
        self.cancel();

        let cancel = CancelToken::new();
        let token = cancel.clone();
        let canvas = Arc::clone(&self.canvas);
        let engine = Arc::clone(&self.engine);
        let reports = self.reports_tx.clone();

        let handle = thread::spawn(move || {
            let start = Instant::now();
            let result = match canvas.lock() {
                Ok(mut image) => {
                    let request = engine.request_for(&*image, x, y, color);
                    engine.run(&mut *image, &request, Some(&token))
                }
                Err(_) => Err(FillError::CanvasPoisoned),
            };

            if let Err(e) = &result {
                log::warn!("Fill at ({}, {}) failed: {}", x, y, e);
            }

            // Receiver may be gone if the worker was dropped mid-fill
            let _ = reports.send(FillReport {
                seed: (x, y),
                color,
                result,
                elapsed: start.elapsed(),
            });
        });

        self.current = Some(InFlight { cancel, handle });
    }

    /// True while a fill is running
    pub fn is_busy(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|job| !job.handle.is_finished())
    }

    /// Cancel the running fill (if any) and wait for it to stop
    pub fn cancel(&mut self) {
        if let Some(job) = self.current.take() {
            job.cancel.cancel();
            join(job);
        }
    }

    /// Wait for the running fill and return the most recent report
    pub fn wait(&mut self) -> Option<FillReport> {
        if let Some(job) = self.current.take() {
            join(job);
        }
        self.reports_rx.try_iter().last()
    }

    /// Next finished report without blocking (superseded fills report too)
    pub fn poll(&self) -> Option<FillReport> {
        self.reports_rx.try_recv().ok()
    }
}

impl Drop for FillWorker {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn join(job: InFlight) {
    if job.handle.join().is_err() {
        log::warn!("Fill thread panicked; canvas may be partially filled");
    }
}
