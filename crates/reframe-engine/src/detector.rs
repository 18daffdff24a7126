//! Face detector adapter and backend selection.
//!
//! The reframing logic never sees a concrete model. It talks to a
//! [`FaceDetector`] trait object produced by a [`DetectorFactory`], and the
//! [`BackendSelector`] decides which backend that factory builds:
//!
//! 1. **Accelerated** (GPU delegate) when requested
//! 2. **Default** (CPU) as the universal fallback
//!
//! The fallback is attempted at most once, synchronously, before frame 0.
//!
//! # Usage
//! ```rust
//! use reframe_engine::detector::{BackendSelector, DetectorBackend, FaceDetector, FnDetector};
//! use reframe_engine::ReframeResult;
//!
//! let factory = |_backend: DetectorBackend| -> ReframeResult<Box<dyn FaceDetector>> {
//!     Ok(Box::new(FnDetector::new("noop", |_frame: &image::RgbImage, _ts: u64| {
//!         Ok(Vec::new())
//!     })))
//! };
//! let (detector, metrics) = BackendSelector::initialize(&factory, false).unwrap();
//! assert_eq!(metrics.backend, DetectorBackend::Default);
//! # drop(detector);
//! ```

use crate::error::{ReframeError, ReframeResult};
use crate::metrics;
use image::RgbImage;
use reframe_models::Detection;
use std::fmt;
use std::time::Instant;
use tracing::{info, warn};

/// A face detector running in video mode.
///
/// Implementations may keep internal timestamp state and may reject
/// timestamps that do not strictly increase; callers go through
/// [`TimestampClock`] to guarantee monotonicity.
pub trait FaceDetector: Send {
    /// Detect faces in `frame`. Boxes are in `frame` pixel coordinates.
    fn detect(&mut self, frame: &RgbImage, timestamp_ms: u64) -> ReframeResult<Vec<Detection>>;

    /// Short name for logs.
    fn name(&self) -> &str {
        "detector"
    }
}

impl<D: FaceDetector + ?Sized> FaceDetector for Box<D> {
    fn detect(&mut self, frame: &RgbImage, timestamp_ms: u64) -> ReframeResult<Vec<Detection>> {
        (**self).detect(frame, timestamp_ms)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Detector wrapping a plain function `frame -> boxes`.
pub struct FnDetector<F> {
    name: String,
    detect_fn: F,
}

impl<F> FnDetector<F>
where
    F: FnMut(&RgbImage, u64) -> ReframeResult<Vec<Detection>> + Send,
{
    /// Create a detector from a closure.
    pub fn new(name: impl Into<String>, detect_fn: F) -> Self {
        Self {
            name: name.into(),
            detect_fn,
        }
    }
}

impl<F> FaceDetector for FnDetector<F>
where
    F: FnMut(&RgbImage, u64) -> ReframeResult<Vec<Detection>> + Send,
{
    fn detect(&mut self, frame: &RgbImage, timestamp_ms: u64) -> ReframeResult<Vec<Detection>> {
        (self.detect_fn)(frame, timestamp_ms)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Available detector backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorBackend {
    /// Hardware-accelerated delegate (GPU)
    Accelerated,
    /// Default CPU backend
    Default,
}

impl fmt::Display for DetectorBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectorBackend::Accelerated => write!(f, "accelerated"),
            DetectorBackend::Default => write!(f, "default"),
        }
    }
}

/// Builds detectors for a requested backend.
///
/// Implemented for any `Fn(DetectorBackend) -> ReframeResult<Box<dyn FaceDetector>>`.
pub trait DetectorFactory {
    fn create(&self, backend: DetectorBackend) -> ReframeResult<Box<dyn FaceDetector>>;
}

impl<F> DetectorFactory for F
where
    F: Fn(DetectorBackend) -> ReframeResult<Box<dyn FaceDetector>>,
{
    fn create(&self, backend: DetectorBackend) -> ReframeResult<Box<dyn FaceDetector>> {
        self(backend)
    }
}

/// Metrics collected during backend initialization.
#[derive(Debug, Clone)]
pub struct BackendMetrics {
    /// Selected backend
    pub backend: DetectorBackend,
    /// Time taken to initialize the backend (ms)
    pub initialization_time_ms: u64,
    /// Whether the accelerated backend was requested but failed
    pub fell_back: bool,
}

impl BackendMetrics {
    /// Log metrics for diagnostics.
    pub fn log(&self) {
        info!(
            backend = %self.backend,
            init_time_ms = self.initialization_time_ms,
            fell_back = self.fell_back,
            "Face detector initialized"
        );
    }
}

/// Backend selector implementing accelerated-first policy.
pub struct BackendSelector;

impl BackendSelector {
    /// Build a detector, trying the accelerated backend first when requested.
    ///
    /// # Errors
    /// Returns [`ReframeError::DetectorInit`] when the default backend fails.
    pub fn initialize(
        factory: &dyn DetectorFactory,
        prefer_accelerated: bool,
    ) -> ReframeResult<(Box<dyn FaceDetector>, BackendMetrics)> {
        let start = Instant::now();
        let mut fell_back = false;

        if prefer_accelerated {
            match factory.create(DetectorBackend::Accelerated) {
                Ok(detector) => {
                    let metrics = BackendMetrics {
                        backend: DetectorBackend::Accelerated,
                        initialization_time_ms: start.elapsed().as_millis() as u64,
                        fell_back,
                    };
                    metrics.log();
                    return Ok((detector, metrics));
                }
                Err(e) => {
                    warn!(
                        error = %e,
                        "Accelerated detector initialization failed, falling back to default backend"
                    );
                    metrics::record_detector_fallback();
                    fell_back = true;
                }
            }
        }

        let detector = factory.create(DetectorBackend::Default).map_err(|e| match e {
            ReframeError::DetectorInit { .. } => e,
            other => ReframeError::detector_init(DetectorBackend::Default, other.to_string()),
        })?;

        let metrics = BackendMetrics {
            backend: DetectorBackend::Default,
            initialization_time_ms: start.elapsed().as_millis() as u64,
            fell_back,
        };
        metrics.log();
        Ok((detector, metrics))
    }
}

/// Strictly increasing detector timestamps for one clip.
#[derive(Debug, Clone)]
pub struct TimestampClock {
    fps: f64,
    last_ms: Option<u64>,
}

impl TimestampClock {
    /// Create a clock for the given frame rate.
    pub fn new(fps: f64) -> Self {
        Self { fps, last_ms: None }
    }

    /// Timestamp for `frame_index`: `index * 1000 / fps`, bumped to
    /// previous + 1 ms when it would not increase.
    pub fn timestamp_for(&mut self, frame_index: u64) -> u64 {
        let computed = (frame_index as f64 * 1000.0 / self.fps) as u64;
        self.issue(computed)
    }

    /// Next timestamp after the last one issued (used when the same frame is
    /// detected twice, e.g. after an ROI miss).
    pub fn bump(&mut self) -> u64 {
        let next = self.last_ms.map_or(0, |last| last + 1);
        self.issue(next)
    }

    fn issue(&mut self, candidate: u64) -> u64 {
        let ts = match self.last_ms {
            Some(last) if candidate <= last => last + 1,
            _ => candidate,
        };
        self.last_ms = Some(ts);
        ts
    }
}
