//! Public entry point: one [`Reframer`] per clip.

use crate::config::ReframeConfig;
use crate::detector::{BackendMetrics, BackendSelector, DetectorFactory};
use crate::error::{ReframeError, ReframeResult};
use crate::metrics;
use crate::session::{ReframeSession, ReframedFrame, SessionStats};
use image::imageops::{self, FilterType};
use image::RgbImage;
use reframe_models::FrameSize;
use std::time::Instant;
use tracing::{info, info_span, warn, Span};
use uuid::Uuid;

const FALLBACK_FPS: f64 = 30.0;

/// Source stream properties, fixed for the clip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceInfo {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
}

impl SourceInfo {
    pub fn new(width: u32, height: u32, fps: f64) -> Self {
        Self { width, height, fps }
    }

    pub fn size(&self) -> FrameSize {
        FrameSize::new(self.width, self.height)
    }
}

/// Reframes one landscape clip into a portrait one.
///
/// Feed decoded frames in order with [`push_frame`](Self::push_frame); each
/// call returns the output frames that became ready (output lags input by
/// the look-ahead window). Call [`finish`](Self::finish) at end of stream to
/// drain the rest. Every input frame produces exactly one output frame, in
/// order.
///
/// # Example
/// ```rust
/// use reframe_engine::detector::{DetectorBackend, FaceDetector, FnDetector};
/// use reframe_engine::{Reframer, ReframeConfig, ReframeResult, SourceInfo};
///
/// let factory = |_backend: DetectorBackend| -> ReframeResult<Box<dyn FaceDetector>> {
///     Ok(Box::new(FnDetector::new("none", |_f: &image::RgbImage, _t: u64| Ok(Vec::new()))))
/// };
/// let mut reframer =
///     Reframer::new(ReframeConfig::default(), SourceInfo::new(320, 180, 30.0), &factory)?;
///
/// let mut frames = Vec::new();
/// for _ in 0..10 {
///     frames.extend(reframer.push_frame(image::RgbImage::new(320, 180))?);
/// }
/// frames.extend(reframer.finish()?);
/// assert_eq!(frames.len(), 10);
/// assert_eq!(frames[0].image.dimensions(), (102, 180));
/// # Ok::<(), reframe_engine::ReframeError>(())
/// ```
pub struct Reframer {
    session: ReframeSession,
    source: FrameSize,
    working: Option<FrameSize>,
    next_index: u64,
    finished: bool,
    started: Instant,
    session_id: Uuid,
    backend: BackendMetrics,
    span: Span,
}

impl Reframer {
    /// Validate `config`, initialize the detector and set up a fresh session.
    ///
    /// # Errors
    /// - [`ReframeError::InvalidConfig`] for out-of-range settings
    /// - [`ReframeError::InvalidSource`] for an empty frame size
    /// - [`ReframeError::DetectorInit`] when no detector backend can be built
    pub fn new(
        config: ReframeConfig,
        source: SourceInfo,
        factory: &dyn DetectorFactory,
    ) -> ReframeResult<Self> {
        config.validate()?;

        if source.width < 2 || source.height < 2 {
            return Err(ReframeError::invalid_source(format!(
                "frame size {} is too small",
                source.size()
            )));
        }

        let fps = if source.fps.is_finite() && source.fps > 0.0 {
            source.fps
        } else {
            warn!(fps = source.fps, fallback = FALLBACK_FPS, "Invalid source fps, using fallback");
            FALLBACK_FPS
        };

        let session_id = Uuid::new_v4();
        let span = info_span!(
            "reframe_session",
            session_id = %session_id,
            width = source.width,
            height = source.height
        );

        let (detector, backend) = {
            let _enter = span.enter();
            BackendSelector::initialize(factory, config.prefer_accelerated)?
        };

        let source_size = source.size();
        let working = source_size.capped(config.max_input_dimension);
        let frame_size = working.unwrap_or(source_size);
        let session = ReframeSession::new(detector, &config, frame_size, fps);

        {
            let _enter = span.enter();
            info!(
                source = %source_size,
                working = %frame_size,
                target = %session.target_size(),
                fps,
                backend = %backend.backend,
                "Reframe session started"
            );
        }

        Ok(Self {
            session,
            source: source_size,
            working,
            next_index: 0,
            finished: false,
            started: Instant::now(),
            session_id,
            backend,
            span,
        })
    }

    /// Feed the next frame.
    ///
    /// # Errors
    /// - [`ReframeError::FrameDimensionMismatch`] when the frame size differs
    ///   from the source size
    /// - [`ReframeError::StreamClosed`] after [`finish`](Self::finish)
    pub fn push_frame(&mut self, frame: RgbImage) -> ReframeResult<Vec<ReframedFrame>> {
        if self.finished {
            return Err(ReframeError::StreamClosed);
        }

        let actual = FrameSize::new(frame.width(), frame.height());
        if actual != self.source {
            return Err(ReframeError::FrameDimensionMismatch {
                expected: self.source,
                actual,
            });
        }

        let _enter = self.span.enter();
        let frame = match self.working {
            Some(size) => imageops::resize(&frame, size.width, size.height, FilterType::Triangle),
            None => frame,
        };

        let index = self.next_index;
        self.next_index += 1;
        Ok(self.session.ingest(index, frame))
    }

    /// End the stream and drain every queued frame.
    ///
    /// # Errors
    /// [`ReframeError::StreamClosed`] when called twice.
    pub fn finish(&mut self) -> ReframeResult<Vec<ReframedFrame>> {
        if self.finished {
            return Err(ReframeError::StreamClosed);
        }
        self.finished = true;

        let _enter = self.span.enter();
        let frames = self.session.flush();

        let elapsed = self.started.elapsed().as_secs_f64();
        metrics::record_clip_duration(elapsed);
        let stats = self.session.stats();
        info!(
            frames = stats.frames_emitted,
            scene_cuts = stats.scene_cuts,
            mode_switches = stats.mode_switches,
            elapsed_secs = elapsed,
            "Reframe session finished"
        );
        Ok(frames)
    }

    /// Reframe a whole clip.
    pub fn run<I>(mut self, frames: I) -> ReframeResult<Vec<ReframedFrame>>
    where
        I: IntoIterator<Item = RgbImage>,
    {
        let mut out = Vec::new();
        for frame in frames {
            out.extend(self.push_frame(frame)?);
        }
        out.extend(self.finish()?);
        Ok(out)
    }

    /// Output frame size.
    pub fn target_size(&self) -> FrameSize {
        self.session.target_size()
    }

    /// Frame size the engine works at after input capping.
    pub fn working_size(&self) -> FrameSize {
        self.working.unwrap_or(self.source)
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Detector backend chosen at construction.
    pub fn backend(&self) -> &BackendMetrics {
        &self.backend
    }

    pub fn stats(&self) -> SessionStats {
        self.session.stats()
    }
}
