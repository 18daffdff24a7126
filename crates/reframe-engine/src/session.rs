//! Per-clip reframing state.
//!
//! A [`ReframeSession`] owns every piece of mutable state for one clip:
//! detection stage (clock, ROI, skip interval), anchor, framing view,
//! mode history, smoothing, scene tracking and the look-ahead queue.
//! Nothing is shared between sessions.
//!
//! Frames go through two phases:
//!
//! 1. **Classify** on arrival: detect, check for a scene cut, vote on the
//!    active mode, decide the framing mode and raw role positions, queue.
//! 2. **Emit** once the look-ahead window is full (or on flush): average the
//!    queued targets, smooth, composite.

use crate::anchor::{AnchorDecision, AnchorTracker};
use crate::arbiter::ModeArbiter;
use crate::compositor::Compositor;
use crate::config::ReframeConfig;
use crate::detection::DetectionStage;
use crate::detector::FaceDetector;
use crate::framing::SingleFraming;
use crate::lookahead::{FrameRecord, LookaheadBuffer};
use crate::metrics;
use crate::scene_cut::SceneCutMonitor;
use crate::smoother::{AdaptiveSmoother, TrackedPoints};
use image::RgbImage;
use reframe_models::{ActiveMode, Detection, FrameLayout, FrameSize, FramingMode, TrackRole, ViewState};
use tracing::debug;

/// One composited output frame.
#[derive(Debug, Clone)]
pub struct ReframedFrame {
    /// Index of the input frame this was rendered from.
    pub index: u64,
    pub mode: FramingMode,
    pub layout: FrameLayout,
    pub image: RgbImage,
}

/// Counters reported when a clip finishes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub frames_emitted: u64,
    pub scene_cuts: u32,
    pub mode_switches: u32,
}

/// Reframing state for one clip.
pub struct ReframeSession {
    frame_size: FrameSize,
    detection: DetectionStage,
    anchor: AnchorTracker,
    framing: SingleFraming,
    arbiter: ModeArbiter,
    smoother: AdaptiveSmoother,
    scenes: SceneCutMonitor,
    lookahead: LookaheadBuffer,
    compositor: Compositor,

    tracked_x: Option<f64>,
    face_ratio: f64,
    split_raw: TrackedPoints,
    scene_id: u32,
    last_emitted: Option<ActiveMode>,
    frames_emitted: u64,
}

impl ReframeSession {
    /// Create a session for frames of `frame_size`.
    pub fn new(
        detector: Box<dyn FaceDetector>,
        config: &ReframeConfig,
        frame_size: FrameSize,
        fps: f64,
    ) -> Self {
        Self {
            frame_size,
            detection: DetectionStage::new(detector, config, frame_size, fps),
            anchor: AnchorTracker::new(config),
            framing: SingleFraming::new(config, frame_size),
            arbiter: ModeArbiter::new(config),
            smoother: AdaptiveSmoother::new(config),
            scenes: SceneCutMonitor::new(config.scene_cut_threshold_px),
            lookahead: LookaheadBuffer::new(config.lookahead_frames),
            compositor: Compositor::new(config, frame_size),
            tracked_x: None,
            face_ratio: 0.0,
            split_raw: TrackedPoints::default(),
            scene_id: 0,
            last_emitted: None,
            frames_emitted: 0,
        }
    }

    /// Output frame size.
    pub fn target_size(&self) -> FrameSize {
        self.compositor.target()
    }

    /// Classify and queue one frame; returns the frames that became ready.
    pub fn ingest(&mut self, index: u64, frame: RgbImage) -> Vec<ReframedFrame> {
        let record = self.classify(index, frame);
        self.lookahead.push(record);
        metrics::record_lookahead_depth(self.lookahead.len());

        let mut ready = Vec::new();
        while let Some(record) = self.lookahead.pop_ready() {
            ready.push(self.emit(record));
        }
        ready
    }

    /// Drain the look-ahead queue at end of stream.
    pub fn flush(&mut self) -> Vec<ReframedFrame> {
        let mut out = Vec::with_capacity(self.lookahead.len());
        while let Some(record) = self.lookahead.pop_flush() {
            out.push(self.emit(record));
        }
        metrics::record_lookahead_depth(0);
        out
    }

    /// Frames queued but not yet emitted.
    pub fn pending(&self) -> usize {
        self.lookahead.len()
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            frames_emitted: self.frames_emitted,
            scene_cuts: self.scenes.cut_count(),
            mode_switches: self.arbiter.switch_count(),
        }
    }

    fn classify(&mut self, index: u64, frame: RgbImage) -> FrameRecord {
        let outcome = self.detection.observe(&frame, index);
        let faces = &outcome.faces;

        let mut scene_cut = false;
        let mut reanchored = false;

        if outcome.fresh {
            let observed = match self.arbiter.current() {
                ActiveMode::Single => TrackedPoints {
                    main: Detection::largest(faces).map(|d| d.cx),
                    ..Default::default()
                },
                ActiveMode::Split => self.split_positions(faces),
            };
            if self.scenes.check(index, &observed) {
                scene_cut = true;
                self.scene_id += 1;
                self.framing.reset_motion();
                self.split_raw = TrackedPoints::default();
            }
        }

        // Skipped frames vote with the detections they reuse.
        let decision = self.arbiter.observe(faces.len());
        self.detection.set_roi_allowed(decision.mode == ActiveMode::Single);

        if decision.mode == ActiveMode::Single && (outcome.fresh || decision.switched) {
            let frame_area = self.frame_size.area();
            self.face_ratio = Detection::largest(faces).map_or(0.0, |d| d.area() / frame_area);
            self.tracked_x = match self.anchor.evaluate(faces, frame_area) {
                AnchorDecision::Track { x, reanchored: r } => {
                    reanchored = r;
                    Some(x)
                }
                AnchorDecision::Cinematic => None,
            };
        }

        let active = self.arbiter.current();
        let (mode, positions, view) = match active {
            ActiveMode::Single => {
                let step = self.framing.advance(
                    self.tracked_x,
                    self.face_ratio,
                    outcome.fresh,
                    self.detection.skip_interval(),
                );
                if outcome.fresh {
                    self.detection.report_motion(self.framing.movement_speed());
                }
                let positions = TrackedPoints {
                    main: step.target_x,
                    ..Default::default()
                };
                (step.mode, positions, step.view)
            }
            ActiveMode::Split => {
                let positions = self.assign_split(faces);
                (FramingMode::Split, positions, ViewState::default())
            }
        };

        debug!(
            frame = index,
            fresh = outcome.fresh,
            faces = faces.len(),
            active = %active,
            mode = %mode,
            "Frame classified"
        );

        FrameRecord {
            index,
            frame,
            mode,
            active,
            positions,
            view,
            scene_id: self.scene_id,
            scene_cut,
            reanchored,
        }
    }

    /// Leftmost subject on the top half, rightmost on the bottom. A lone
    /// face keeps the half whose last position is closest.
    fn split_positions(&self, faces: &[Detection]) -> TrackedPoints {
        let mut positions = TrackedPoints::default();
        match faces {
            [] => {}
            [face] => {
                let role = match (self.split_raw.top, self.split_raw.bottom) {
                    (Some(top), Some(bottom)) => {
                        if (face.cx - top).abs() <= (face.cx - bottom).abs() {
                            TrackRole::Top
                        } else {
                            TrackRole::Bottom
                        }
                    }
                    _ if face.cx < self.frame_size.center_x() => TrackRole::Top,
                    _ => TrackRole::Bottom,
                };
                positions.set(role, Some(face.cx));
            }
            [first, .., last] => {
                positions.top = Some(first.cx);
                positions.bottom = Some(last.cx);
            }
        }
        positions
    }

    fn assign_split(&mut self, faces: &[Detection]) -> TrackedPoints {
        let positions = self.split_positions(faces);
        for role in [TrackRole::Top, TrackRole::Bottom] {
            if let Some(x) = positions.get(role) {
                self.split_raw.set(role, Some(x));
            }
        }
        positions
    }

    fn emit(&mut self, record: FrameRecord) -> ReframedFrame {
        let targets = self.lookahead.targets(&record);

        if record.scene_cut {
            self.smoother.reset();
        }
        if record.reanchored {
            self.smoother.reset_role(TrackRole::Main);
        }
        if self.last_emitted != Some(record.active) {
            for role in record.active.roles() {
                self.smoother.reset_role(*role);
            }
        }
        self.last_emitted = Some(record.active);

        let mut camera = TrackedPoints::default();
        for &role in record.active.roles() {
            let x = match targets.get(role) {
                Some(target) => self.smoother.smooth(role, target),
                None => self
                    .smoother
                    .last(role)
                    .unwrap_or_else(|| self.fallback_x(role)),
            };
            camera.set(role, Some(x));
        }

        let (layout, image) = match record.active {
            ActiveMode::Single => {
                let x = camera.main.unwrap_or_else(|| self.fallback_x(TrackRole::Main));
                self.compositor.render_single(&record.frame, x, record.view)
            }
            ActiveMode::Split => {
                let top = camera.top.unwrap_or_else(|| self.fallback_x(TrackRole::Top));
                let bottom = camera
                    .bottom
                    .unwrap_or_else(|| self.fallback_x(TrackRole::Bottom));
                self.compositor.render_split(&record.frame, top, bottom)
            }
        };

        metrics::record_frame(record.mode);
        self.frames_emitted += 1;

        ReframedFrame {
            index: record.index,
            mode: record.mode,
            layout,
            image,
        }
    }

    fn fallback_x(&self, role: TrackRole) -> f64 {
        let w = self.frame_size.width as f64;
        match role {
            TrackRole::Main => w / 2.0,
            TrackRole::Top => w / 4.0,
            TrackRole::Bottom => w * 3.0 / 4.0,
        }
    }
}
