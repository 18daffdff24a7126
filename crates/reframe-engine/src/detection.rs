//! Per-frame detection stage.
//!
//! Wraps the injected [`FaceDetector`] with everything the engine needs
//! around it:
//! - strictly increasing timestamps ([`TimestampClock`])
//! - ROI narrowing with full-frame fallback on a miss
//! - adaptive frame skipping (every N frames, every frame under fast motion)
//! - confidence filtering

use crate::config::ReframeConfig;
use crate::detector::{FaceDetector, TimestampClock};
use crate::metrics;
use crate::roi::RegionOfInterest;
use image::{imageops, RgbImage};
use reframe_models::{Detection, FrameSize};
use tracing::{debug, warn};

/// Faces for one frame.
#[derive(Debug, Clone, Default)]
pub struct DetectionOutcome {
    /// Detections sorted ascending by center x.
    pub faces: Vec<Detection>,
    /// `true` when the detector ran on this frame, `false` when the previous
    /// detections were reused.
    pub fresh: bool,
}

/// Detection stage for one clip.
pub struct DetectionStage {
    detector: Box<dyn FaceDetector>,
    clock: TimestampClock,
    frame_size: FrameSize,

    enable_roi: bool,
    roi_allowed: bool,
    roi_scale: f64,
    min_roi_size: u32,
    roi_refresh_interval: u32,
    roi: Option<RegionOfInterest>,
    detections_since_full: u32,

    min_confidence: f64,
    base_skip_interval: u32,
    current_skip_interval: u32,
    fast_motion_threshold: f64,
    frames_since_detection: u32,
    faces: Vec<Detection>,
}

impl DetectionStage {
    /// Create a detection stage around a freshly initialized detector.
    pub fn new(
        detector: Box<dyn FaceDetector>,
        config: &ReframeConfig,
        frame_size: FrameSize,
        fps: f64,
    ) -> Self {
        Self {
            detector,
            clock: TimestampClock::new(fps),
            frame_size,
            enable_roi: config.enable_roi,
            roi_allowed: true,
            roi_scale: config.roi_scale,
            min_roi_size: config.min_roi_size,
            roi_refresh_interval: config.roi_refresh_interval.max(1),
            roi: None,
            detections_since_full: 0,
            min_confidence: config.min_detection_confidence,
            base_skip_interval: config.detection_skip_interval.max(1),
            current_skip_interval: config.detection_skip_interval.max(1),
            fast_motion_threshold: config.fast_motion_threshold,
            frames_since_detection: u32::MAX,
            faces: Vec::new(),
        }
    }

    /// Faces for `frame`, running the detector when the skip interval is due.
    pub fn observe(&mut self, frame: &RgbImage, frame_index: u64) -> DetectionOutcome {
        self.frames_since_detection = self.frames_since_detection.saturating_add(1);
        let fresh = self.frames_since_detection >= self.current_skip_interval;

        if fresh {
            let mut faces = self.detect(frame, frame_index);
            faces.sort_by(|a, b| a.cx.total_cmp(&b.cx));
            self.faces = faces;
            self.frames_since_detection = 0;
        }

        DetectionOutcome {
            faces: self.faces.clone(),
            fresh,
        }
    }

    /// Feed back normalized subject speed; fast motion scans every frame.
    pub fn report_motion(&mut self, speed: f64) {
        self.current_skip_interval = if speed > self.fast_motion_threshold {
            1
        } else {
            self.base_skip_interval
        };
    }

    /// Current detection interval in frames.
    pub fn skip_interval(&self) -> u32 {
        self.current_skip_interval
    }

    /// Allow or forbid ROI narrowing (forbidden while several subjects are framed).
    pub fn set_roi_allowed(&mut self, allowed: bool) {
        self.roi_allowed = allowed;
        if !allowed {
            self.roi = None;
        }
    }

    /// Current region of interest.
    pub fn roi(&self) -> Option<RegionOfInterest> {
        self.roi
    }

    fn detect(&mut self, frame: &RgbImage, frame_index: u64) -> Vec<Detection> {
        let mut timestamp_ms = self.clock.timestamp_for(frame_index);

        let roi_due = self.detections_since_full + 1 < self.roi_refresh_interval;
        if let Some(roi) = self.roi.filter(|_| self.enable_roi && self.roi_allowed && roi_due) {
            let crop = imageops::crop_imm(frame, roi.x, roi.y, roi.width, roi.height).to_image();
            let local = self.run_detector(&crop, timestamp_ms);

            if !local.is_empty() {
                let faces: Vec<Detection> = local.iter().map(|d| roi.to_frame(d)).collect();
                self.detections_since_full += 1;
                self.arm_roi(&faces);
                return faces;
            }

            debug!(frame_index, ?roi, "No face inside ROI, widening to full frame");
            metrics::record_roi_miss();
            self.roi = None;
            timestamp_ms = self.clock.bump();
        }

        let faces = self.run_detector(frame, timestamp_ms);
        self.detections_since_full = 0;
        self.arm_roi(&faces);
        faces
    }

    /// ROI only makes sense with exactly one subject.
    fn arm_roi(&mut self, faces: &[Detection]) {
        self.roi = match faces {
            [face] if self.enable_roi && self.roi_allowed => {
                RegionOfInterest::around(face, self.roi_scale, self.frame_size, self.min_roi_size)
                    .filter(|roi| !roi.covers(self.frame_size))
            }
            _ => None,
        };
    }

    fn run_detector(&mut self, image: &RgbImage, timestamp_ms: u64) -> Vec<Detection> {
        match self.detector.detect(image, timestamp_ms) {
            Ok(detections) => detections
                .into_iter()
                .filter(|d| d.confidence >= self.min_confidence && d.width > 0.0 && d.height > 0.0)
                .collect(),
            Err(e) => {
                warn!(
                    detector = self.detector.name(),
                    timestamp_ms,
                    error = %e,
                    "Face detection failed, treating frame as empty"
                );
                metrics::record_detector_error();
                Vec::new()
            }
        }
    }
}
