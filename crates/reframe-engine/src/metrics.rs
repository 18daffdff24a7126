//! Metrics for the reframing engine.
//!
//! Emitted through the `metrics` facade. The library never installs a
//! recorder; without one every call is a no-op.

use metrics::{counter, gauge, histogram};
use reframe_models::{ActiveMode, FramingMode};

/// Metric names as constants for consistency.
pub mod names {
    pub const FRAMES_PROCESSED_TOTAL: &str = "reframe_frames_processed_total";
    pub const SCENE_CUTS_TOTAL: &str = "reframe_scene_cuts_total";
    pub const MODE_SWITCHES_TOTAL: &str = "reframe_mode_switches_total";
    pub const DETECTOR_FALLBACKS_TOTAL: &str = "reframe_detector_fallbacks_total";
    pub const DETECTOR_ERRORS_TOTAL: &str = "reframe_detector_errors_total";
    pub const ROI_MISSES_TOTAL: &str = "reframe_roi_misses_total";
    pub const LOOKAHEAD_DEPTH: &str = "reframe_lookahead_depth";
    pub const CLIP_DURATION_SECONDS: &str = "reframe_clip_duration_seconds";
}

/// Record an emitted frame.
pub fn record_frame(mode: FramingMode) {
    counter!(names::FRAMES_PROCESSED_TOTAL, "mode" => mode.as_str()).increment(1);
}

/// Record a detected scene cut.
pub fn record_scene_cut() {
    counter!(names::SCENE_CUTS_TOTAL).increment(1);
}

/// Record an active-mode switch.
pub fn record_mode_switch(to: ActiveMode) {
    counter!(names::MODE_SWITCHES_TOTAL, "to" => to.as_str()).increment(1);
}

/// Record an accelerated-to-default detector fallback.
pub fn record_detector_fallback() {
    counter!(names::DETECTOR_FALLBACKS_TOTAL).increment(1);
}

/// Record a detector error absorbed for one frame.
pub fn record_detector_error() {
    counter!(names::DETECTOR_ERRORS_TOTAL).increment(1);
}

/// Record an ROI miss that forced a full-frame pass.
pub fn record_roi_miss() {
    counter!(names::ROI_MISSES_TOTAL).increment(1);
}

/// Record the current look-ahead queue depth.
pub fn record_lookahead_depth(depth: usize) {
    gauge!(names::LOOKAHEAD_DEPTH).set(depth as f64);
}

/// Record wall time spent on one clip.
pub fn record_clip_duration(duration_secs: f64) {
    histogram!(names::CLIP_DURATION_SECONDS).record(duration_secs);
}
