//! Configuration for the reframing engine.
//!
//! All values are read once when a [`Reframer`](crate::Reframer) is
//! constructed and stay fixed for the whole clip.

use crate::error::{ReframeError, ReframeResult};
use reframe_models::ActiveMode;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Configuration for the reframing engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReframeConfig {
    // === Look-ahead ===
    /// Frames held back before emission so the camera can anticipate motion (default: 6)
    pub lookahead_frames: usize,

    // === Motion Smoothing ===
    /// Base LERP factor applied to every move (default: 0.02)
    pub smoothing_base_factor: f64,

    /// Extra LERP factor reached at `smoothing_max_diff` (default: 0.15)
    pub smoothing_boost_factor: f64,

    /// Distance in pixels at which the boost saturates (default: 200.0)
    pub smoothing_max_diff: f64,

    // === Mode Arbitration ===
    /// Auto-arbitrate or pin the active mode
    pub mode_policy: ModePolicy,

    /// Number of recent detected modes kept for hysteresis (default: 30)
    pub mode_history_size: usize,

    /// Fraction of the history that must agree before switching (default: 0.8)
    pub mode_switch_threshold: f64,

    // === Anchor Tracking ===
    /// Relative area difference still considered the same subject (default: 0.45)
    pub anchor_size_tolerance: f64,

    /// Minimum face area as fraction of frame area to lock an anchor (default: 0.04)
    pub min_face_area_ratio: f64,

    // === Cinematic Framing ===
    /// Transition change per frame toward/away from full-frame width (default: 0.05)
    pub transition_speed: f64,

    /// Face area ratio above which zoom-out protection kicks in (default: 0.13)
    pub zoom_out_face_ratio: f64,

    /// Zoom-out target gain per unit of excess face ratio (default: 3.5)
    pub zoom_out_gain: f64,

    /// Maximum zoom-out factor (default: 0.8)
    pub zoom_out_max: f64,

    /// Zoom-out ramp-up per frame (default: 0.01)
    pub zoom_out_ramp_up: f64,

    /// Zoom-out decay per frame (default: 0.02)
    pub zoom_out_decay: f64,

    /// Fraction trimmed from each side of the source before building the
    /// blurred background (default: 0.1)
    pub cinematic_margin: f64,

    /// Downscale divisor used for the background blur pass (default: 8)
    pub background_downscale: u32,

    /// Gaussian sigma applied at the downscaled background size (default: 2.0)
    pub background_blur_sigma: f32,

    /// Brightness multiplier for the background (default: 0.45)
    pub background_darken: f64,

    /// How the area around a narrowed foreground is filled
    pub background_style: BackgroundStyle,

    // === Split Mode ===
    /// Height of each split band as fraction of source height (default: 0.6)
    pub split_zoom: f64,

    // === Scene Cuts ===
    /// Primary-face jump in pixels treated as a hard cut (default: 300.0)
    pub scene_cut_threshold_px: f64,

    // === Face Detection ===
    /// Prefer the accelerated detector backend (falls back once to default)
    pub prefer_accelerated: bool,

    /// Minimum detector confidence (default: 0.6)
    pub min_detection_confidence: f64,

    /// Run detection every N frames; skipped frames reuse the last faces (default: 3)
    pub detection_skip_interval: u32,

    /// Normalized movement per frame above which every frame is scanned (default: 0.005)
    pub fast_motion_threshold: f64,

    /// Narrow detection to a region around the last single face (default: true)
    pub enable_roi: bool,

    /// ROI size as multiple of the face box (default: 3.0)
    pub roi_scale: f64,

    /// ROI sides at or below this are rejected (default: 20)
    pub min_roi_size: u32,

    /// Force a full-frame pass every N detection frames while ROI is armed (default: 15)
    pub roi_refresh_interval: u32,

    // === Input ===
    /// Downscale sources whose larger side exceeds this (default: 1920, 0 = off)
    pub max_input_dimension: u32,
}

/// How the active mode is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ModePolicy {
    /// Mode arbiter decides from detection counts.
    #[default]
    Auto,
    /// Always single-subject (monologue) framing.
    Single,
    /// Always split-screen (podcast) framing.
    Split,
}

impl ModePolicy {
    /// The pinned mode, if any.
    pub fn pinned(&self) -> Option<ActiveMode> {
        match self {
            ModePolicy::Auto => None,
            ModePolicy::Single => Some(ActiveMode::Single),
            ModePolicy::Split => Some(ActiveMode::Split),
        }
    }
}

impl FromStr for ModePolicy {
    type Err = ReframeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(ModePolicy::Auto),
            other => other
                .parse::<ActiveMode>()
                .map(|mode| match mode {
                    ActiveMode::Single => ModePolicy::Single,
                    ActiveMode::Split => ModePolicy::Split,
                })
                .map_err(|e| ReframeError::invalid_config(e.to_string())),
        }
    }
}

/// Fill used behind a foreground that no longer covers the portrait canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundStyle {
    /// Blurred, darkened copy of the source
    #[default]
    Blur,
    /// Mean frame color at 30% brightness
    AverageColor,
}

impl Default for ReframeConfig {
    fn default() -> Self {
        Self {
            // Look-ahead
            lookahead_frames: 6,

            // Motion Smoothing
            smoothing_base_factor: 0.02,
            smoothing_boost_factor: 0.15,
            smoothing_max_diff: 200.0,

            // Mode Arbitration
            mode_policy: ModePolicy::Auto,
            mode_history_size: 30,
            mode_switch_threshold: 0.8,

            // Anchor Tracking
            anchor_size_tolerance: 0.45,
            min_face_area_ratio: 0.04,

            // Cinematic Framing - 0.05/frame is a ~20 frame ease
            transition_speed: 0.05,
            zoom_out_face_ratio: 0.13,
            zoom_out_gain: 3.5,
            zoom_out_max: 0.8,
            zoom_out_ramp_up: 0.01,
            zoom_out_decay: 0.02,
            cinematic_margin: 0.1,
            background_downscale: 8,
            background_blur_sigma: 2.0,
            background_darken: 0.45,
            background_style: BackgroundStyle::Blur,

            // Split Mode
            split_zoom: 0.6,

            // Scene Cuts
            scene_cut_threshold_px: 300.0,

            // Face Detection
            prefer_accelerated: false,
            min_detection_confidence: 0.6,
            detection_skip_interval: 3,
            fast_motion_threshold: 0.005,
            enable_roi: true,
            roi_scale: 3.0,
            min_roi_size: 20,
            roi_refresh_interval: 15,

            // Input
            max_input_dimension: 1920,
        }
    }
}

impl ReframeConfig {
    /// Responsive configuration: every frame is scanned and the camera
    /// follows faster.
    pub fn responsive() -> Self {
        Self {
            detection_skip_interval: 1,
            smoothing_base_factor: 0.04,
            smoothing_boost_factor: 0.2,
            mode_history_size: 20,
            mode_switch_threshold: 0.7,
            ..Default::default()
        }
    }

    /// Caller-selected single-subject framing.
    pub fn monologue() -> Self {
        Self {
            mode_policy: ModePolicy::Single,
            ..Default::default()
        }
    }

    /// Caller-selected split-screen framing.
    pub fn podcast() -> Self {
        Self {
            mode_policy: ModePolicy::Split,
            enable_roi: false,
            ..Default::default()
        }
    }

    /// Votes required in the history buffer before the active mode switches.
    pub fn required_votes(&self) -> usize {
        // Guard against 30 * 0.7 = 21.000000000000004 rounding up to 22.
        let raw = self.mode_history_size as f64 * self.mode_switch_threshold - 1e-9;
        (raw.ceil().max(1.0) as usize).min(self.mode_history_size.max(1))
    }

    /// Check every value is usable. Called by the engine constructor.
    pub fn validate(&self) -> ReframeResult<()> {
        if self.lookahead_frames == 0 {
            return Err(ReframeError::invalid_config("lookahead_frames must be > 0"));
        }
        if self.mode_history_size == 0 {
            return Err(ReframeError::invalid_config("mode_history_size must be > 0"));
        }
        if self.detection_skip_interval == 0 {
            return Err(ReframeError::invalid_config(
                "detection_skip_interval must be >= 1",
            ));
        }
        if self.background_downscale == 0 {
            return Err(ReframeError::invalid_config("background_downscale must be >= 1"));
        }

        let unit_fields = [
            ("smoothing_base_factor", self.smoothing_base_factor),
            ("smoothing_boost_factor", self.smoothing_boost_factor),
            ("mode_switch_threshold", self.mode_switch_threshold),
            ("anchor_size_tolerance", self.anchor_size_tolerance),
            ("min_face_area_ratio", self.min_face_area_ratio),
            ("transition_speed", self.transition_speed),
            ("zoom_out_face_ratio", self.zoom_out_face_ratio),
            ("zoom_out_max", self.zoom_out_max),
            ("zoom_out_ramp_up", self.zoom_out_ramp_up),
            ("zoom_out_decay", self.zoom_out_decay),
            ("background_darken", self.background_darken),
            ("min_detection_confidence", self.min_detection_confidence),
            ("fast_motion_threshold", self.fast_motion_threshold),
        ];
        for (name, value) in unit_fields {
            if !(0.0..=1.0).contains(&value) {
                return Err(ReframeError::invalid_config(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }

        if !(self.smoothing_base_factor.is_finite() && self.smoothing_base_factor > 0.0) {
            return Err(ReframeError::invalid_config(
                "smoothing_base_factor must be > 0 for the camera to converge",
            ));
        }
        if self.smoothing_base_factor + self.smoothing_boost_factor > 1.0 {
            return Err(ReframeError::invalid_config(
                "smoothing_base_factor + smoothing_boost_factor must not exceed 1",
            ));
        }
        if !(self.mode_switch_threshold.is_finite() && self.mode_switch_threshold > 0.0) {
            return Err(ReframeError::invalid_config("mode_switch_threshold must be > 0"));
        }
        if !(self.smoothing_max_diff.is_finite() && self.smoothing_max_diff > 0.0) {
            return Err(ReframeError::invalid_config(format!(
                "smoothing_max_diff must be finite and > 0, got {}",
                self.smoothing_max_diff
            )));
        }
        if !(self.scene_cut_threshold_px.is_finite() && self.scene_cut_threshold_px > 0.0) {
            return Err(ReframeError::invalid_config(format!(
                "scene_cut_threshold_px must be finite and > 0, got {}",
                self.scene_cut_threshold_px
            )));
        }
        if !(self.zoom_out_gain.is_finite() && self.zoom_out_gain >= 0.0) {
            return Err(ReframeError::invalid_config(format!(
                "zoom_out_gain must be finite and >= 0, got {}",
                self.zoom_out_gain
            )));
        }
        if !(self.split_zoom > 0.0 && self.split_zoom <= 1.0) {
            return Err(ReframeError::invalid_config(format!(
                "split_zoom must be within (0, 1], got {}",
                self.split_zoom
            )));
        }
        if !(0.0..0.5).contains(&self.cinematic_margin) {
            return Err(ReframeError::invalid_config(format!(
                "cinematic_margin must be within [0, 0.5), got {}",
                self.cinematic_margin
            )));
        }
        if !(self.roi_scale.is_finite() && self.roi_scale >= 1.0) {
            return Err(ReframeError::invalid_config(format!(
                "roi_scale must be finite and >= 1, got {}",
                self.roi_scale
            )));
        }
        if !(self.background_blur_sigma.is_finite() && self.background_blur_sigma >= 0.0) {
            return Err(ReframeError::invalid_config(format!(
                "background_blur_sigma must be finite and >= 0, got {}",
                self.background_blur_sigma
            )));
        }

        Ok(())
    }

    /// Parse from a JSON object. Missing keys keep their defaults.
    pub fn from_json_str(json: &str) -> ReframeResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a JSON file. Missing keys keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> ReframeResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Create config from `REFRAME_*` environment variables.
    ///
    /// Unset or unparsable variables keep their defaults.
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            lookahead_frames: env_or("REFRAME_LOOKAHEAD_FRAMES", d.lookahead_frames),
            smoothing_base_factor: env_or("REFRAME_SMOOTHING_BASE", d.smoothing_base_factor),
            smoothing_boost_factor: env_or("REFRAME_SMOOTHING_BOOST", d.smoothing_boost_factor),
            smoothing_max_diff: env_or("REFRAME_SMOOTHING_MAX_DIFF", d.smoothing_max_diff),
            mode_policy: env_or("REFRAME_MODE", d.mode_policy),
            mode_history_size: env_or("REFRAME_MODE_HISTORY", d.mode_history_size),
            mode_switch_threshold: env_or("REFRAME_MODE_THRESHOLD", d.mode_switch_threshold),
            anchor_size_tolerance: env_or("REFRAME_ANCHOR_TOLERANCE", d.anchor_size_tolerance),
            min_face_area_ratio: env_or("REFRAME_MIN_FACE_AREA", d.min_face_area_ratio),
            split_zoom: env_or("REFRAME_SPLIT_ZOOM", d.split_zoom),
            cinematic_margin: env_or("REFRAME_CINEMATIC_MARGIN", d.cinematic_margin),
            scene_cut_threshold_px: env_or("REFRAME_SCENE_CUT_PX", d.scene_cut_threshold_px),
            prefer_accelerated: env_or("REFRAME_USE_GPU", d.prefer_accelerated),
            detection_skip_interval: env_or("REFRAME_SKIP_FRAMES", d.detection_skip_interval),
            enable_roi: env_or("REFRAME_ROI", d.enable_roi),
            max_input_dimension: env_or("REFRAME_MAX_INPUT_DIMENSION", d.max_input_dimension),
            ..d
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
