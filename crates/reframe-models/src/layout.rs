//! Output layout of a reframed frame.

use crate::geometry::CropRect;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Continuous single-subject view parameters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct ViewState {
    /// 0.0 = tracking-width crop, 1.0 = full-frame width.
    pub transition: f64,
    /// Close-up protection widening (0.0-0.8).
    pub zoom_out: f64,
}

/// How an output frame was assembled from its source frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FrameLayout {
    /// One crop, scaled to the output width.
    Single {
        /// Smoothed camera center before transition blending.
        camera_x: f64,
        /// Foreground crop in source coordinates.
        crop: CropRect,
        /// View parameters used for the crop width and center.
        view: ViewState,
        /// Whether a background was composited behind the foreground.
        background: bool,
    },
    /// Two crops stacked vertically.
    Split {
        top_x: f64,
        bottom_x: f64,
        top: CropRect,
        bottom: CropRect,
    },
}

impl FrameLayout {
    /// All crop rectangles used by this layout.
    pub fn crops(&self) -> Vec<CropRect> {
        match self {
            FrameLayout::Single { crop, .. } => vec![*crop],
            FrameLayout::Split { top, bottom, .. } => vec![*top, *bottom],
        }
    }
}
