//! Face detection records.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One face observation for one frame, in source-frame pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Detection {
    /// Center x-coordinate
    pub cx: f64,
    /// Center y-coordinate
    pub cy: f64,
    /// Box width
    pub width: f64,
    /// Box height
    pub height: f64,
    /// Detector confidence (0.0-1.0)
    pub confidence: f64,
}

impl Detection {
    /// Create a detection from its center and size.
    pub fn new(cx: f64, cy: f64, width: f64, height: f64) -> Self {
        Self {
            cx,
            cy,
            width,
            height,
            confidence: 1.0,
        }
    }

    /// Create a detection from a top-left anchored box.
    pub fn from_bbox(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(x + width / 2.0, y + height / 2.0, width, height)
    }

    /// Set the detector confidence.
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    /// Box area in pixels.
    #[inline]
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Left edge x-coordinate.
    #[inline]
    pub fn x(&self) -> f64 {
        self.cx - self.width / 2.0
    }

    /// Top edge y-coordinate.
    #[inline]
    pub fn y(&self) -> f64 {
        self.cy - self.height / 2.0
    }

    /// Shift the detection by an offset (used to map ROI-local boxes back
    /// into full-frame coordinates).
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self {
            cx: self.cx + dx,
            cy: self.cy + dy,
            ..*self
        }
    }

    /// Pick the largest detection by area. Ties keep the earliest entry.
    pub fn largest(detections: &[Detection]) -> Option<&Detection> {
        detections.iter().fold(None, |best: Option<&Detection>, d| match best {
            Some(b) if b.area() >= d.area() => Some(b),
            _ => Some(d),
        })
    }
}
