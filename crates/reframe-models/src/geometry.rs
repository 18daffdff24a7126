//! Frame sizes and crop rectangles.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Pixel dimensions of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    /// Create a new frame size.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Frame area in pixels.
    #[inline]
    pub fn area(&self) -> f64 {
        self.width as f64 * self.height as f64
    }

    /// Horizontal center.
    #[inline]
    pub fn center_x(&self) -> f64 {
        self.width as f64 / 2.0
    }

    /// 9:16 portrait size for this source height.
    ///
    /// The height is kept and the width is `height * 9 / 16` rounded to the
    /// nearest even number (608 for a 1080-line source), never wider than the
    /// source itself.
    pub fn portrait(&self) -> FrameSize {
        let ideal = self.height as f64 * 9.0 / 16.0;
        let even = ((ideal / 2.0).round() as u32 * 2).max(2);
        FrameSize::new(even.min(self.width.max(2)), self.height)
    }

    /// Scale down so the larger side is at most `max_dimension`.
    ///
    /// Returns `None` when the frame already fits.
    pub fn capped(&self, max_dimension: u32) -> Option<FrameSize> {
        let largest = self.width.max(self.height);
        if largest <= max_dimension || max_dimension == 0 {
            return None;
        }
        let scale = max_dimension as f64 / largest as f64;
        Some(FrameSize::new(
            ((self.width as f64 * scale) as u32).max(1),
            ((self.height as f64 * scale) as u32).max(1),
        ))
    }
}

impl std::fmt::Display for FrameSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Crop rectangle in source-frame pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CropRect {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
    /// Create a new crop rectangle.
    pub fn new(left: u32, top: u32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Right edge (exclusive).
    #[inline]
    pub fn right(&self) -> u32 {
        self.left + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub fn bottom(&self) -> u32 {
        self.top + self.height
    }

    /// Horizontal center.
    #[inline]
    pub fn center_x(&self) -> f64 {
        self.left as f64 + self.width as f64 / 2.0
    }

    /// Whether the rectangle lies fully inside a frame of the given size.
    pub fn fits_within(&self, frame: FrameSize) -> bool {
        self.width > 0 && self.height > 0 && self.right() <= frame.width && self.bottom() <= frame.height
    }
}
