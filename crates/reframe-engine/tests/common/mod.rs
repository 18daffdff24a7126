//! Synthetic clips for scenario tests.
//!
//! Faces are solid colored squares on a gray background. The marker
//! detector finds them by exact color, so it works unchanged on ROI crops.

#![allow(dead_code)]

use image::{Rgb, RgbImage};
use reframe_engine::{
    DetectorBackend, Detection, FaceDetector, FrameLayout, ReframeResult, ReframedFrame,
};

pub const BACKGROUND: Rgb<u8> = Rgb([60, 60, 60]);
pub const RED: Rgb<u8> = Rgb([255, 0, 0]);
pub const GREEN: Rgb<u8> = Rgb([0, 255, 0]);

/// A face marker: center and side length in pixels.
#[derive(Debug, Clone, Copy)]
pub struct Marker {
    pub cx: f64,
    pub cy: f64,
    pub size: u32,
    pub color: Rgb<u8>,
}

impl Marker {
    pub fn new(cx: f64, cy: f64, size: u32, color: Rgb<u8>) -> Self {
        Self {
            cx,
            cy,
            size,
            color,
        }
    }
}

/// Render a frame with the given markers.
pub fn frame(width: u32, height: u32, markers: &[Marker]) -> RgbImage {
    let mut img = RgbImage::from_pixel(width, height, BACKGROUND);
    for m in markers {
        let x0 = (m.cx - m.size as f64 / 2.0).round() as i64;
        let y0 = (m.cy - m.size as f64 / 2.0).round() as i64;
        for y in y0.max(0)..(y0 + m.size as i64).min(height as i64) {
            for x in x0.max(0)..(x0 + m.size as i64).min(width as i64) {
                img.put_pixel(x as u32, y as u32, m.color);
            }
        }
    }
    img
}

/// Detector reporting one box per marker color found in the image.
///
/// Panics when timestamps do not strictly increase, mirroring detectors
/// that reject out-of-order video timestamps.
pub struct MarkerDetector {
    colors: Vec<Rgb<u8>>,
    last_timestamp: Option<u64>,
}

impl MarkerDetector {
    pub fn new() -> Self {
        Self {
            colors: vec![RED, GREEN],
            last_timestamp: None,
        }
    }
}

impl FaceDetector for MarkerDetector {
    fn detect(&mut self, frame: &RgbImage, timestamp_ms: u64) -> ReframeResult<Vec<Detection>> {
        if let Some(last) = self.last_timestamp {
            assert!(
                timestamp_ms > last,
                "timestamp {timestamp_ms} not after {last}"
            );
        }
        self.last_timestamp = Some(timestamp_ms);

        let mut bounds: Vec<Option<(u32, u32, u32, u32)>> = vec![None; self.colors.len()];
        for (x, y, pixel) in frame.enumerate_pixels() {
            if let Some(i) = self.colors.iter().position(|c| c == pixel) {
                let b = bounds[i].get_or_insert((x, y, x, y));
                b.0 = b.0.min(x);
                b.1 = b.1.min(y);
                b.2 = b.2.max(x);
                b.3 = b.3.max(y);
            }
        }

        Ok(bounds
            .into_iter()
            .flatten()
            .map(|(x0, y0, x1, y1)| {
                Detection::from_bbox(
                    x0 as f64,
                    y0 as f64,
                    (x1 - x0 + 1) as f64,
                    (y1 - y0 + 1) as f64,
                )
                .with_confidence(0.9)
            })
            .collect())
    }

    fn name(&self) -> &str {
        "markers"
    }
}

pub fn marker_factory(_backend: DetectorBackend) -> ReframeResult<Box<dyn FaceDetector>> {
    Ok(Box::new(MarkerDetector::new()))
}

/// Camera center of a single-subject frame.
pub fn camera_x(frame: &ReframedFrame) -> Option<f64> {
    match frame.layout {
        FrameLayout::Single { camera_x, .. } => Some(camera_x),
        FrameLayout::Split { .. } => None,
    }
}
