//! Region of interest used to narrow detector input.

use reframe_models::{Detection, FrameSize};

/// Integer pixel rectangle around the last main face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionOfInterest {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl RegionOfInterest {
    /// Box `scale` times the size of `face`, centered on it and clamped to
    /// the frame.
    ///
    /// Returns `None` when the clamped region has a side at or below
    /// `min_size` pixels.
    pub fn around(face: &Detection, scale: f64, frame: FrameSize, min_size: u32) -> Option<Self> {
        let w = face.width * scale;
        let h = face.height * scale;
        let x0 = (face.cx - w / 2.0).floor().max(0.0);
        let y0 = (face.cy - h / 2.0).floor().max(0.0);
        let x1 = (face.cx + w / 2.0).ceil().min(frame.width as f64);
        let y1 = (face.cy + h / 2.0).ceil().min(frame.height as f64);

        if x1 <= x0 || y1 <= y0 {
            return None;
        }

        let roi = Self {
            x: x0 as u32,
            y: y0 as u32,
            width: (x1 - x0) as u32,
            height: (y1 - y0) as u32,
        };
        (roi.width > min_size && roi.height > min_size).then_some(roi)
    }

    /// Map a detection from ROI-local coordinates back to the full frame.
    pub fn to_frame(&self, detection: &Detection) -> Detection {
        detection.translate(self.x as f64, self.y as f64)
    }

    /// Whether the region covers the whole frame (narrowing is pointless).
    pub fn covers(&self, frame: FrameSize) -> bool {
        self.x == 0 && self.y == 0 && self.width >= frame.width && self.height >= frame.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: FrameSize = FrameSize {
        width: 1920,
        height: 1080,
    };

    #[test]
    fn test_roi_is_three_times_face() {
        let face = Detection::new(960.0, 540.0, 100.0, 120.0);
        let roi = RegionOfInterest::around(&face, 3.0, FRAME, 20).unwrap();
        assert_eq!(roi, RegionOfInterest { x: 810, y: 360, width: 300, height: 360 });
    }

    #[test]
    fn test_roi_clamped_to_frame() {
        let face = Detection::new(20.0, 30.0, 100.0, 100.0);
        let roi = RegionOfInterest::around(&face, 3.0, FRAME, 20).unwrap();
        assert_eq!((roi.x, roi.y), (0, 0));
        assert_eq!((roi.width, roi.height), (170, 180));
    }

    #[test]
    fn test_tiny_roi_rejected() {
        let face = Detection::new(500.0, 500.0, 6.0, 6.0);
        assert!(RegionOfInterest::around(&face, 3.0, FRAME, 20).is_none());
    }

    #[test]
    fn test_to_frame_translates() {
        let roi = RegionOfInterest { x: 800, y: 300, width: 300, height: 300 };
        let local = Detection::new(150.0, 150.0, 100.0, 100.0);
        let global = roi.to_frame(&local);
        assert_eq!((global.cx, global.cy), (950.0, 450.0));
    }

    #[test]
    fn test_covers() {
        let face = Detection::new(960.0, 540.0, 1000.0, 600.0);
        let roi = RegionOfInterest::around(&face, 3.0, FRAME, 20).unwrap();
        assert!(roi.covers(FRAME));
    }
}
