//! Subject anchoring for single-subject framing.
//!
//! The anchor remembers the area and horizontal position of the face being
//! followed. A detection whose area is close to the anchor's is the same
//! subject; a very different area is either a new subject worth jumping to
//! (large enough) or noise that drops the camera into cinematic framing.

use crate::config::ReframeConfig;
use reframe_models::Detection;
use tracing::debug;

/// Remembered subject.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorState {
    pub area: f64,
    pub x: f64,
}

/// What the single-subject path should do for one detection result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnchorDecision {
    /// Follow `x`. `reanchored` is set when the anchor was replaced by a new
    /// subject and smoothing for the main track must restart.
    Track { x: f64, reanchored: bool },
    /// No usable subject; widen to the full frame.
    Cinematic,
}

/// Tracks the anchored subject across detection frames.
#[derive(Debug, Clone)]
pub struct AnchorTracker {
    state: Option<AnchorState>,
    size_tolerance: f64,
    min_area_ratio: f64,
}

impl AnchorTracker {
    pub fn new(config: &ReframeConfig) -> Self {
        Self {
            state: None,
            size_tolerance: config.anchor_size_tolerance,
            min_area_ratio: config.min_face_area_ratio,
        }
    }

    /// Evaluate the faces of one detection frame.
    pub fn evaluate(&mut self, faces: &[Detection], frame_area: f64) -> AnchorDecision {
        let Some(main) = Detection::largest(faces) else {
            return AnchorDecision::Cinematic;
        };
        let area = main.area();

        if let Some(anchor) = self.state.as_mut().filter(|a| a.area > 0.0) {
            let diff = (area - anchor.area).abs() / anchor.area;
            if diff < self.size_tolerance {
                anchor.area = anchor.area * 0.9 + area * 0.1;
                anchor.x = main.cx;
                return AnchorDecision::Track {
                    x: main.cx,
                    reanchored: false,
                };
            }
        }

        if frame_area > 0.0 && area / frame_area > self.min_area_ratio {
            let reanchored = self.state.is_some();
            if reanchored {
                debug!(area, x = main.cx, "Re-anchoring on new subject");
            }
            self.state = Some(AnchorState { area, x: main.cx });
            return AnchorDecision::Track {
                x: main.cx,
                reanchored,
            };
        }

        AnchorDecision::Cinematic
    }

    /// Current anchor.
    pub fn state(&self) -> Option<AnchorState> {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME_AREA: f64 = 1920.0 * 1080.0;

    fn face(cx: f64, side: f64) -> Detection {
        Detection::new(cx, 540.0, side, side)
    }

    fn tracker() -> AnchorTracker {
        AnchorTracker::new(&ReframeConfig::default())
    }

    #[test]
    fn test_no_faces_is_cinematic() {
        assert_eq!(tracker().evaluate(&[], FRAME_AREA), AnchorDecision::Cinematic);
    }

    #[test]
    fn test_small_face_without_anchor_is_cinematic() {
        // 200x200 is ~1.9% of 1080p.
        let mut t = tracker();
        assert_eq!(t.evaluate(&[face(900.0, 200.0)], FRAME_AREA), AnchorDecision::Cinematic);
        assert!(t.state().is_none());
    }

    #[test]
    fn test_large_face_anchors() {
        let mut t = tracker();
        let d = t.evaluate(&[face(900.0, 320.0)], FRAME_AREA);
        assert_eq!(d, AnchorDecision::Track { x: 900.0, reanchored: false });
        assert_eq!(t.state().unwrap().area, 320.0 * 320.0);
    }

    #[test]
    fn test_similar_face_blends_area() {
        let mut t = tracker();
        t.evaluate(&[face(900.0, 320.0)], FRAME_AREA);
        let d = t.evaluate(&[face(950.0, 330.0)], FRAME_AREA);
        assert_eq!(d, AnchorDecision::Track { x: 950.0, reanchored: false });

        let expected = 320.0 * 320.0 * 0.9 + 330.0 * 330.0 * 0.1;
        assert!((t.state().unwrap().area - expected).abs() < 1e-6);
    }

    #[test]
    fn test_similar_small_face_still_tracked() {
        // Once anchored, a similar face keeps tracking even under the
        // minimum area ratio.
        let mut t = AnchorTracker::new(&ReframeConfig {
            min_face_area_ratio: 0.04,
            ..Default::default()
        });
        t.evaluate(&[face(900.0, 300.0)], FRAME_AREA);
        let d = t.evaluate(&[face(910.0, 280.0)], FRAME_AREA);
        assert!(matches!(d, AnchorDecision::Track { reanchored: false, .. }));
    }

    #[test]
    fn test_different_large_face_reanchors() {
        let mut t = tracker();
        t.evaluate(&[face(900.0, 300.0)], FRAME_AREA);
        let d = t.evaluate(&[face(400.0, 600.0)], FRAME_AREA);
        assert_eq!(d, AnchorDecision::Track { x: 400.0, reanchored: true });
        assert_eq!(t.state().unwrap().x, 400.0);
    }

    #[test]
    fn test_different_small_face_is_cinematic() {
        let mut t = tracker();
        t.evaluate(&[face(900.0, 400.0)], FRAME_AREA);
        let d = t.evaluate(&[face(400.0, 100.0)], FRAME_AREA);
        assert_eq!(d, AnchorDecision::Cinematic);
        // The old anchor survives.
        assert_eq!(t.state().unwrap().x, 900.0);
    }

    #[test]
    fn test_largest_face_wins() {
        let mut t = tracker();
        let d = t.evaluate(&[face(300.0, 100.0), face(1500.0, 350.0)], FRAME_AREA);
        assert_eq!(d, AnchorDecision::Track { x: 1500.0, reanchored: false });
    }
}
