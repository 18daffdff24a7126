//! Single-subject framing state: cinematic transition, zoom-out protection
//! and subject motion.
//!
//! Runs once per frame while the active mode is `Single`. The anchor
//! decision of the last detection frame says whether the camera tracks a
//! subject or eases out to the cinematic full-frame view.

use crate::config::ReframeConfig;
use reframe_models::{FrameSize, FramingMode, ViewState};

/// Framing decision for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FramingStep {
    /// `Tracking` or `Cinematic`.
    pub mode: FramingMode,
    /// Horizontal target for the main role; `None` in cinematic framing.
    pub target_x: Option<f64>,
    pub view: ViewState,
}

/// Transition, zoom-out and motion state for single-subject framing.
#[derive(Debug, Clone)]
pub struct SingleFraming {
    view: ViewState,
    transition_speed: f64,
    zoom_out_face_ratio: f64,
    zoom_out_gain: f64,
    zoom_out_max: f64,
    zoom_out_ramp_up: f64,
    zoom_out_decay: f64,
    frame_width: f64,
    last_target_x: f64,
    movement_speed: f64,
}

impl SingleFraming {
    pub fn new(config: &ReframeConfig, frame: FrameSize) -> Self {
        Self {
            view: ViewState::default(),
            transition_speed: config.transition_speed,
            zoom_out_face_ratio: config.zoom_out_face_ratio,
            zoom_out_gain: config.zoom_out_gain,
            zoom_out_max: config.zoom_out_max,
            zoom_out_ramp_up: config.zoom_out_ramp_up,
            zoom_out_decay: config.zoom_out_decay,
            frame_width: frame.width as f64,
            last_target_x: frame.center_x(),
            movement_speed: 0.0,
        }
    }

    /// Advance one frame.
    ///
    /// `tracked_x` is the anchored subject position (`None` for cinematic),
    /// `face_ratio` the dominant face area over the frame area. Subject
    /// motion is only measured on `fresh` detection frames, normalized by
    /// the frame width and the current detection `interval`.
    pub fn advance(
        &mut self,
        tracked_x: Option<f64>,
        face_ratio: f64,
        fresh: bool,
        interval: u32,
    ) -> FramingStep {
        let center = self.frame_width / 2.0;

        if fresh {
            match tracked_x {
                Some(x) => {
                    self.movement_speed = (x - self.last_target_x).abs()
                        / self.frame_width
                        / interval.max(1) as f64;
                    self.last_target_x = x;
                }
                None => {
                    self.movement_speed = 0.0;
                    self.last_target_x = center;
                }
            }
        }

        let step = match tracked_x {
            Some(_) => self.transition_speed + self.movement_speed * 1.5,
            None => -self.transition_speed,
        };
        self.view.transition = (self.view.transition - step).clamp(0.0, 1.0);

        let zoom_target = match tracked_x {
            Some(_) if face_ratio > self.zoom_out_face_ratio => {
                ((face_ratio - self.zoom_out_face_ratio) * self.zoom_out_gain).min(self.zoom_out_max)
            }
            _ => 0.0,
        };
        let zoom = self.view.zoom_out;
        self.view.zoom_out = if zoom_target > zoom {
            (zoom + self.zoom_out_ramp_up).min(zoom_target)
        } else {
            (zoom - self.zoom_out_decay).max(zoom_target)
        }
        .clamp(0.0, self.zoom_out_max);

        match tracked_x {
            Some(x) => FramingStep {
                mode: FramingMode::Tracking,
                target_x: Some(if self.view.transition >= 0.9 { center } else { x }),
                view: self.view,
            },
            None => FramingStep {
                mode: FramingMode::Cinematic,
                target_x: None,
                view: self.view,
            },
        }
    }

    /// Last measured subject speed (fraction of frame width per frame).
    pub fn movement_speed(&self) -> f64 {
        self.movement_speed
    }

    pub fn view(&self) -> ViewState {
        self.view
    }

    /// Forget motion history after a scene cut.
    pub fn reset_motion(&mut self) {
        self.last_target_x = self.frame_width / 2.0;
        self.movement_speed = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn framing() -> SingleFraming {
        SingleFraming::new(&ReframeConfig::default(), FrameSize::new(1920, 1080))
    }

    #[test]
    fn test_cinematic_eases_out() {
        let mut f = framing();
        let mut last = 0.0;
        for _ in 0..10 {
            let step = f.advance(None, 0.0, true, 3);
            assert_eq!(step.mode, FramingMode::Cinematic);
            assert!(step.view.transition > last);
            last = step.view.transition;
        }
        assert!((last - 0.5).abs() < 1e-9);

        for _ in 0..20 {
            f.advance(None, 0.0, false, 3);
        }
        assert_eq!(f.view().transition, 1.0);
    }

    #[test]
    fn test_tracking_eases_back_in() {
        let mut f = framing();
        for _ in 0..30 {
            f.advance(None, 0.0, true, 3);
        }
        let step = f.advance(Some(960.0), 0.05, true, 3);
        assert_eq!(step.mode, FramingMode::Tracking);
        assert!((step.view.transition - 0.95).abs() < 1e-9);

        for _ in 0..30 {
            f.advance(Some(960.0), 0.05, true, 3);
        }
        assert_eq!(f.view().transition, 0.0);
    }

    #[test]
    fn test_center_gate_while_mostly_cinematic() {
        let mut f = framing();
        for _ in 0..30 {
            f.advance(None, 0.0, true, 1);
        }
        // Subject off-center but the view is still mostly wide.
        let step = f.advance(Some(1500.0), 0.05, false, 1);
        assert!(step.view.transition >= 0.9);
        assert_eq!(step.target_x, Some(960.0));

        for _ in 0..5 {
            f.advance(Some(1500.0), 0.05, false, 1);
        }
        let step = f.advance(Some(1500.0), 0.05, false, 1);
        assert!(step.view.transition < 0.9);
        assert_eq!(step.target_x, Some(1500.0));
    }

    #[test]
    fn test_fast_motion_speeds_transition() {
        let mut slow = framing();
        let mut fast = framing();
        for _ in 0..30 {
            slow.advance(None, 0.0, true, 1);
            fast.advance(None, 0.0, true, 1);
        }
        let s = slow.advance(Some(960.0), 0.05, true, 1);
        let q = fast.advance(Some(1600.0), 0.05, true, 1);
        assert!(fast.movement_speed() > slow.movement_speed());
        assert!(q.view.transition < s.view.transition);
    }

    #[test]
    fn test_zoom_out_ramps_and_decays() {
        let mut f = framing();
        // 30% of frame: target = min(0.8, 0.17 * 3.5) = 0.595.
        for _ in 0..5 {
            f.advance(Some(960.0), 0.30, true, 3);
        }
        assert!((f.view().zoom_out - 0.05).abs() < 1e-9);

        for _ in 0..200 {
            f.advance(Some(960.0), 0.30, false, 3);
        }
        assert!((f.view().zoom_out - 0.595).abs() < 1e-9);

        f.advance(Some(960.0), 0.05, false, 3);
        assert!((f.view().zoom_out - 0.575).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_out_capped() {
        let mut f = framing();
        for _ in 0..300 {
            f.advance(Some(960.0), 0.9, false, 3);
        }
        assert!((f.view().zoom_out - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_movement_speed_normalized_by_interval() {
        let mut f = framing();
        f.advance(Some(960.0), 0.05, true, 3);
        f.advance(Some(960.0 + 57.6), 0.05, true, 3);
        // 57.6 / 1920 / 3
        assert!((f.movement_speed() - 0.01).abs() < 1e-12);

        f.reset_motion();
        assert_eq!(f.movement_speed(), 0.0);
    }
}
