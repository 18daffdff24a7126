//! Adaptive camera smoothing.
//!
//! Each tracked role moves toward its target by a LERP factor that grows with
//! the distance still to cover:
//!
//! ```text
//! boost  = min(|target - current|, max_diff) / max_diff * boost_factor
//! factor = base_factor + boost
//! next   = current + (target - current) * factor
//! ```
//!
//! Small offsets settle slowly (no jitter), large ones catch up quickly (no
//! lag behind a walking subject).

use crate::config::ReframeConfig;
use reframe_models::TrackRole;

/// One optional horizontal position per tracked role.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrackedPoints {
    pub main: Option<f64>,
    pub top: Option<f64>,
    pub bottom: Option<f64>,
}

impl TrackedPoints {
    pub fn get(&self, role: TrackRole) -> Option<f64> {
        match role {
            TrackRole::Main => self.main,
            TrackRole::Top => self.top,
            TrackRole::Bottom => self.bottom,
        }
    }

    pub fn set(&mut self, role: TrackRole, value: Option<f64>) {
        match role {
            TrackRole::Main => self.main = value,
            TrackRole::Top => self.top = value,
            TrackRole::Bottom => self.bottom = value,
        }
    }
}

/// Smoothed positions keyed by role.
#[derive(Debug, Clone)]
pub struct AdaptiveSmoother {
    base_factor: f64,
    boost_factor: f64,
    max_diff: f64,
    state: TrackedPoints,
}

impl AdaptiveSmoother {
    pub fn new(config: &ReframeConfig) -> Self {
        Self {
            base_factor: config.smoothing_base_factor,
            boost_factor: config.smoothing_boost_factor,
            max_diff: config.smoothing_max_diff,
            state: TrackedPoints::default(),
        }
    }

    /// LERP factor for a remaining distance.
    pub fn factor(&self, distance: f64) -> f64 {
        let boost = distance.abs().min(self.max_diff) / self.max_diff * self.boost_factor;
        self.base_factor + boost
    }

    /// Move `role` one step toward `target`. The first observation of a role
    /// snaps straight to it.
    pub fn smooth(&mut self, role: TrackRole, target: f64) -> f64 {
        let next = match self.state.get(role) {
            Some(current) => {
                let diff = target - current;
                current + diff * self.factor(diff)
            }
            None => target,
        };
        self.state.set(role, Some(next));
        next
    }

    /// Last smoothed value for `role`.
    pub fn last(&self, role: TrackRole) -> Option<f64> {
        self.state.get(role)
    }

    /// Clear every role.
    pub fn reset(&mut self) {
        self.state = TrackedPoints::default();
    }

    /// Clear one role.
    pub fn reset_role(&mut self, role: TrackRole) {
        self.state.set(role, None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn smoother() -> AdaptiveSmoother {
        AdaptiveSmoother::new(&ReframeConfig::default())
    }

    #[test]
    fn test_first_observation_snaps() {
        let mut s = smoother();
        assert_eq!(s.smooth(TrackRole::Main, 700.0), 700.0);
    }

    #[test]
    fn test_factor_bounds() {
        let s = smoother();
        assert!((s.factor(0.0) - 0.02).abs() < 1e-12);
        assert!((s.factor(100.0) - 0.095).abs() < 1e-12);
        assert!((s.factor(-5000.0) - 0.17).abs() < 1e-12);
    }

    #[test]
    fn test_converges_monotonically() {
        let mut s = smoother();
        s.smooth(TrackRole::Main, 0.0);

        let mut prev = 0.0;
        let mut last = 0.0;
        for _ in 0..400 {
            last = s.smooth(TrackRole::Main, 1000.0);
            assert!(last >= prev, "{last} < {prev}");
            assert!(last <= 1000.0);
            prev = last;
        }
        assert!((last - 1000.0).abs() < 1.0, "{last}");
    }

    #[test]
    fn test_large_jump_moves_faster() {
        let mut near = smoother();
        near.smooth(TrackRole::Main, 0.0);
        let small_step = near.smooth(TrackRole::Main, 20.0);

        let mut far = smoother();
        far.smooth(TrackRole::Main, 0.0);
        let big_step = far.smooth(TrackRole::Main, 800.0);

        assert!(big_step / 800.0 > small_step / 20.0);
    }

    #[test]
    fn test_roles_are_independent() {
        let mut s = smoother();
        s.smooth(TrackRole::Top, 100.0);
        s.smooth(TrackRole::Bottom, 900.0);
        assert_eq!(s.last(TrackRole::Top), Some(100.0));
        assert_eq!(s.last(TrackRole::Bottom), Some(900.0));
        assert_eq!(s.last(TrackRole::Main), None);

        s.reset_role(TrackRole::Top);
        assert_eq!(s.last(TrackRole::Top), None);
        assert_eq!(s.last(TrackRole::Bottom), Some(900.0));

        s.reset();
        assert_eq!(s.last(TrackRole::Bottom), None);
    }
}
