//! Scene cut detection from subject position jumps.
//!
//! A hard cut in the source shows up as the followed subject teleporting
//! across the frame between two detection passes. In single-subject framing
//! that is the primary (largest) face; in split framing each half is compared
//! with its own previous position. A cut starts a new scene: look-ahead
//! averaging stops at the boundary and the smoothing state is dropped so the
//! camera does not sweep across the cut.

use tracing::info;

use crate::metrics;
use crate::smoother::TrackedPoints;
use reframe_models::TrackRole;

/// Watches subject positions on detection frames.
#[derive(Debug, Clone)]
pub struct SceneCutMonitor {
    threshold_px: f64,
    last: TrackedPoints,
    cut_count: u32,
}

impl SceneCutMonitor {
    pub fn new(threshold_px: f64) -> Self {
        Self {
            threshold_px,
            last: TrackedPoints::default(),
            cut_count: 0,
        }
    }

    /// Feed the raw role positions of a detection frame. Frames without any
    /// position are ignored. Returns `true` when this frame starts a new
    /// scene, i.e. some role moved further than the threshold since the
    /// previous detection frame that reported it.
    pub fn check(&mut self, frame_index: u64, positions: &TrackedPoints) -> bool {
        if TrackRole::ALL.iter().all(|&role| positions.get(role).is_none()) {
            return false;
        }

        let jump = TrackRole::ALL
            .iter()
            .filter_map(|&role| match (positions.get(role), self.last.get(role)) {
                (Some(x), Some(last)) => Some((x - last).abs()),
                _ => None,
            })
            .fold(0.0, f64::max);
        let is_cut = jump > self.threshold_px;

        self.last = *positions;

        if is_cut {
            self.cut_count += 1;
            metrics::record_scene_cut();
            info!(
                frame = frame_index,
                cut_count = self.cut_count,
                jump_px = jump,
                "Scene cut detected"
            );
        }
        is_cut
    }

    /// Number of cuts detected.
    pub fn cut_count(&self) -> u32 {
        self.cut_count
    }
}
