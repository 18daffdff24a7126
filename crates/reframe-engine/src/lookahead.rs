//! Look-ahead buffer.
//!
//! Frames are classified as they arrive but rendered only once enough future
//! frames are queued behind them. The camera target for a rendered frame is
//! the average of its own role positions and those of the queued future
//! frames in the same scene and active mode, so the camera starts moving
//! before the subject does.

use crate::smoother::TrackedPoints;
use image::RgbImage;
use reframe_models::{ActiveMode, FramingMode, TrackRole, ViewState};
use std::collections::VecDeque;

/// One classified input frame waiting to be rendered.
#[derive(Debug, Clone)]
pub struct FrameRecord {
    pub index: u64,
    pub frame: RgbImage,
    pub mode: FramingMode,
    pub active: ActiveMode,
    /// Raw per-role positions decided at classification time.
    pub positions: TrackedPoints,
    pub view: ViewState,
    pub scene_id: u32,
    /// First frame of a new scene.
    pub scene_cut: bool,
    /// Main-role anchor was replaced on this frame.
    pub reanchored: bool,
}

/// FIFO of [`FrameRecord`]s.
#[derive(Debug)]
pub struct LookaheadBuffer {
    queue: VecDeque<FrameRecord>,
    window: usize,
}

impl LookaheadBuffer {
    pub fn new(window: usize) -> Self {
        Self {
            queue: VecDeque::with_capacity(window + 1),
            window,
        }
    }

    pub fn push(&mut self, record: FrameRecord) {
        self.queue.push_back(record);
    }

    /// Oldest record, once more than `window` records are queued.
    pub fn pop_ready(&mut self) -> Option<FrameRecord> {
        if self.queue.len() > self.window {
            self.queue.pop_front()
        } else {
            None
        }
    }

    /// Oldest record regardless of depth (stream end).
    pub fn pop_flush(&mut self) -> Option<FrameRecord> {
        self.queue.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Averaged targets for `record`, which has just been popped.
    ///
    /// Queued records count while they share `record`'s scene and active
    /// mode; averaging stops at the first one that does not. A role with no
    /// position anywhere in that span is `None`.
    pub fn targets(&self, record: &FrameRecord) -> TrackedPoints {
        let context: Vec<&FrameRecord> = std::iter::once(record)
            .chain(
                self.queue
                    .iter()
                    .take_while(|r| r.scene_id == record.scene_id && r.active == record.active),
            )
            .collect();

        let mut targets = TrackedPoints::default();
        for role in TrackRole::ALL {
            let values: Vec<f64> = context
                .iter()
                .filter_map(|r| r.positions.get(role))
                .collect();
            if !values.is_empty() {
                targets.set(role, Some(values.iter().sum::<f64>() / values.len() as f64));
            }
        }
        targets
    }
}
