//! Active-mode arbitration with hysteresis.
//!
//! Every frame votes for `Single` (0-1 faces) or `Split` (2+
//! faces). The active mode only changes once the alternative collects
//! `required_votes` of the last `history_size` votes, so a second face
//! flickering in for a handful of frames never toggles the layout.

use crate::config::ReframeConfig;
use crate::metrics;
use reframe_models::ActiveMode;
use std::collections::VecDeque;
use tracing::info;

/// Result of one arbitration step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeDecision {
    pub mode: ActiveMode,
    pub switched: bool,
}

/// Mode arbiter for one clip.
#[derive(Debug, Clone)]
pub struct ModeArbiter {
    history: VecDeque<ActiveMode>,
    history_size: usize,
    required_votes: usize,
    pinned: Option<ActiveMode>,
    current: ActiveMode,
    switch_count: u32,
}

impl ModeArbiter {
    /// Create an arbiter from config.
    pub fn new(config: &ReframeConfig) -> Self {
        let pinned = config.mode_policy.pinned();
        Self {
            history: VecDeque::with_capacity(config.mode_history_size),
            history_size: config.mode_history_size.max(1),
            required_votes: config.required_votes(),
            pinned,
            current: pinned.unwrap_or_default(),
            switch_count: 0,
        }
    }

    /// Record one frame's vote from its face count.
    pub fn observe(&mut self, face_count: usize) -> ModeDecision {
        if let Some(mode) = self.pinned {
            return ModeDecision {
                mode,
                switched: false,
            };
        }

        if self.history.len() == self.history_size {
            self.history.pop_front();
        }
        self.history.push_back(ActiveMode::from_face_count(face_count));

        let alternative = match self.current {
            ActiveMode::Single => ActiveMode::Split,
            ActiveMode::Split => ActiveMode::Single,
        };
        let votes = self.history.iter().filter(|m| **m == alternative).count();

        let switched = votes >= self.required_votes;
        if switched {
            info!(
                from = %self.current,
                to = %alternative,
                votes,
                required = self.required_votes,
                "Active mode switched"
            );
            metrics::record_mode_switch(alternative);
            self.current = alternative;
            self.switch_count += 1;
        }

        ModeDecision {
            mode: self.current,
            switched,
        }
    }

    /// Current active mode.
    pub fn current(&self) -> ActiveMode {
        self.current
    }

    /// Number of switches so far.
    pub fn switch_count(&self) -> u32 {
        self.switch_count
    }

    /// Votes needed to switch.
    pub fn required_votes(&self) -> usize {
        self.required_votes
    }
}
