//! Framing modes and tracked-point roles.
//!
//! - `ActiveMode`: the persistent arbiter state (single vs. split)
//! - `FramingMode`: how a particular frame is rendered
//! - `TrackRole`: which smoothed camera point a position belongs to

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Arbiter state: one subject or several.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActiveMode {
    /// Zero or one subject.
    #[default]
    Single,
    /// Two or more subjects, rendered as stacked halves.
    Split,
}

impl ActiveMode {
    /// Candidate mode for a raw face count.
    pub fn from_face_count(count: usize) -> Self {
        if count >= 2 {
            ActiveMode::Split
        } else {
            ActiveMode::Single
        }
    }

    /// Roles rendered in this mode.
    pub fn roles(&self) -> &'static [TrackRole] {
        match self {
            ActiveMode::Single => &[TrackRole::Main],
            ActiveMode::Split => &[TrackRole::Top, TrackRole::Bottom],
        }
    }

    /// Returns the mode name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActiveMode::Single => "single",
            ActiveMode::Split => "split",
        }
    }
}

impl fmt::Display for ActiveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing a mode name.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown mode: {0}")]
pub struct ModeParseError(pub String);

impl FromStr for ActiveMode {
    type Err = ModeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" | "monologue" => Ok(ActiveMode::Single),
            "split" | "podcast" => Ok(ActiveMode::Split),
            other => Err(ModeParseError(other.to_string())),
        }
    }
}

/// Per-frame rendering path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FramingMode {
    /// Portrait crop following the anchored subject.
    Tracking,
    /// Blurred-background framing without a stable subject.
    Cinematic,
    /// Two subjects stacked top/bottom.
    Split,
}

impl FramingMode {
    /// Returns the mode name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            FramingMode::Tracking => "tracking",
            FramingMode::Cinematic => "cinematic",
            FramingMode::Split => "split",
        }
    }
}

impl fmt::Display for FramingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tracked camera point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TrackRole {
    /// Single-subject camera.
    Main,
    /// Upper half in split mode (leftmost subject).
    Top,
    /// Lower half in split mode (rightmost subject).
    Bottom,
}

impl TrackRole {
    pub const ALL: [TrackRole; 3] = [TrackRole::Main, TrackRole::Top, TrackRole::Bottom];

    /// Returns the role name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackRole::Main => "main",
            TrackRole::Top => "top",
            TrackRole::Bottom => "bottom",
        }
    }
}

impl fmt::Display for TrackRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
