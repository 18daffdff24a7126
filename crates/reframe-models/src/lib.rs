//! Shared data models for the portrait reframing engine.
//!
//! This crate provides Serde-serializable types for:
//! - Face detections in source-frame pixel coordinates
//! - Frame sizes and crop rectangles
//! - Framing modes and tracked-point roles
//! - Per-frame output layouts

pub mod detection;
pub mod geometry;
pub mod layout;
pub mod mode;

// Re-export common types
pub use detection::Detection;
pub use geometry::{CropRect, FrameSize};
pub use layout::{FrameLayout, ViewState};
pub use mode::{ActiveMode, FramingMode, ModeParseError, TrackRole};
