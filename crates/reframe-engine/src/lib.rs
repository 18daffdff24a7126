//! Virtual-camera reframing: landscape frames in, 9:16 portrait frames out.
//!
//! A [`Reframer`] follows faces through a clip and decides per frame between
//! single-subject tracking, cinematic full-frame framing over a blurred
//! background, and a two-subject split screen. Camera motion is smoothed with
//! an adaptive LERP over a short look-ahead window so the output does not
//! jitter, and every input frame yields exactly one output frame.
//!
//! # Architecture
//!
//! ```text
//! RGB frame
//!     │
//!     ▼
//! ┌──────────────────┐
//! │ Detection Stage  │ ← injected detector, ROI, skip interval, timestamps
//! └────────┬─────────┘
//!          │
//!          ▼
//! ┌──────────────────┐
//! │ Scene Cut / Mode │ ← position jumps, single/split hysteresis
//! └────────┬─────────┘
//!          │
//!          ▼
//! ┌──────────────────┐
//! │ Anchor / Framing │ ← subject lock, cinematic transition, zoom-out
//! └────────┬─────────┘
//!          │
//!          ▼
//! ┌──────────────────┐
//! │    Look-ahead    │ ← future-averaged targets
//! └────────┬─────────┘
//!          │
//!          ▼
//! ┌──────────────────┐
//! │     Smoother     │ ← adaptive LERP per role
//! └────────┬─────────┘
//!          │
//!          ▼
//! ┌──────────────────┐
//! │    Compositor    │ ← crop, scale, stack, background
//! └────────┬─────────┘
//!          │
//!          ▼
//!   Portrait frame
//! ```

pub mod anchor;
pub mod arbiter;
pub mod compositor;
pub mod config;
pub mod detection;
pub mod detector;
pub mod engine;
pub mod error;
pub mod framing;
pub mod lookahead;
pub mod metrics;
pub mod roi;
pub mod scene_cut;
pub mod session;
pub mod smoother;
pub mod telemetry;

pub use config::{BackgroundStyle, ModePolicy, ReframeConfig};
pub use detector::{
    BackendMetrics, BackendSelector, DetectorBackend, DetectorFactory, FaceDetector, FnDetector,
};
pub use engine::{Reframer, SourceInfo};
pub use error::{ReframeError, ReframeResult};
pub use session::{ReframeSession, ReframedFrame, SessionStats};
pub use telemetry::init_tracing;

pub use reframe_models::{
    ActiveMode, CropRect, Detection, FrameLayout, FrameSize, FramingMode, TrackRole, ViewState,
};
