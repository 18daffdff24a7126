//! Error types for reframing operations.

use reframe_models::FrameSize;
use thiserror::Error;

/// Result type for reframing operations.
pub type ReframeResult<T> = Result<T, ReframeError>;

/// Errors that can occur while constructing or driving a reframing engine.
///
/// Per-frame recoverable conditions (empty detections, ROI misses, a detector
/// erroring on one frame) never surface here; they are logged and absorbed.
#[derive(Debug, Error)]
pub enum ReframeError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("Invalid source: {0}")]
    InvalidSource(String),

    #[error("Detector initialization failed on {backend} backend: {message}")]
    DetectorInit { backend: String, message: String },

    #[error("Face detection failed: {0}")]
    DetectionFailed(String),

    #[error("Frame dimension mismatch: expected {expected}, got {actual}")]
    FrameDimensionMismatch {
        expected: FrameSize,
        actual: FrameSize,
    },

    #[error("Frame stream already flushed")]
    StreamClosed,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ReframeError {
    /// Create an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    /// Create an invalid source error.
    pub fn invalid_source(message: impl Into<String>) -> Self {
        Self::InvalidSource(message.into())
    }

    /// Create a detector initialization error.
    pub fn detector_init(backend: impl ToString, message: impl Into<String>) -> Self {
        Self::DetectorInit {
            backend: backend.to_string(),
            message: message.into(),
        }
    }

    /// Create a detection failure error.
    pub fn detection_failed(message: impl Into<String>) -> Self {
        Self::DetectionFailed(message.into())
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}
