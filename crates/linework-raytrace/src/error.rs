//! Error types for camera construction.

use thiserror::Error;

/// Errors that can occur when building a camera.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CameraError {
    /// Position and target coincide, so there is no view direction.
    #[error("camera position and target coincide")]
    Degenerate,

    /// A coordinate was NaN or infinite.
    #[error("camera has a non-finite coordinate")]
    NonFinite,
}

/// Result type for camera construction.
pub type Result<T> = std::result::Result<T, CameraError>;
