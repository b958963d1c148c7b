//! Error types for solid construction.

use thiserror::Error;

/// Errors raised when a solid is built from invalid dimensions.
///
/// These only occur at construction time. Every algorithm that consumes a
/// constructed solid is total.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// A radius was zero, negative or NaN.
    #[error("{shape} radius must be positive, got {radius}")]
    NonPositiveRadius {
        /// Kind of solid being built.
        shape: &'static str,
        /// Offending value.
        radius: f64,
    },

    /// A height or half-extent was zero, negative or NaN.
    #[error("{shape} {what} must be positive, got {value}")]
    NonPositiveExtent {
        /// Kind of solid being built.
        shape: &'static str,
        /// Which dimension.
        what: &'static str,
        /// Offending value.
        value: f64,
    },

    /// An axis or normal vector had (near) zero length.
    #[error("{shape} {what} has zero length")]
    ZeroDirection {
        /// Kind of solid being built.
        shape: &'static str,
        /// Which vector.
        what: &'static str,
    },

    /// A coordinate was NaN or infinite.
    #[error("{0} has a non-finite coordinate")]
    NonFinite(&'static str),

    /// Box min corner exceeds max corner on some axis.
    #[error("box extents are inverted on the {axis} axis ({min} > {max})")]
    InvertedBox {
        /// Axis name.
        axis: char,
        /// Min coordinate.
        min: f64,
        /// Max coordinate.
        max: f64,
    },
}

/// Result type for solid construction.
pub type Result<T> = std::result::Result<T, GeometryError>;
