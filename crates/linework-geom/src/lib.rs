#![warn(missing_docs)]

//! Curve and solid types for the linework hidden-line renderer.
//!
//! [`CubicBezier3`] is the single curve representation passed between every
//! stage: generated outlines, fitted intersection curves and the labeled
//! output pieces are all cubics. The [`shape`] module holds the analytic
//! solids; their constructors are the only fallible operations in the
//! renderer.

mod arc;
mod bezier;
pub mod error;
pub mod shape;

pub use arc::{arc_handle_ratio, arc_to_cubics, circle_to_cubics};
pub use bezier::CubicBezier3;
pub use error::{GeometryError, Result};
pub use shape::{BoxAabb, Cone, ConeCap, Cylinder, CylinderCaps, Disk, PlaneRect, Sphere};
