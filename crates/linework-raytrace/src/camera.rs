//! Viewpoint description used by the visibility oracle and outline generators.
//!
//! Only the eye position and view direction are modelled; projecting to 2D
//! is left to whatever consumes the output curves.

use linework_math::{Point3, Vec3};

use crate::error::{CameraError, Result};

/// Projection model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    /// Rays diverge from the eye position.
    Perspective,
    /// Rays are parallel to the view direction.
    Orthographic,
}

/// A camera looking from `position` toward `target`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Projection model.
    pub projection: Projection,
    /// Eye position.
    pub position: Point3,
    /// Point looked at.
    pub target: Point3,
    /// Unit view direction, `normalize(target - position)`.
    pub forward: Vec3,
}

impl Camera {
    /// A perspective camera.
    pub fn perspective(position: Point3, target: Point3) -> Result<Self> {
        Self::build(Projection::Perspective, position, target)
    }

    /// An orthographic camera.
    pub fn orthographic(position: Point3, target: Point3) -> Result<Self> {
        Self::build(Projection::Orthographic, position, target)
    }

    fn build(projection: Projection, position: Point3, target: Point3) -> Result<Self> {
        let finite = position
            .coords
            .iter()
            .chain(target.coords.iter())
            .all(|c| c.is_finite());
        if !finite {
            return Err(CameraError::NonFinite);
        }
        let d = target - position;
        let len = d.norm();
        if len <= 1e-12 {
            return Err(CameraError::Degenerate);
        }
        Ok(Self {
            projection,
            position,
            target,
            forward: d / len,
        })
    }

    /// True for orthographic cameras.
    #[inline]
    pub fn is_orthographic(&self) -> bool {
        self.projection == Projection::Orthographic
    }
}
