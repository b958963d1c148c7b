//! Scene primitives: a closed set of solid kinds tagged with an arena id.

use std::fmt;

use linework_geom::{BoxAabb, Cone, Cylinder, Disk, PlaneRect, Sphere};

use crate::intersect::{
    intersect_box, intersect_cone, intersect_cylinder, intersect_disk, intersect_plane_rect,
    intersect_sphere, SurfaceHit,
};
use crate::{Ray, RayHit};

/// Index of a primitive within its [`Scene`](crate::Scene).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PrimitiveId(pub u32);

impl fmt::Display for PrimitiveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The kind of a solid (for logging and match-free inspection).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    /// [`Sphere`].
    Sphere,
    /// [`Cylinder`].
    Cylinder,
    /// [`Cone`].
    Cone,
    /// [`BoxAabb`].
    Box,
    /// [`PlaneRect`].
    PlaneRect,
    /// [`Disk`].
    Disk,
}

/// One of the six analytic solids.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Solid sphere.
    Sphere(Sphere),
    /// Finite cylinder.
    Cylinder(Cylinder),
    /// Finite cone.
    Cone(Cone),
    /// Axis-aligned box.
    Box(BoxAabb),
    /// Finite plane rectangle.
    PlaneRect(PlaneRect),
    /// Flat disk.
    Disk(Disk),
}

impl Shape {
    /// The kind of this shape.
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Sphere(_) => ShapeKind::Sphere,
            Shape::Cylinder(_) => ShapeKind::Cylinder,
            Shape::Cone(_) => ShapeKind::Cone,
            Shape::Box(_) => ShapeKind::Box,
            Shape::PlaneRect(_) => ShapeKind::PlaneRect,
            Shape::Disk(_) => ShapeKind::Disk,
        }
    }

    /// Closest intersection with `t` in `[t_min, t_max]`.
    pub fn intersect(&self, ray: &Ray, t_min: f64, t_max: f64) -> Option<SurfaceHit> {
        match self {
            Shape::Sphere(s) => intersect_sphere(ray, s, t_min, t_max),
            Shape::Cylinder(c) => intersect_cylinder(ray, c, t_min, t_max),
            Shape::Cone(c) => intersect_cone(ray, c, t_min, t_max),
            Shape::Box(b) => intersect_box(ray, b, t_min, t_max),
            Shape::PlaneRect(r) => intersect_plane_rect(ray, r, t_min, t_max),
            Shape::Disk(d) => intersect_disk(ray, d, t_min, t_max),
        }
    }
}

macro_rules! shape_from {
    ($($ty:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Shape {
                fn from(s: $ty) -> Self {
                    Shape::$variant(s)
                }
            }
        )*
    };
}

shape_from!(
    Sphere => Sphere,
    Cylinder => Cylinder,
    Cone => Cone,
    BoxAabb => Box,
    PlaneRect => PlaneRect,
    Disk => Disk,
);

/// A shape registered in a scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Primitive {
    /// Arena id assigned by the scene.
    pub id: PrimitiveId,
    /// Geometry.
    pub shape: Shape,
}

impl Primitive {
    /// Closest intersection tagged with this primitive's id.
    pub fn intersect(&self, ray: &Ray, t_min: f64, t_max: f64) -> Option<RayHit> {
        self.shape.intersect(ray, t_min, t_max).map(|h| RayHit {
            t: h.t,
            point: h.point,
            normal: h.normal,
            primitive: self.id,
        })
    }
}
