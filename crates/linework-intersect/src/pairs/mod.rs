//! Intersection solvers, one per pair of surface kinds.
//!
//! Curved pairs parametrize one surface by angle around its axis and solve
//! the other's implicit equation for the remaining parameter. Flat pairs are
//! solved exactly as lines clipped to both regions.

mod boxes;
mod curved;
mod planar;
mod plane_surface;

pub use boxes::{
    intersect_box_box, intersect_box_curved, intersect_disk_box, intersect_plane_rect_box,
};
pub use curved::{
    intersect_cone_cone, intersect_cylinder_cone, intersect_cylinder_cylinder,
    intersect_sphere_cone, intersect_sphere_cylinder, intersect_sphere_sphere,
};
pub use planar::{intersect_disk_disk, intersect_disk_plane_rect, intersect_plane_rect_plane_rect};
pub use plane_surface::{
    intersect_plane_cone, intersect_plane_cylinder, intersect_plane_sphere, PlaneSurface,
};

use linework_geom::CubicBezier3;
use linework_math::{Point3, Vec3};

/// Unit direction at angle `theta` in the plane spanned by `u` and `v`.
#[inline]
pub(crate) fn ring_dir(u: &Vec3, v: &Vec3, theta: f64) -> Vec3 {
    let (s, c) = theta.sin_cos();
    u * c + v * s
}

/// A small "+" made of two segments, used where a curve collapses to a point.
pub(crate) fn cross_marker(p: &Point3, u: &Vec3, v: &Vec3, size: f64) -> [CubicBezier3; 2] {
    [
        CubicBezier3::line(p - u * size, p + u * size),
        CubicBezier3::line(p - v * size, p + v * size),
    ]
}

/// Parameter interval, possibly unbounded.
pub(crate) type Interval = (f64, f64);

/// Intersection of two intervals, `None` when empty.
pub(crate) fn overlap(a: Interval, b: Interval) -> Option<Interval> {
    let lo = a.0.max(b.0);
    let hi = a.1.min(b.1);
    (lo <= hi).then_some((lo, hi))
}

/// Values of `t` with `|x0 + dx·t| ≤ half`.
pub(crate) fn slab(x0: f64, dx: f64, half: f64) -> Option<Interval> {
    if dx.abs() <= 1e-12 {
        return (x0.abs() <= half).then_some((f64::NEG_INFINITY, f64::INFINITY));
    }
    let t1 = (-half - x0) / dx;
    let t2 = (half - x0) / dx;
    Some((t1.min(t2), t1.max(t2)))
}
