//! Ray-solid intersection algorithms.
//!
//! Each solid kind has a dedicated intersector returning the closest hit
//! with `t` in `[t_min, t_max]` and `t > EPS`.

mod aabb;
mod cone;
mod cylinder;
mod planar;
mod sphere;

pub use aabb::intersect_box;
pub use cone::intersect_cone;
pub use cylinder::intersect_cylinder;
pub use planar::{intersect_disk, intersect_plane_rect};
pub use sphere::intersect_sphere;

use linework_math::{Point3, Vec3, EPS};

use crate::Ray;

/// Result of a ray-solid intersection, before it is tagged with a primitive id.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceHit {
    /// Parameter along the ray.
    pub t: f64,
    /// Intersection point.
    pub point: Point3,
    /// Unit surface normal.
    pub normal: Vec3,
}

/// True when `t` is an acceptable hit parameter.
#[inline]
pub(crate) fn in_range(t: f64, t_min: f64, t_max: f64) -> bool {
    t > EPS && t >= t_min && t <= t_max
}

/// Keep whichever of two optional hits is closer.
#[inline]
pub(crate) fn closer(a: Option<SurfaceHit>, b: Option<SurfaceHit>) -> Option<SurfaceHit> {
    match (a, b) {
        (Some(x), Some(y)) => Some(if y.t < x.t { y } else { x }),
        (x, None) => x,
        (None, y) => y,
    }
}

/// Hit on a flat circular cap, with the normal facing the incoming ray.
pub(crate) fn cap_hit(
    ray: &Ray,
    center: &Point3,
    normal: &Vec3,
    radius: f64,
    t_min: f64,
    t_max: f64,
) -> Option<SurfaceHit> {
    let denom = ray.direction.dot(normal);
    if denom.abs() <= EPS {
        return None;
    }
    let t = (center - ray.origin).dot(normal) / denom;
    if !in_range(t, t_min, t_max) {
        return None;
    }
    let point = ray.at(t);
    if (point - center).norm_squared() > radius * radius + 1e-8 {
        return None;
    }
    let normal = if denom < 0.0 { *normal } else { -normal };
    Some(SurfaceHit { t, point, normal })
}
