//! Ray-sphere intersection (quadratic equation).

use linework_geom::Sphere;
use linework_math::solve_quadratic;

use super::{in_range, SurfaceHit};
use crate::Ray;

/// Intersect a ray with a sphere, returning the nearest hit in range.
pub fn intersect_sphere(ray: &Ray, sphere: &Sphere, t_min: f64, t_max: f64) -> Option<SurfaceHit> {
    let oc = ray.origin - sphere.center;
    let d = &ray.direction;

    // |oc + t*d|^2 = r^2
    let a = d.dot(d);
    let b = 2.0 * oc.dot(d);
    let c = oc.dot(&oc) - sphere.radius * sphere.radius;

    let t = solve_quadratic(a, b, c)
        .iter()
        .find(|&t| in_range(t, t_min, t_max))?;
    let point = ray.at(t);
    let normal = (point - sphere.center) / sphere.radius;
    Some(SurfaceHit { t, point, normal })
}
