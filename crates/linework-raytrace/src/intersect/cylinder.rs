//! Ray-cylinder intersection: quadratic side plus optional cap disks.

use linework_geom::{Cylinder, CylinderCaps};
use linework_math::{solve_quadratic, EPS};

use super::{cap_hit, closer, in_range, SurfaceHit};
use crate::Ray;

/// Intersect a ray with a finite cylinder, returning the nearest hit in range.
pub fn intersect_cylinder(
    ray: &Ray,
    cylinder: &Cylinder,
    t_min: f64,
    t_max: f64,
) -> Option<SurfaceHit> {
    let axis = &cylinder.axis;
    let d = &ray.direction;
    let oc = ray.origin - cylinder.base;

    // Project ray direction and origin-base onto the plane perpendicular to axis
    let d_perp = d - axis * d.dot(axis);
    let oc_perp = oc - axis * oc.dot(axis);

    let a = d_perp.dot(&d_perp);
    let b = 2.0 * oc_perp.dot(&d_perp);
    let c = oc_perp.dot(&oc_perp) - cylinder.radius * cylinder.radius;

    // Ray parallel to the axis never touches the side
    let side = if a > EPS {
        solve_quadratic(a, b, c).iter().find_map(|t| {
            if !in_range(t, t_min, t_max) {
                return None;
            }
            let point = ray.at(t);
            let h = (point - cylinder.base).dot(axis);
            if !(0.0..=cylinder.height).contains(&h) {
                return None;
            }
            let on_axis = cylinder.base + axis * h;
            let normal = (point - on_axis) / cylinder.radius;
            Some(SurfaceHit { t, point, normal })
        })
    } else {
        None
    };

    match cylinder.caps {
        CylinderCaps::None => side,
        CylinderCaps::Both => {
            let limit = side.map_or(t_max, |h| h.t);
            let base = cap_hit(ray, &cylinder.base, axis, cylinder.radius, t_min, limit);
            let top = cap_hit(ray, &cylinder.top_center(), axis, cylinder.radius, t_min, limit);
            closer(closer(side, base), top)
        }
    }
}
