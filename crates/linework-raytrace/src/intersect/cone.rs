//! Ray-cone intersection.

use linework_geom::{Cone, ConeCap};
use linework_math::{solve_quadratic, EPS};

use super::{cap_hit, closer, in_range, SurfaceHit};
use crate::Ray;

/// Intersect a ray with a finite cone, returning the nearest hit in range.
///
/// In apex space with `y = x·axis` and `x⊥ = x - axis·y`, the side satisfies
/// `|x⊥|² = (k·y)²` for `y ∈ [0, height]`.
pub fn intersect_cone(ray: &Ray, cone: &Cone, t_min: f64, t_max: f64) -> Option<SurfaceHit> {
    let axis = &cone.axis;
    let co = ray.origin - cone.apex;
    let dv = ray.direction.dot(axis);
    let cov = co.dot(axis);
    let d_perp = ray.direction - axis * dv;
    let co_perp = co - axis * cov;

    let k2 = cone.slope() * cone.slope();
    let a = d_perp.dot(&d_perp) - k2 * dv * dv;
    let b = 2.0 * (co_perp.dot(&d_perp) - k2 * cov * dv);
    let c = co_perp.dot(&co_perp) - k2 * cov * cov;

    let side = if a.abs() > EPS {
        solve_quadratic(a, b, c).iter().find_map(|t| {
            if !in_range(t, t_min, t_max) {
                return None;
            }
            let point = ray.at(t);
            let x = point - cone.apex;
            let y = x.dot(axis);
            if !(0.0..=cone.height).contains(&y) {
                return None;
            }
            // gradient of |x⊥|² - k²y²
            let x_perp = x - axis * y;
            let grad = x_perp * 2.0 - axis * (2.0 * k2 * y);
            let len = grad.norm();
            let normal = if len > EPS { grad / len } else { -axis };
            Some(SurfaceHit { t, point, normal })
        })
    } else {
        None
    };

    match cone.cap {
        ConeCap::None => side,
        ConeCap::Base => {
            let limit = side.map_or(t_max, |h| h.t);
            let base = cap_hit(ray, &cone.base_center(), axis, cone.base_radius, t_min, limit);
            closer(side, base)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linework_math::{Point3, Vec3};

    fn cone(cap: ConeCap) -> Cone {
        // apex at z = 2 pointing down, base radius 1 at z = 0
        Cone::new(Point3::new(0.0, 0.0, 2.0), -Vec3::z(), 2.0, 1.0, cap).unwrap()
    }

    #[test]
    fn test_side_hit() {
        // at z = 1 the radius is 0.5
        let ray = Ray::new(Point3::new(-5.0, 0.0, 1.0), Vec3::x());
        let hit = intersect_cone(&ray, &cone(ConeCap::Base), 0.0, f64::INFINITY).unwrap();
        assert!((hit.t - 4.5).abs() < 1e-10);
        assert!(hit.normal.x < 0.0);
        assert!((hit.normal.norm() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_mirror_nappe_rejected() {
        // z = 3 is above the apex, only the mirrored nappe lives there
        let ray = Ray::new(Point3::new(-5.0, 0.0, 3.0), Vec3::x());
        assert!(intersect_cone(&ray, &cone(ConeCap::Base), 0.0, f64::INFINITY).is_none());
    }

    #[test]
    fn test_base_cap() {
        let ray = Ray::new(Point3::new(0.3, 0.0, -5.0), Vec3::z());
        let hit = intersect_cone(&ray, &cone(ConeCap::Base), 0.0, f64::INFINITY).unwrap();
        assert!((hit.t - 5.0).abs() < 1e-10);
        assert!((hit.normal - (-Vec3::z())).norm() < 1e-12);
        // without the cap the ray enters through the side further up
        let side = intersect_cone(&ray, &cone(ConeCap::None), 0.0, f64::INFINITY).unwrap();
        assert!(side.t > 5.0);
    }
}
