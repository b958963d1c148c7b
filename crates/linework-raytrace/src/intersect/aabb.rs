//! Ray-box intersection using the slab method.

use linework_geom::BoxAabb;
use linework_math::{Vec3, EPS};

use super::SurfaceHit;
use crate::Ray;

/// Intersect a ray with an axis-aligned box.
///
/// Returns the entry point with the normal of the entered face. A ray that
/// starts inside the box reports no hit, so a box never occludes points
/// inside itself.
pub fn intersect_box(ray: &Ray, aabb: &BoxAabb, t_min: f64, t_max: f64) -> Option<SurfaceHit> {
    let mut t0 = t_min;
    let mut t1 = t_max;
    let mut normal = Vec3::zeros();

    for axis in 0..3 {
        let o = ray.origin[axis];
        let d = ray.direction[axis];
        let (lo, hi) = (aabb.min[axis], aabb.max[axis]);

        if d.abs() <= EPS {
            if o < lo || o > hi {
                return None;
            }
            continue;
        }

        let inv = 1.0 / d;
        let mut t_near = (lo - o) * inv;
        let mut t_far = (hi - o) * inv;
        let mut n_near = -Vec3::ith(axis, 1.0);
        if t_near > t_far {
            std::mem::swap(&mut t_near, &mut t_far);
            n_near = -n_near;
        }
        if t_near > t0 {
            t0 = t_near;
            normal = n_near;
        }
        t1 = t1.min(t_far);
        if t0 > t1 {
            return None;
        }
    }

    if t0 <= EPS || t0 < t_min || t0 > t_max {
        return None;
    }
    Some(SurfaceHit {
        t: t0,
        point: ray.at(t0),
        normal,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use linework_math::Point3;

    fn unit_box() -> BoxAabb {
        BoxAabb::new(Point3::origin(), Point3::new(1.0, 1.0, 1.0)).unwrap()
    }

    #[test]
    fn test_ray_box_hit() {
        let ray = Ray::new(Point3::new(-5.0, 0.5, 0.5), Vec3::x());
        let hit = intersect_box(&ray, &unit_box(), 0.0, f64::INFINITY).unwrap();
        assert!((hit.t - 5.0).abs() < 1e-10);
        assert_eq!(hit.normal, -Vec3::x());
    }

    #[test]
    fn test_ray_box_hit_negative_direction() {
        let ray = Ray::new(Point3::new(0.5, 5.0, 0.5), -Vec3::y());
        let hit = intersect_box(&ray, &unit_box(), 0.0, f64::INFINITY).unwrap();
        assert!((hit.t - 4.0).abs() < 1e-10);
        assert_eq!(hit.normal, Vec3::y());
    }

    #[test]
    fn test_ray_box_miss() {
        let ray = Ray::new(Point3::new(-5.0, 5.0, 5.0), Vec3::x());
        assert!(intersect_box(&ray, &unit_box(), 0.0, f64::INFINITY).is_none());
    }

    #[test]
    fn test_ray_box_behind() {
        let ray = Ray::new(Point3::new(-5.0, 0.5, 0.5), -Vec3::x());
        assert!(intersect_box(&ray, &unit_box(), 0.0, f64::INFINITY).is_none());
    }

    #[test]
    fn test_ray_inside_box() {
        let ray = Ray::new(Point3::new(0.5, 0.5, 0.5), Vec3::x());
        assert!(intersect_box(&ray, &unit_box(), 0.0, f64::INFINITY).is_none());
    }

    #[test]
    fn test_ray_box_truncated() {
        let ray = Ray::new(Point3::new(-5.0, 0.5, 0.5), Vec3::x());
        assert!(intersect_box(&ray, &unit_box(), 0.0, 4.0).is_none());
    }
}
