//! Ray intersection with flat primitives: plane rectangles and disks.

use linework_geom::{Disk, PlaneRect};
use linework_math::EPS;

use super::{cap_hit, in_range, SurfaceHit};
use crate::Ray;

/// Intersect a ray with a plane rectangle.
///
/// The rectangle is grown by `1e-8` on each side so rays through shared
/// edges are not lost. The normal faces the incoming ray.
pub fn intersect_plane_rect(
    ray: &Ray,
    rect: &PlaneRect,
    t_min: f64,
    t_max: f64,
) -> Option<SurfaceHit> {
    let denom = ray.direction.dot(&rect.normal);
    if denom.abs() <= EPS {
        return None;
    }
    let t = (rect.center - ray.origin).dot(&rect.normal) / denom;
    if !in_range(t, t_min, t_max) {
        return None;
    }
    let point = ray.at(t);
    if !rect.contains_projected(&point, 1e-8) {
        return None;
    }
    let normal = if denom < 0.0 { rect.normal } else { -rect.normal };
    Some(SurfaceHit { t, point, normal })
}

/// Intersect a ray with a disk.
pub fn intersect_disk(ray: &Ray, disk: &Disk, t_min: f64, t_max: f64) -> Option<SurfaceHit> {
    cap_hit(ray, &disk.center, &disk.normal, disk.radius, t_min, t_max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use linework_math::{Point3, Vec3};

    #[test]
    fn test_rect_hit_and_edge_slack() {
        let rect = PlaneRect::new(Point3::origin(), Vec3::z(), Vec3::x(), 1.0, 2.0).unwrap();
        let ray = Ray::new(Point3::new(0.5, 1.5, 3.0), -Vec3::z());
        let hit = intersect_plane_rect(&ray, &rect, 0.0, f64::INFINITY).unwrap();
        assert!((hit.t - 3.0).abs() < 1e-12);
        assert!((hit.normal - Vec3::z()).norm() < 1e-12);

        let edge = Ray::new(Point3::new(1.0, 0.0, 3.0), -Vec3::z());
        assert!(intersect_plane_rect(&edge, &rect, 0.0, f64::INFINITY).is_some());
        let outside = Ray::new(Point3::new(1.01, 0.0, 3.0), -Vec3::z());
        assert!(intersect_plane_rect(&outside, &rect, 0.0, f64::INFINITY).is_none());
    }

    #[test]
    fn test_rect_from_behind() {
        let rect = PlaneRect::new(Point3::origin(), Vec3::z(), Vec3::x(), 1.0, 1.0).unwrap();
        let ray = Ray::new(Point3::new(0.0, 0.0, -2.0), Vec3::z());
        let hit = intersect_plane_rect(&ray, &rect, 0.0, f64::INFINITY).unwrap();
        assert!((hit.normal + Vec3::z()).norm() < 1e-12);
    }

    #[test]
    fn test_parallel_ray_misses() {
        let disk = Disk::new(Point3::origin(), Vec3::z(), 1.0).unwrap();
        let ray = Ray::new(Point3::new(-2.0, 0.0, 0.0), Vec3::x());
        assert!(intersect_disk(&ray, &disk, 0.0, f64::INFINITY).is_none());
    }

    #[test]
    fn test_disk_radius() {
        let disk = Disk::new(Point3::origin(), Vec3::z(), 1.0).unwrap();
        let inside = Ray::new(Point3::new(0.9, 0.0, 1.0), -Vec3::z());
        let outside = Ray::new(Point3::new(1.1, 0.0, 1.0), -Vec3::z());
        assert!(intersect_disk(&inside, &disk, 0.0, f64::INFINITY).is_some());
        assert!(intersect_disk(&outside, &disk, 0.0, f64::INFINITY).is_none());
    }
}
