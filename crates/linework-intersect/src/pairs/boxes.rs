//! Axis-aligned boxes, handled face by face.

use linework_geom::{BoxAabb, CubicBezier3, Disk, PlaneRect};
use linework_math::{clamp01, Point3};
use linework_raytrace::Shape;

use super::planar::{intersect_disk_plane_rect, intersect_plane_rect_plane_rect};
use super::plane_surface::{
    intersect_plane_cone, intersect_plane_cylinder, intersect_plane_sphere, PlaneSurface,
};
use super::{overlap, slab};
use crate::assemble::FitStrategy;

/// Rectangle × box: the plane's section polygon through the box, clipped to the rectangle.
pub fn intersect_plane_rect_box(rect: &PlaneRect, b: &BoxAabb) -> Vec<CubicBezier3> {
    let n = rect.normal;
    let mut points: Vec<Point3> = Vec::new();

    for (a, e) in b.edges() {
        let da = n.dot(&(a - rect.center));
        let de = n.dot(&(e - rect.center));
        let d = e - a;
        if da.abs() <= 1e-9 && de.abs() <= 1e-9 {
            // edge lies in the plane: keep the part inside the rectangle
            let (a0, b0) = rect.local(&a);
            let clipped = slab(a0, d.dot(&rect.u), rect.half_width)
                .zip(slab(b0, d.dot(&rect.v), rect.half_height))
                .and_then(|(iu, iv)| overlap(iu, iv))
                .and_then(|i| overlap(i, (0.0, 1.0)));
            if let Some((t0, t1)) = clipped {
                points.push(a + d * t0);
                points.push(a + d * t1);
            }
            continue;
        }
        if da * de > 0.0 {
            continue;
        }
        let t = da / (da - de);
        if (-1e-9..=1.0 + 1e-9).contains(&t) {
            points.push(a + d * clamp01(t));
        }
    }

    let mut uv: Vec<(Point3, (f64, f64))> = Vec::with_capacity(points.len());
    for p in points {
        let (x, y) = rect.local(&p);
        let dup = uv
            .iter()
            .any(|(_, (qx, qy))| (x - qx).powi(2) + (y - qy).powi(2) <= 1e-12);
        if !dup {
            uv.push((p, (x, y)));
        }
    }

    let segments: Vec<(Point3, Point3)> = match uv.len() {
        0 | 1 => return Vec::new(),
        2 => vec![(uv[0].0, uv[1].0)],
        count => {
            let cx = uv.iter().map(|(_, (x, _))| x).sum::<f64>() / count as f64;
            let cy = uv.iter().map(|(_, (_, y))| y).sum::<f64>() / count as f64;
            uv.sort_by(|(_, (ax, ay)), (_, (bx, by))| {
                (ay - cy).atan2(ax - cx).total_cmp(&(by - cy).atan2(bx - cx))
            });
            (0..count)
                .map(|i| (uv[i].0, uv[(i + 1) % count].0))
                .collect()
        }
    };

    let surface = PlaneSurface::Rect(*rect);
    segments
        .into_iter()
        .filter_map(|(p, q)| {
            let dir = q - p;
            let (t0, t1) = overlap(surface.clip_line(&p, &dir)?, (0.0, 1.0))?;
            ((t1 - t0) * dir.norm() > 1e-9)
                .then(|| CubicBezier3::line(p + dir * t0, p + dir * t1))
        })
        .collect()
}

/// Box × box: every face of one against every face of the other.
pub fn intersect_box_box(a: &BoxAabb, b: &BoxAabb) -> Vec<CubicBezier3> {
    let faces_b = b.faces();
    a.faces()
        .iter()
        .flat_map(|fa| {
            faces_b
                .iter()
                .flat_map(move |fb| intersect_plane_rect_plane_rect(fa, fb))
        })
        .collect()
}

/// Box × curved solid, treating each box face as a bounded plane.
///
/// Returns nothing for non-curved shapes.
pub fn intersect_box_curved(
    b: &BoxAabb,
    curved: &Shape,
    strategy: FitStrategy,
) -> Vec<CubicBezier3> {
    b.faces()
        .into_iter()
        .flat_map(|face| {
            let surface = PlaneSurface::Rect(face);
            match curved {
                Shape::Sphere(s) => intersect_plane_sphere(&surface, s, strategy),
                Shape::Cylinder(c) => intersect_plane_cylinder(&surface, c, strategy),
                Shape::Cone(c) => intersect_plane_cone(&surface, c, strategy),
                Shape::Box(_) | Shape::PlaneRect(_) | Shape::Disk(_) => Vec::new(),
            }
        })
        .collect()
}

/// Disk × box: the disk against each face.
pub fn intersect_disk_box(disk: &Disk, b: &BoxAabb, strategy: FitStrategy) -> Vec<CubicBezier3> {
    b.faces()
        .iter()
        .flat_map(|face| intersect_disk_plane_rect(disk, face, strategy))
        .collect()
}
