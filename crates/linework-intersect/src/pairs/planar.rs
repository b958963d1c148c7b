//! Flat × flat pairs: rectangles and disks.

use std::f64::consts::TAU;

use linework_geom::{CubicBezier3, Disk, PlaneRect};
use linework_math::{basis_from_axis, Point3, Vec3};

use super::plane_surface::PlaneSurface;
use super::{cross_marker, overlap, ring_dir};
use crate::assemble::{cyclic_runs, finish_runs, FitStrategy};
use crate::fit::BezierFitParams;

/// Distance below which two parallel planes are treated as the same plane.
const COPLANAR_EPS: f64 = 1e-6;

/// Line shared by two planes given as `n·x = d`, or `None` when parallel.
fn plane_plane_line(n0: &Vec3, d0: f64, n1: &Vec3, d1: f64) -> Option<(Point3, Vec3)> {
    let dir_raw = n0.cross(n1);
    let len_sq = dir_raw.norm_squared();
    if len_sq <= 1e-12 {
        return None;
    }
    let origin = (n1 * d0 - n0 * d1).cross(&dir_raw) / len_sq;
    Some((Point3::from(origin), dir_raw / len_sq.sqrt()))
}

/// The common line of two surfaces clipped to both, as a straight cubic.
fn clipped_common_line(a: &PlaneSurface, b: &PlaneSurface) -> Option<CubicBezier3> {
    let (na, nb) = (a.normal(), b.normal());
    let (origin, dir) = plane_plane_line(
        &na,
        na.dot(&a.center().coords),
        &nb,
        nb.dot(&b.center().coords),
    )?;
    let (t0, t1) = overlap(a.clip_line(&origin, &dir)?, b.clip_line(&origin, &dir)?)?;
    (t1 - t0 > 1e-9).then(|| CubicBezier3::line(origin + dir * t0, origin + dir * t1))
}

/// True when two surfaces lie in the same plane.
fn coplanar(a: &PlaneSurface, b: &PlaneSurface) -> bool {
    let (na, nb) = (a.normal(), b.normal());
    na.cross(&nb).norm_squared() <= 1e-12 && na.dot(&(b.center() - a.center())).abs() <= COPLANAR_EPS
}

/// Rectangle × rectangle: the shared line segment, if any.
///
/// Coplanar rectangles produce nothing.
pub fn intersect_plane_rect_plane_rect(r0: &PlaneRect, r1: &PlaneRect) -> Vec<CubicBezier3> {
    clipped_common_line(&(*r0).into(), &(*r1).into())
        .into_iter()
        .collect()
}

/// Disk × disk.
///
/// Non-parallel disks meet along a segment. Coplanar disks meet where their
/// rims cross; those crossings are marked with small crosses.
pub fn intersect_disk_disk(d0: &Disk, d1: &Disk) -> Vec<CubicBezier3> {
    let (s0, s1) = (PlaneSurface::Disk(*d0), PlaneSurface::Disk(*d1));
    if !coplanar(&s0, &s1) {
        return clipped_common_line(&s0, &s1).into_iter().collect();
    }

    let (u, v) = basis_from_axis(&d0.normal);
    let delta = d1.center - d0.center;
    let (dx, dy) = (delta.dot(&u), delta.dot(&v));
    let dist = dx.hypot(dy);
    let (r0, r1) = (d0.radius, d1.radius);
    if dist <= 1e-12 || dist > r0 + r1 + 1e-9 || dist < (r0 - r1).abs() - 1e-9 {
        return Vec::new();
    }
    let (ex, ey) = (dx / dist, dy / dist);
    let a = (r0 * r0 - r1 * r1 + dist * dist) / (2.0 * dist);
    let h2 = r0 * r0 - a * a;
    let base = d0.center + (u * ex + v * ey) * a;
    let size = 0.03 * r0.min(r1).max(0.1);

    if h2.abs() <= 1e-8 {
        return cross_marker(&base, &u, &v, size).to_vec();
    }
    let h = h2.max(0.0).sqrt();
    let offset = u * (-ey * h) + v * (ex * h);
    [base + offset, base - offset]
        .iter()
        .flat_map(|p| cross_marker(p, &u, &v, size))
        .collect()
}

/// Disk × rectangle.
///
/// Coplanar pairs trace the part of the disk rim lying inside the rectangle.
pub fn intersect_disk_plane_rect(
    disk: &Disk,
    rect: &PlaneRect,
    strategy: FitStrategy,
) -> Vec<CubicBezier3> {
    const N: usize = 260;
    let (sd, sr) = (PlaneSurface::Disk(*disk), PlaneSurface::Rect(*rect));
    if !coplanar(&sd, &sr) {
        return clipped_common_line(&sd, &sr).into_iter().collect();
    }

    let (u, v) = basis_from_axis(&rect.normal);
    let samples: Vec<Option<Point3>> = (0..N)
        .map(|i| {
            let p = disk.center + ring_dir(&u, &v, TAU * i as f64 / N as f64) * disk.radius;
            sr.contains(&p).then_some(p)
        })
        .collect();
    let step = TAU * disk.radius / N as f64;
    let params = BezierFitParams::default()
        .with_max_error(0.6 * step)
        .with_close_eps(3.0 * step);
    finish_runs(&cyclic_runs(&samples), &params, strategy)
}
