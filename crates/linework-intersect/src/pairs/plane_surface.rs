//! Flat bounded surfaces (disks and rectangles) against curved solids.

use std::f64::consts::TAU;

use linework_geom::{circle_to_cubics, Cone, CubicBezier3, Cylinder, Disk, PlaneRect, Sphere};
use linework_math::{basis_from_axis, solve_quadratic, Point3, Vec3};

use super::{cross_marker, overlap, ring_dir, slab, Interval};
use crate::assemble::{cyclic_runs, finish_runs, FitStrategy};
use crate::fit::BezierFitParams;

/// Containment slack for points on the surface's plane.
const CONTAINS_SLACK: f64 = 1e-7;

/// A bounded planar region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaneSurface {
    /// Circular region.
    Disk(Disk),
    /// Rectangular region.
    Rect(PlaneRect),
}

impl From<Disk> for PlaneSurface {
    fn from(d: Disk) -> Self {
        PlaneSurface::Disk(d)
    }
}

impl From<PlaneRect> for PlaneSurface {
    fn from(r: PlaneRect) -> Self {
        PlaneSurface::Rect(r)
    }
}

impl PlaneSurface {
    /// Unit normal of the carrying plane.
    pub fn normal(&self) -> Vec3 {
        match self {
            PlaneSurface::Disk(d) => d.normal,
            PlaneSurface::Rect(r) => r.normal,
        }
    }

    /// Center of the region.
    pub fn center(&self) -> Point3 {
        match self {
            PlaneSurface::Disk(d) => d.center,
            PlaneSurface::Rect(r) => r.center,
        }
    }

    /// True when `p`, assumed to lie on the plane, is inside the region.
    pub fn contains(&self, p: &Point3) -> bool {
        match self {
            PlaneSurface::Disk(d) => {
                (p - d.center).norm_squared() <= d.radius * d.radius + CONTAINS_SLACK
            }
            PlaneSurface::Rect(r) => r.contains_projected(p, CONTAINS_SLACK),
        }
    }

    /// Characteristic size, used to scale markers.
    pub fn typical_size(&self) -> f64 {
        match self {
            PlaneSurface::Disk(d) => d.radius,
            PlaneSurface::Rect(r) => r.half_width.max(r.half_height),
        }
    }

    /// Parameter interval of `origin + dir·t` inside the region.
    ///
    /// The line is assumed to lie in the plane; `dir` must be non-zero.
    pub fn clip_line(&self, origin: &Point3, dir: &Vec3) -> Option<Interval> {
        match self {
            PlaneSurface::Disk(d) => {
                let m = origin - d.center;
                let roots = solve_quadratic(
                    dir.dot(dir),
                    2.0 * m.dot(dir),
                    m.dot(&m) - d.radius * d.radius,
                );
                match roots.as_slice() {
                    [t] => Some((*t, *t)),
                    [t0, t1] => Some((*t0, *t1)),
                    _ => None,
                }
            }
            PlaneSurface::Rect(r) => {
                let (a0, b0) = r.local(origin);
                let iu = slab(a0, dir.dot(&r.u), r.half_width)?;
                let iv = slab(b0, dir.dot(&r.v), r.half_height)?;
                overlap(iu, iv)
            }
        }
    }
}

fn fit_params(step: f64, error_steps: f64) -> BezierFitParams {
    BezierFitParams::default()
        .with_max_error(error_steps * step)
        .with_close_eps(3.0 * step)
}

/// Plane surface × sphere: the part of the section circle inside the region.
///
/// A tangent plane gives a small cross marker at the touching point.
pub fn intersect_plane_sphere(
    surface: &PlaneSurface,
    s: &Sphere,
    strategy: FitStrategy,
) -> Vec<CubicBezier3> {
    const N: usize = 220;
    let n = surface.normal();
    let dist = n.dot(&(s.center - surface.center()));
    if dist.abs() > s.radius + 1e-7 {
        return Vec::new();
    }
    let center = s.center - n * dist;
    let r = (s.radius * s.radius - dist * dist).max(0.0).sqrt();
    let (u, v) = basis_from_axis(&n);

    if r <= 1e-8 {
        if !surface.contains(&center) {
            return Vec::new();
        }
        let size = (surface.typical_size() * 0.02).max(0.02);
        return cross_marker(&center, &u, &v, size).to_vec();
    }

    let samples: Vec<Option<Point3>> = (0..N)
        .map(|i| {
            let p = center + ring_dir(&u, &v, TAU * i as f64 / N as f64) * r;
            surface.contains(&p).then_some(p)
        })
        .collect();
    if strategy != FitStrategy::Lines && samples.iter().all(Option::is_some) {
        return circle_to_cubics(&center, &n, r);
    }
    let step = TAU * r / N as f64;
    finish_runs(&cyclic_runs(&samples), &fit_params(step, 0.6), strategy)
}

/// Plane surface × cylinder side.
///
/// A plane parallel to the axis cuts along at most two rulings, which are
/// returned as exact segments clipped to the region. Otherwise the section
/// ellipse is sampled around the axis.
pub fn intersect_plane_cylinder(
    surface: &PlaneSurface,
    c: &Cylinder,
    strategy: FitStrategy,
) -> Vec<CubicBezier3> {
    const N: usize = 180;
    let n = surface.normal();
    let d_plane = n.dot(&surface.center().coords);
    let a = c.axis;
    let denom = n.dot(&a);
    let (u, v) = basis_from_axis(&a);

    if denom.abs() <= 1e-10 {
        let (nu, nv) = (n.dot(&u), n.dot(&v));
        let m = nu.hypot(nv);
        if m <= 1e-12 {
            return Vec::new();
        }
        let rhs = (d_plane - n.dot(&c.base.coords)) / c.radius / m;
        if rhs.abs() > 1.0 {
            return Vec::new();
        }
        let phi = nv.atan2(nu);
        let delta = rhs.acos();
        let mut thetas = vec![phi + delta];
        if delta > 1e-9 {
            thetas.push(phi - delta);
        }
        return thetas
            .into_iter()
            .filter_map(|theta| {
                let p0 = c.base + ring_dir(&u, &v, theta) * c.radius;
                let (t0, t1) = overlap(surface.clip_line(&p0, &a)?, (0.0, c.height))?;
                (t1 - t0 > 1e-9).then(|| CubicBezier3::line(p0 + a * t0, p0 + a * t1))
            })
            .collect();
    }

    let samples: Vec<Option<Point3>> = (0..N)
        .map(|i| {
            let rim = c.base + ring_dir(&u, &v, TAU * i as f64 / N as f64) * c.radius;
            let s = (d_plane - n.dot(&rim.coords)) / denom;
            if s < -1e-6 || s > c.height + 1e-6 {
                return None;
            }
            let p = rim + a * s;
            surface.contains(&p).then_some(p)
        })
        .collect();
    let step = TAU * c.radius.max(1e-3) / N as f64;
    finish_runs(&cyclic_runs(&samples), &fit_params(step, 0.65), strategy)
}

/// Plane surface × cone side, sampled along the cone's rulings.
///
/// A plane through the apex cuts along at most two rulings, returned as
/// exact segments clipped to the region; one ruling when the plane is
/// tangent, and a cross marker when it touches the apex alone.
pub fn intersect_plane_cone(
    surface: &PlaneSurface,
    cone: &Cone,
    strategy: FitStrategy,
) -> Vec<CubicBezier3> {
    const N: usize = 220;
    let n = surface.normal();
    let d_plane = n.dot(&surface.center().coords);
    let a = cone.axis;
    let k = cone.slope();
    let (u, v) = basis_from_axis(&a);
    let offset = d_plane - n.dot(&cone.apex.coords);

    if offset.abs() <= 1e-10 * cone.height.max(1.0) {
        return plane_cone_rulings(surface, cone, &u, &v);
    }

    let samples: Vec<Option<Point3>> = (0..N)
        .map(|i| {
            let ruling = a + ring_dir(&u, &v, TAU * i as f64 / N as f64) * k;
            let denom = n.dot(&ruling);
            if denom.abs() <= 1e-8 {
                return None;
            }
            let y = offset / denom;
            if y < -1e-6 || y > cone.height + 1e-6 {
                return None;
            }
            let p = cone.apex + ruling * y;
            surface.contains(&p).then_some(p)
        })
        .collect();
    let step = TAU * cone.base_radius.max(1e-3) / N as f64;
    finish_runs(&cyclic_runs(&samples), &fit_params(step, 0.65), strategy)
}

/// Rulings of `cone` lying in the plane of `surface`, which passes through the apex.
fn plane_cone_rulings(
    surface: &PlaneSurface,
    cone: &Cone,
    u: &Vec3,
    v: &Vec3,
) -> Vec<CubicBezier3> {
    let n = surface.normal();
    let a = cone.axis;
    let k = cone.slope();
    let (nu, nv) = (n.dot(u), n.dot(v));
    let m = nu.hypot(nv);
    // n·(a + k·w) = 0 for the ruling direction w
    let rhs = if m * k > 1e-12 { -n.dot(&a) / (k * m) } else { f64::INFINITY };
    if rhs.abs() > 1.0 + 1e-12 {
        if !surface.contains(&cone.apex) {
            return Vec::new();
        }
        let (mu, mv) = basis_from_axis(&n);
        let size = (surface.typical_size() * 0.02).max(0.02);
        return cross_marker(&cone.apex, &mu, &mv, size).to_vec();
    }

    let phi = nv.atan2(nu);
    let delta = rhs.clamp(-1.0, 1.0).acos();
    let mut thetas = vec![phi + delta];
    // tangent along a single ruling
    if 1.0 - rhs.abs() > 1e-12 {
        thetas.push(phi - delta);
    }
    thetas
        .into_iter()
        .filter_map(|theta| {
            let ruling = a + ring_dir(u, v, theta) * k;
            let (t0, t1) = overlap(surface.clip_line(&cone.apex, &ruling)?, (0.0, cone.height))?;
            (t1 - t0 > 1e-9)
                .then(|| CubicBezier3::line(cone.apex + ruling * t0, cone.apex + ruling * t1))
        })
        .collect()
}
