//! Circles and circular arcs as cubic Bezier chains.

use std::f64::consts::{FRAC_PI_2, TAU};

use linework_math::{basis_from_axis, normalize_or_zero, Point3, Vec3};

use crate::CubicBezier3;

/// Handle length ratio for a cubic approximating an arc of `sweep` radians.
///
/// `k = 4/3 · tan(sweep / 4)`; for a quarter circle this is ≈ 0.5523.
#[inline]
pub fn arc_handle_ratio(sweep: f64) -> f64 {
    (4.0 / 3.0) * (sweep / 4.0).tan()
}

/// A full circle as four quarter-arc cubics.
///
/// The circle lies in the plane through `center` perpendicular to `normal`.
/// Angle zero is along the first vector of [`basis_from_axis`].
pub fn circle_to_cubics(center: &Point3, normal: &Vec3, radius: f64) -> Vec<CubicBezier3> {
    arc_to_cubics(center, normal, radius, 0.0, TAU)
}

/// An arc from `start` to `end` radians, split into pieces of at most 90°.
///
/// Returns an empty list for a zero normal, a non-positive radius or
/// non-finite input.
pub fn arc_to_cubics(
    center: &Point3,
    normal: &Vec3,
    radius: f64,
    start: f64,
    end: f64,
) -> Vec<CubicBezier3> {
    let n = normalize_or_zero(normal);
    if n == Vec3::zeros() || !radius.is_finite() || radius <= 0.0 {
        return Vec::new();
    }
    let sweep = end - start;
    if !sweep.is_finite() {
        return Vec::new();
    }
    let (u, v) = basis_from_axis(&n);
    let segments = ((sweep.abs() / FRAC_PI_2).ceil() as usize).max(1);

    (0..segments)
        .map(|i| {
            let a0 = start + sweep * i as f64 / segments as f64;
            let a1 = start + sweep * (i + 1) as f64 / segments as f64;
            arc_segment(center, &u, &v, radius, a0, a1)
        })
        .collect()
}

fn arc_segment(center: &Point3, u: &Vec3, v: &Vec3, r: f64, a0: f64, a1: f64) -> CubicBezier3 {
    let k = arc_handle_ratio(a1 - a0);
    let (s0, c0) = a0.sin_cos();
    let (s1, c1) = a1.sin_cos();
    let p0 = center + (u * c0 + v * s0) * r;
    let p3 = center + (u * c1 + v * s1) * r;
    let t0 = -u * s0 + v * c0;
    let t1 = -u * s1 + v * c1;
    CubicBezier3 {
        p0,
        p1: p0 + t0 * (k * r),
        p2: p3 - t1 * (k * r),
        p3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_quarter_arc_handle_ratio() {
        let arcs = arc_to_cubics(&Point3::origin(), &Vec3::z(), 1.0, 0.0, FRAC_PI_2);
        assert_eq!(arcs.len(), 1);
        let b = arcs[0];
        let k = (b.p1 - b.p0).norm();
        assert_relative_eq!(k, 4.0 / 3.0 * (std::f64::consts::PI / 8.0).tan(), epsilon = 1e-14);
        assert_relative_eq!(k, 0.552_284_749_8, epsilon = 1e-9);
        assert_relative_eq!((b.p3 - b.p2).norm(), k, epsilon = 1e-14);
    }

    #[test]
    fn test_circle_has_four_closed_pieces() {
        let c = Point3::new(1.0, 2.0, 3.0);
        let arcs = circle_to_cubics(&c, &Vec3::new(0.0, 1.0, 1.0), 2.0);
        assert_eq!(arcs.len(), 4);
        for w in arcs.windows(2) {
            assert!((w[0].p3 - w[1].p0).norm() < 1e-12);
        }
        assert!((arcs[3].p3 - arcs[0].p0).norm() < 1e-12);
        // midpoints stay close to the true circle
        for b in &arcs {
            let r = (b.eval(0.5) - c).norm();
            assert!((r - 2.0).abs() < 2.0 * 3e-4);
        }
    }

    #[test]
    fn test_small_arc_single_piece() {
        let arcs = arc_to_cubics(&Point3::origin(), &Vec3::x(), 1.0, 0.0, 0.3);
        assert_eq!(arcs.len(), 1);
        let arcs = arc_to_cubics(&Point3::origin(), &Vec3::x(), 1.0, 0.0, 3.0);
        assert_eq!(arcs.len(), 2);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(circle_to_cubics(&Point3::origin(), &Vec3::zeros(), 1.0).is_empty());
        assert!(circle_to_cubics(&Point3::origin(), &Vec3::z(), 0.0).is_empty());
        assert!(circle_to_cubics(&Point3::origin(), &Vec3::z(), f64::NAN).is_empty());
    }
}
