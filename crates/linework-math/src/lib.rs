#![warn(missing_docs)]

//! Math types and numeric policy for the linework hidden-line renderer.
//!
//! Thin wrappers around nalgebra plus the small set of numerically careful
//! helpers every other crate shares: epsilon comparisons, an orthonormal
//! basis for an axis, and a cancellation-free quadratic solver.

use nalgebra::Vector3;

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// General-purpose "effectively zero" threshold.
pub const EPS: f64 = 1e-9;

/// Clamp a parameter into `[0, 1]`.
#[inline]
pub fn clamp01(t: f64) -> f64 {
    t.clamp(0.0, 1.0)
}

/// Check if two scalars are equal within `eps`.
#[inline]
pub fn almost_equal(a: f64, b: f64, eps: f64) -> bool {
    (a - b).abs() <= eps
}

/// Collapse runs of values closer than `eps` in an already sorted slice.
///
/// The first value of each cluster is kept.
pub fn dedupe_sorted(values: &[f64], eps: f64) -> Vec<f64> {
    let mut out: Vec<f64> = Vec::with_capacity(values.len());
    for &v in values {
        match out.last() {
            Some(&last) if (v - last).abs() <= eps => {}
            _ => out.push(v),
        }
    }
    out
}

/// Normalize `v`, returning the zero vector when its length is below [`EPS`].
#[inline]
pub fn normalize_or_zero(v: &Vec3) -> Vec3 {
    let len = v.norm();
    if len <= EPS {
        Vec3::zeros()
    } else {
        v / len
    }
}

/// Build an orthonormal pair `(u, v)` spanning the plane perpendicular to `axis`.
///
/// `axis` must be unit length. The helper vector is chosen so the basis is
/// stable for axes near ±Z, and `(u, v, axis)` is right-handed.
pub fn basis_from_axis(axis: &Vec3) -> (Vec3, Vec3) {
    let helper = if axis.z.abs() < 0.9 {
        Vec3::z()
    } else {
        Vec3::y()
    };
    let u = normalize_or_zero(&helper.cross(axis));
    let v = normalize_or_zero(&axis.cross(&u));
    (u, v)
}

/// Up to two real roots of a quadratic, sorted ascending.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Roots {
    values: [f64; 2],
    len: usize,
}

impl Roots {
    /// No real roots.
    pub const NONE: Self = Self {
        values: [0.0; 2],
        len: 0,
    };

    fn one(x: f64) -> Self {
        Self {
            values: [x, 0.0],
            len: 1,
        }
    }

    /// Number of roots (0, 1 or 2).
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when there are no real roots.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Roots as a slice, ascending.
    pub fn as_slice(&self) -> &[f64] {
        &self.values[..self.len]
    }

    /// Iterate over the roots, ascending.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.as_slice().iter().copied()
    }
}

/// Solve `a·x² + b·x + c = 0` for real `x`.
///
/// One root comes from the sign-aware form `q = -(b + sign(b)·√disc) / 2`,
/// `x₀ = q / a`, and the other from the product of roots `x₁ = c / q`, which
/// avoids catastrophic cancellation when `b² ≫ 4ac`. Degree drops to linear
/// when `|a| ≤ 1e-12`. Non-finite roots are discarded and roots closer than
/// `1e-6` are merged.
pub fn solve_quadratic(a: f64, b: f64, c: f64) -> Roots {
    if a.abs() <= 1e-12 {
        if b.abs() <= 1e-12 {
            return Roots::NONE;
        }
        let x = -c / b;
        return if x.is_finite() { Roots::one(x) } else { Roots::NONE };
    }

    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 || !disc.is_finite() {
        return Roots::NONE;
    }

    let s = disc.sqrt();
    let sign = if b < 0.0 { -1.0 } else { 1.0 };
    let q = -0.5 * (b + sign * s);

    let mut found = [f64::NAN; 2];
    let mut n = 0;
    for x in [q / a, c / q] {
        if x.is_finite() {
            found[n] = x;
            n += 1;
        }
    }
    match n {
        0 => Roots::NONE,
        1 => Roots::one(found[0]),
        _ => {
            let (lo, hi) = if found[0] <= found[1] {
                (found[0], found[1])
            } else {
                (found[1], found[0])
            };
            if hi - lo > 1e-6 {
                Roots {
                    values: [lo, hi],
                    len: 2,
                }
            } else {
                Roots::one(lo)
            }
        }
    }
}
