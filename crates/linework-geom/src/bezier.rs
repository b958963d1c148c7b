//! Cubic Bezier curves in 3D, the universal curve currency of the renderer.

use linework_math::{Point3, Vec3};

/// A cubic Bezier curve with four control points.
///
/// `B(t) = (1-t)³·p0 + 3(1-t)²t·p1 + 3(1-t)t²·p2 + t³·p3`, `t ∈ [0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier3 {
    /// Start point.
    pub p0: Point3,
    /// First handle.
    pub p1: Point3,
    /// Second handle.
    pub p2: Point3,
    /// End point.
    pub p3: Point3,
}

#[inline]
fn lerp(a: &Point3, b: &Point3, t: f64) -> Point3 {
    a + (b - a) * t
}

impl CubicBezier3 {
    /// Create a curve from its four control points.
    pub fn new(p0: Point3, p1: Point3, p2: Point3, p3: Point3) -> Self {
        Self { p0, p1, p2, p3 }
    }

    /// A straight segment with handles at 1/3 and 2/3 of the chord.
    pub fn line(a: Point3, b: Point3) -> Self {
        let d = b - a;
        Self {
            p0: a,
            p1: a + d / 3.0,
            p2: a + d * (2.0 / 3.0),
            p3: b,
        }
    }

    /// Evaluate the curve at `t` by de Casteljau.
    pub fn eval(&self, t: f64) -> Point3 {
        let a = lerp(&self.p0, &self.p1, t);
        let c = lerp(&self.p1, &self.p2, t);
        let d = lerp(&self.p2, &self.p3, t);
        let e = lerp(&a, &c, t);
        let f = lerp(&c, &d, t);
        lerp(&e, &f, t)
    }

    /// First derivative `B'(t)`.
    pub fn derivative(&self, t: f64) -> Vec3 {
        let mt = 1.0 - t;
        let d0 = self.p1 - self.p0;
        let d1 = self.p2 - self.p1;
        let d2 = self.p3 - self.p2;
        (d0 * (mt * mt) + d1 * (2.0 * mt * t) + d2 * (t * t)) * 3.0
    }

    /// Second derivative `B''(t)`.
    pub fn second_derivative(&self, t: f64) -> Vec3 {
        let a = self.p2.coords - self.p1.coords * 2.0 + self.p0.coords;
        let b = self.p3.coords - self.p2.coords * 2.0 + self.p1.coords;
        (a * (1.0 - t) + b * t) * 6.0
    }

    /// Split exactly at `t` into `(left, right)`.
    ///
    /// `left` covers `[0, t]` and `right` covers `[t, 1]`; they share the
    /// point `eval(t)`.
    pub fn split(&self, t: f64) -> (Self, Self) {
        let a = lerp(&self.p0, &self.p1, t);
        let c = lerp(&self.p1, &self.p2, t);
        let d = lerp(&self.p2, &self.p3, t);
        let e = lerp(&a, &c, t);
        let f = lerp(&c, &d, t);
        let g = lerp(&e, &f, t);
        (
            Self {
                p0: self.p0,
                p1: a,
                p2: e,
                p3: g,
            },
            Self {
                p0: g,
                p1: f,
                p2: d,
                p3: self.p3,
            },
        )
    }

    /// The same curve traversed from `p3` to `p0`.
    pub fn reversed(&self) -> Self {
        Self {
            p0: self.p3,
            p1: self.p2,
            p2: self.p1,
            p3: self.p0,
        }
    }

    /// Squared endpoint-to-endpoint distance.
    #[inline]
    pub fn chord_len_sq(&self) -> f64 {
        (self.p3 - self.p0).norm_squared()
    }

    /// True when every control point lies within `sqrt(eps_sq)` of `p0`.
    ///
    /// A closed loop (p0 = p3 with distinct handles) is not degenerate.
    pub fn is_degenerate(&self, eps_sq: f64) -> bool {
        (self.p3 - self.p0).norm_squared() <= eps_sq
            && (self.p1 - self.p0).norm_squared() <= eps_sq
            && (self.p2 - self.p0).norm_squared() <= eps_sq
    }

    /// True when all control points are finite.
    pub fn is_finite(&self) -> bool {
        [self.p0, self.p1, self.p2, self.p3]
            .iter()
            .all(|p| p.coords.iter().all(|c| c.is_finite()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample() -> CubicBezier3 {
        CubicBezier3::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 2.0, 0.0),
            Point3::new(3.0, 2.0, 1.0),
            Point3::new(4.0, 0.0, 1.0),
        )
    }

    #[test]
    fn test_eval_endpoints() {
        let b = sample();
        assert!((b.eval(0.0) - b.p0).norm() < 1e-12);
        assert!((b.eval(1.0) - b.p3).norm() < 1e-12);
    }

    #[test]
    fn test_line_is_uniform() {
        let b = CubicBezier3::line(Point3::origin(), Point3::new(3.0, 0.0, 0.0));
        assert_relative_eq!(b.p1.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(b.p2.x, 2.0, epsilon = 1e-12);
        // parameter equals arc length fraction for a uniform line
        assert_relative_eq!(b.eval(0.25).x, 0.75, epsilon = 1e-12);
    }

    #[test]
    fn test_split_matches_eval() {
        let b = sample();
        let (left, right) = b.split(0.3);
        assert!((left.p3 - b.eval(0.3)).norm() < 1e-12);
        assert_eq!(left.p3, right.p0);
        for i in 0..=10 {
            let s = i as f64 / 10.0;
            assert!((left.eval(s) - b.eval(0.3 * s)).norm() < 1e-12);
            assert!((right.eval(s) - b.eval(0.3 + 0.7 * s)).norm() < 1e-12);
        }
    }

    #[test]
    fn test_derivative_finite_difference() {
        let b = sample();
        let h = 1e-6;
        for &t in &[0.1, 0.5, 0.9] {
            let fd = (b.eval(t + h) - b.eval(t - h)) / (2.0 * h);
            assert!((fd - b.derivative(t)).norm() < 1e-6);
            let fd2 = (b.derivative(t + h) - b.derivative(t - h)) / (2.0 * h);
            assert!((fd2 - b.second_derivative(t)).norm() < 1e-5);
        }
    }

    #[test]
    fn test_degenerate() {
        let p = Point3::new(1.0, 1.0, 1.0);
        assert!(CubicBezier3::line(p, p).is_degenerate(1e-18));
        // closed loop with real handles is kept
        let loop_ = CubicBezier3::new(p, Point3::new(2.0, 1.0, 1.0), Point3::new(2.0, 2.0, 1.0), p);
        assert!(!loop_.is_degenerate(1e-18));
        assert!(!sample().is_degenerate(1e-18));
    }

    #[test]
    fn test_reversed() {
        let b = sample();
        let r = b.reversed();
        assert!((r.eval(0.2) - b.eval(0.8)).norm() < 1e-12);
        assert!(b.is_finite());
    }
}
