//! Least-squares fitting of cubic Bezier chains to sampled polylines.
//!
//! Schneider's algorithm: chord-length parameters, a 2×2 least-squares solve
//! for the two handle lengths under fixed end tangents, Newton
//! reparameterization, and recursive splitting at the worst point.

use linework_geom::CubicBezier3;
use linework_math::{normalize_or_zero, Point3, Vec3};
use serde::{Deserialize, Serialize};

/// Tuning for [`fit_polyline`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BezierFitParams {
    /// World-space tolerance between the polyline and the fitted curve,
    /// at the input points and between them.
    pub max_error: f64,
    /// Recursion limit for splitting.
    pub max_depth: u32,
    /// Newton reparameterization rounds before splitting.
    pub reparam_iters: u32,
    /// Shortest allowed handle.
    pub min_alpha: f64,
    /// Longest allowed handle as a multiple of the segment chord.
    pub max_alpha_factor: f64,
    /// Start and end closer than this are snapped into a closed loop.
    pub close_eps: f64,
}

impl Default for BezierFitParams {
    fn default() -> Self {
        Self {
            max_error: 0.02,
            max_depth: 18,
            reparam_iters: 3,
            min_alpha: 1e-4,
            max_alpha_factor: 2.0,
            close_eps: 1e-3,
        }
    }
}

impl BezierFitParams {
    /// Set the error tolerance.
    pub fn with_max_error(mut self, max_error: f64) -> Self {
        self.max_error = max_error;
        self
    }

    /// Set the loop closure distance.
    pub fn with_close_eps(mut self, close_eps: f64) -> Self {
        self.close_eps = close_eps;
        self
    }

    /// Set the handle length cap factor.
    pub fn with_max_alpha_factor(mut self, factor: f64) -> Self {
        self.max_alpha_factor = factor;
        self
    }

    /// Set the recursion limit.
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the number of reparameterization rounds.
    pub fn with_reparam_iters(mut self, iters: u32) -> Self {
        self.reparam_iters = iters;
        self
    }

    /// Clamp nonsensical values to usable ones.
    ///
    /// Tolerances and handle bounds get small positive floors, the closure
    /// distance becomes non-negative; NaN falls back to the floor.
    pub fn sanitized(self) -> Self {
        let floor = |x: f64, min: f64| if x.is_finite() { x.max(min) } else { min };
        Self {
            max_error: floor(self.max_error, 1e-9),
            min_alpha: floor(self.min_alpha, 1e-12),
            max_alpha_factor: floor(self.max_alpha_factor, 1e-3),
            close_eps: floor(self.close_eps, 0.0),
            ..self
        }
    }
}

/// Result of [`fit_polyline_report`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FitReport {
    /// Fitted curve chain, in input order.
    pub curves: Vec<CubicBezier3>,
    /// True when some segment was accepted only because the depth limit was reached.
    pub depth_exhausted: bool,
}

/// Fit a chain of cubics through `points`.
///
/// Fewer than two distinct points yield an empty chain; exactly two yield a
/// straight cubic.
pub fn fit_polyline(points: &[Point3], params: &BezierFitParams) -> Vec<CubicBezier3> {
    fit_polyline_report(points, params).curves
}

/// [`fit_polyline`], also reporting whether the recursion limit was hit.
pub fn fit_polyline_report(points: &[Point3], params: &BezierFitParams) -> FitReport {
    let params = params.sanitized();
    let mut pts: Vec<Point3> = points
        .iter()
        .filter(|p| p.coords.iter().all(|c| c.is_finite()))
        .copied()
        .collect();
    if pts.len() < 2 {
        return FitReport::default();
    }

    let last = pts.len() - 1;
    if (pts[last] - pts[0]).norm_squared() <= params.close_eps * params.close_eps {
        pts[last] = pts[0];
    }
    pts.dedup_by(|b, a| (*b - *a).norm_squared() <= 1e-16);

    let mut fitter = Fitter {
        params,
        curves: Vec::new(),
        depth_exhausted: false,
    };
    match pts.as_slice() {
        [] | [_] => {}
        [a, b] => fitter.curves.push(CubicBezier3::line(*a, *b)),
        _ => {
            let tan_l = left_tangent(&pts);
            let tan_r = right_tangent(&pts);
            fitter.fit(&pts, tan_l, tan_r, 0);
        }
    }
    FitReport {
        curves: fitter.curves,
        depth_exhausted: fitter.depth_exhausted,
    }
}

struct Fitter {
    params: BezierFitParams,
    curves: Vec<CubicBezier3>,
    depth_exhausted: bool,
}

impl Fitter {
    /// `tan_l` points into the segment from its start, `tan_r` from its end.
    fn fit(&mut self, pts: &[Point3], tan_l: Vec3, tan_r: Vec3, depth: u32) {
        if let [a, b] = pts {
            let bez = self.fit_chord(a, b, &tan_l, &tan_r);
            self.curves.push(bez);
            return;
        }

        let mut u = chord_length_params(pts);
        let mut bez = self.generate(pts, &u, &tan_l, &tan_r);
        let (mut err, mut split) = worst_deviation(pts, &u, &bez);
        if err <= self.params.max_error {
            self.curves.push(bez);
            return;
        }
        if depth >= self.params.max_depth {
            self.curves.push(bez);
            self.depth_exhausted = true;
            return;
        }

        for _ in 0..self.params.reparam_iters {
            u = reparameterize(pts, &u, &bez);
            bez = self.generate(pts, &u, &tan_l, &tan_r);
            (err, split) = worst_deviation(pts, &u, &bez);
            if err <= self.params.max_error {
                self.curves.push(bez);
                return;
            }
        }

        let split = split.clamp(1, pts.len() - 2);
        let tan_m = center_tangent(pts, split);
        self.fit(&pts[..=split], tan_l, tan_m, depth + 1);
        self.fit(&pts[split..], -tan_m, tan_r, depth + 1);
    }

    /// Cubic over a single chord, keeping the end tangents where the handles
    /// stay within tolerance of the chord and falling back to a straight line.
    ///
    /// The curve lies in the hull of its control points, so bounding the two
    /// handle points bounds the whole curve.
    fn fit_chord(&self, a: &Point3, b: &Point3, tan_l: &Vec3, tan_r: &Vec3) -> CubicBezier3 {
        let mut alpha = self.params.min_alpha.max((b - a).norm() / 3.0);
        for _ in 0..6 {
            let (h1, h2) = (a + tan_l * alpha, b + tan_r * alpha);
            let bulge = segment_distance(&h1, a, b).max(segment_distance(&h2, a, b));
            if bulge <= self.params.max_error {
                return CubicBezier3::new(*a, h1, h2, *b);
            }
            alpha *= 0.5;
        }
        CubicBezier3::line(*a, *b)
    }

    fn generate(&self, pts: &[Point3], u: &[f64], tan_l: &Vec3, tan_r: &Vec3) -> CubicBezier3 {
        let (p0, p3) = (pts[0], pts[pts.len() - 1]);
        let (mut c00, mut c01, mut c11, mut x0, mut x1) = (0.0, 0.0, 0.0, 0.0, 0.0);

        for (p, &t) in pts.iter().zip(u) {
            let [b0, b1, b2, b3] = bernstein(t);
            let a1 = tan_l * b1;
            let a2 = tan_r * b2;
            c00 += a1.dot(&a1);
            c01 += a1.dot(&a2);
            c11 += a2.dot(&a2);
            let tmp = p.coords - (p0.coords * (b0 + b1) + p3.coords * (b2 + b3));
            x0 += a1.dot(&tmp);
            x1 += a2.dot(&tmp);
        }

        let det = c00 * c11 - c01 * c01;
        let (mut alpha_l, mut alpha_r) = if det.abs() > 1e-12 {
            ((x0 * c11 - x1 * c01) / det, (c00 * x1 - c01 * x0) / det)
        } else {
            (0.0, 0.0)
        };

        let seg_len = (p3 - p0).norm();
        let eps = self.params.min_alpha;
        if alpha_l.is_nan() || alpha_r.is_nan() || alpha_l < eps || alpha_r < eps {
            let a = eps.max(seg_len / 3.0);
            alpha_l = a;
            alpha_r = a;
        }
        let max_alpha = eps.max(seg_len * self.params.max_alpha_factor);
        alpha_l = alpha_l.clamp(eps, max_alpha);
        alpha_r = alpha_r.clamp(eps, max_alpha);

        CubicBezier3::new(p0, p0 + tan_l * alpha_l, p3 + tan_r * alpha_r, p3)
    }
}

#[inline]
fn bernstein(t: f64) -> [f64; 4] {
    let mt = 1.0 - t;
    [mt * mt * mt, 3.0 * mt * mt * t, 3.0 * mt * t * t, t * t * t]
}

fn chord_length_params(pts: &[Point3]) -> Vec<f64> {
    let mut u = Vec::with_capacity(pts.len());
    let mut total = 0.0;
    u.push(0.0);
    for w in pts.windows(2) {
        total += (w[1] - w[0]).norm();
        u.push(total);
    }
    if total <= 1e-12 {
        return vec![0.0; pts.len()];
    }
    u.iter().map(|x| x / total).collect()
}

/// Largest deviation over interior points and where it occurs.
fn max_error_point(pts: &[Point3], u: &[f64], bez: &CubicBezier3) -> (f64, usize) {
    let mut max_dist = 0.0;
    let mut split = pts.len() / 2;
    for i in 1..pts.len().saturating_sub(1) {
        let d = (bez.eval(u[i]) - pts[i]).norm();
        if d > max_dist {
            max_dist = d;
            split = i;
        }
    }
    (max_dist, split)
}

/// Curve samples per chord when measuring deviation from the polyline.
const CHORD_SAMPLES: usize = 16;

const GOLDEN: f64 = 0.618_033_988_749_895;

/// The larger of the point error and the curve-to-polyline deviation, with a split index.
fn worst_deviation(pts: &[Point3], u: &[f64], bez: &CubicBezier3) -> (f64, usize) {
    let (point_err, point_split) = max_error_point(pts, u, bez);
    let (chord_err, chord_split) = max_chord_deviation(pts, u, bez);
    if point_err >= chord_err {
        (point_err, point_split)
    } else {
        (chord_err, chord_split)
    }
}

/// Largest distance from the curve to the polyline between the input points.
///
/// The curve over `[u[i], u[i + 1]]` is compared with chord `i` and its
/// neighbours. Each chord's worst sample is refined by golden-section search.
fn max_chord_deviation(pts: &[Point3], u: &[f64], bez: &CubicBezier3) -> (f64, usize) {
    let last = pts.len() - 1;
    let chord_dist = |i: usize, t: f64| {
        let q = bez.eval(t);
        (i.saturating_sub(1)..=(i + 1).min(last - 1))
            .map(|k| segment_distance(&q, &pts[k], &pts[k + 1]))
            .fold(f64::INFINITY, f64::min)
    };

    let mut max_dist = 0.0;
    let mut split = pts.len() / 2;
    for i in 0..last {
        let h = (u[i + 1] - u[i]) / CHORD_SAMPLES as f64;
        let (mut d, mut t) = (0.0_f64, u[i]);
        for j in 1..CHORD_SAMPLES {
            let tj = u[i] + h * j as f64;
            let dj = chord_dist(i, tj);
            if dj > d {
                (d, t) = (dj, tj);
            }
        }
        let (mut lo, mut hi) = ((t - h.abs()).max(0.0), (t + h.abs()).min(1.0));
        for _ in 0..24 {
            let m1 = hi - GOLDEN * (hi - lo);
            let m2 = lo + GOLDEN * (hi - lo);
            if chord_dist(i, m1) < chord_dist(i, m2) {
                lo = m1;
            } else {
                hi = m2;
            }
        }
        let d = d.max(chord_dist(i, 0.5 * (lo + hi)));
        if d > max_dist {
            max_dist = d;
            let nearer_start = (t - u[i]).abs() <= (u[i + 1] - t).abs();
            split = if nearer_start { i } else { i + 1 };
        }
    }
    (max_dist, split)
}

fn segment_distance(p: &Point3, a: &Point3, b: &Point3) -> f64 {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq <= 1e-24 {
        return (p - a).norm();
    }
    let t = ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    (p - (a + ab * t)).norm()
}

fn reparameterize(pts: &[Point3], u: &[f64], bez: &CubicBezier3) -> Vec<f64> {
    pts.iter()
        .zip(u)
        .map(|(p, &t)| newton_step(bez, p, t))
        .collect()
}

/// One Newton step on `(Q(t) - p)·Q'(t) = 0`.
fn newton_step(bez: &CubicBezier3, p: &Point3, t: f64) -> f64 {
    let diff = bez.eval(t) - p;
    let d1 = bez.derivative(t);
    let d2 = bez.second_derivative(t);
    let num = diff.dot(&d1);
    let den = d1.dot(&d1) + diff.dot(&d2);
    if den.abs() <= 1e-12 {
        return t;
    }
    (t - num / den).clamp(0.0, 1.0)
}

fn left_tangent(pts: &[Point3]) -> Vec3 {
    let p0 = pts[0];
    let k = 4.min(pts.len() - 1);
    let acc: Vec3 = pts[1..=k].iter().map(|p| *p - p0).sum();
    let t = normalize_or_zero(&acc);
    if t != Vec3::zeros() {
        t
    } else {
        normalize_or_zero(&(pts[1] - p0))
    }
}

fn right_tangent(pts: &[Point3]) -> Vec3 {
    let n = pts.len();
    let pn = pts[n - 1];
    let k = 4.min(n - 1);
    let acc: Vec3 = pts[n - 1 - k..n - 1].iter().map(|p| *p - pn).sum();
    let t = normalize_or_zero(&acc);
    if t != Vec3::zeros() {
        t
    } else {
        normalize_or_zero(&(pts[n - 2] - pn))
    }
}

/// Direction at `pts[i]` pointing back toward `pts[i - 1]`, from its neighbours.
fn center_tangent(pts: &[Point3], i: usize) -> Vec3 {
    let prev = pts[i.saturating_sub(1)];
    let next = pts[(i + 1).min(pts.len() - 1)];
    normalize_or_zero(&(prev - next))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, TAU};

    fn arc_points(n: usize, radius: f64, sweep: f64) -> Vec<Point3> {
        (0..=n)
            .map(|i| {
                let a = sweep * i as f64 / n as f64;
                Point3::new(radius * a.cos(), radius * a.sin(), 0.0)
            })
            .collect()
    }

    /// Worst distance from densely resampled curves to the nearest polyline segment.
    fn polyline_deviation(curves: &[CubicBezier3], pts: &[Point3]) -> f64 {
        curves
            .iter()
            .flat_map(|c| (0..=400).map(move |i| c.eval(i as f64 / 400.0)))
            .map(|q| {
                pts.windows(2)
                    .map(|w| segment_distance(&q, &w[0], &w[1]))
                    .fold(f64::INFINITY, f64::min)
            })
            .fold(0.0, f64::max)
    }

    #[test]
    fn test_two_points_give_line() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(3.0, 0.0, 0.0);
        let out = fit_polyline(&[a, b], &BezierFitParams::default());
        assert_eq!(out, vec![CubicBezier3::line(a, b)]);
    }

    #[test]
    fn test_too_few_points() {
        let p = BezierFitParams::default();
        assert!(fit_polyline(&[], &p).is_empty());
        assert!(fit_polyline(&[Point3::origin()], &p).is_empty());
        // all duplicates collapse to a single point
        assert!(fit_polyline(&[Point3::origin(); 5], &p).is_empty());
    }

    #[test]
    fn test_fit_tolerance_on_arc() {
        let pts = arc_points(64, 2.0, FRAC_PI_2 * 3.0);
        let params = BezierFitParams::default().with_max_error(0.005);
        let report = fit_polyline_report(&pts, &params);
        assert!(!report.depth_exhausted);
        assert!(!report.curves.is_empty());
        assert!(polyline_deviation(&report.curves, &pts) <= 0.005);
        // chain is continuous and covers the input ends
        for w in report.curves.windows(2) {
            assert_eq!(w[0].p3, w[1].p0);
        }
        assert_eq!(report.curves[0].p0, pts[0]);
        assert_eq!(report.curves.last().map(|c| c.p3), pts.last().copied());
    }

    #[test]
    fn test_fit_tolerance_on_sparse_arcs() {
        // chords far longer than the tolerance; the curve must hug the corners
        for n in [12, 8] {
            let pts = arc_points(n, 2.0, FRAC_PI_2 * 3.0);
            let report = fit_polyline_report(&pts, &BezierFitParams::default().with_max_error(0.005));
            assert!(!report.depth_exhausted);
            assert!(polyline_deviation(&report.curves, &pts) <= 0.005, "n = {n}");
            for w in report.curves.windows(2) {
                assert_eq!(w[0].p3, w[1].p0);
            }
        }
    }

    #[test]
    fn test_single_chord_handles_stay_near_chord() {
        let (a, b) = (Point3::origin(), Point3::new(1.0, 0.0, 0.0));
        let fitter = Fitter {
            params: BezierFitParams::default().with_max_error(0.01),
            curves: Vec::new(),
            depth_exhausted: false,
        };
        // tangents at 45 degrees to the chord would bulge far past 0.01
        let tan_l = Vec3::new(1.0, 1.0, 0.0).normalize();
        let tan_r = Vec3::new(-1.0, 1.0, 0.0).normalize();
        let bez = fitter.fit_chord(&a, &b, &tan_l, &tan_r);
        assert_eq!((bez.p0, bez.p3), (a, b));
        assert!(segment_distance(&bez.p1, &a, &b) <= 0.01);
        assert!(segment_distance(&bez.p2, &a, &b) <= 0.01);
        // aligned tangents keep the usual third-of-chord handles
        let aligned = fitter.fit_chord(&a, &b, &Vec3::x(), &-Vec3::x());
        assert!((aligned.p1.x - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_closed_loop_is_snapped() {
        let mut pts = arc_points(96, 1.0, TAU);
        let n = pts.len();
        pts[n - 1].x += 1e-4;
        let curves = fit_polyline(&pts, &BezierFitParams::default().with_max_error(0.01));
        let first = curves[0].p0;
        let last = curves[curves.len() - 1].p3;
        assert_eq!(first, last);
    }

    #[test]
    fn test_depth_exhaustion_is_reported() {
        // zig-zag that a single cubic cannot follow
        let pts: Vec<Point3> = (0..40)
            .map(|i| Point3::new(i as f64, if i % 2 == 0 { 0.0 } else { 1.0 }, 0.0))
            .collect();
        let params = BezierFitParams::default()
            .with_max_error(1e-6)
            .with_max_depth(0)
            .with_reparam_iters(0);
        let report = fit_polyline_report(&pts, &params);
        assert!(report.depth_exhausted);
        assert_eq!(report.curves.len(), 1);
    }

    #[test]
    fn test_straight_polyline_single_curve() {
        let pts: Vec<Point3> = (0..10).map(|i| Point3::new(i as f64 * 0.1, 0.0, 0.0)).collect();
        let curves = fit_polyline(&pts, &BezierFitParams::default());
        assert_eq!(curves.len(), 1);
        assert!((curves[0].eval(0.5) - Point3::new(0.45, 0.0, 0.0)).norm() < 0.02);
    }

    #[test]
    fn test_sanitized() {
        let p = BezierFitParams {
            max_error: -1.0,
            close_eps: f64::NAN,
            ..Default::default()
        }
        .sanitized();
        assert!(p.max_error > 0.0);
        assert_eq!(p.close_eps, 0.0);
    }

    #[test]
    fn test_sparse_config_deserializes() {
        let p: BezierFitParams = serde_json::from_str(r#"{ "max_error": 0.1 }"#).unwrap();
        assert_eq!(p.max_error, 0.1);
        assert_eq!(p.max_depth, 18);
        assert_eq!(p.close_eps, 1e-3);
    }
}
