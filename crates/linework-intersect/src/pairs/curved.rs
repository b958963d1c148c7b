//! Curved-curved pairs: sphere, cylinder and cone in every combination.

use std::f64::consts::TAU;

use linework_geom::{circle_to_cubics, Cone, CubicBezier3, Cylinder, Sphere};
use linework_math::{basis_from_axis, solve_quadratic, Point3, Roots, Vec3};

use super::ring_dir;
use crate::assemble::{assemble_branches, BranchTuning, FitStrategy, JumpRule};
use crate::branch::{BranchState, KeyedCandidate};

/// Axial slack when checking a point against the other solid's height range.
const AXIAL_SLACK: f64 = 1e-6;

const SPHERE_TUNING: BranchTuning = BranchTuning {
    jump: JumpRule::Steps(12.0),
    error_steps: 0.55,
    max_alpha_factor: None,
};

const CYLINDER_TUNING: BranchTuning = BranchTuning {
    jump: JumpRule::Steps(14.0),
    error_steps: 0.6,
    max_alpha_factor: None,
};

const CONE_CONE_TUNING: BranchTuning = BranchTuning {
    jump: JumpRule::Adaptive,
    error_steps: 0.65,
    max_alpha_factor: Some(1.2),
};

/// Extra samples placed between a regular sample and a turning point.
const TURN_SAMPLES: usize = 4;

/// `a·s² + b·s + c = 0` along one sample direction.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Quadratic {
    a: f64,
    b: f64,
    c: f64,
}

impl Quadratic {
    fn roots(&self) -> Roots {
        solve_quadratic(self.a, self.b, self.c)
    }

    fn has_real_roots(&self) -> bool {
        self.b * self.b - 4.0 * self.a * self.c >= 0.0
    }

    /// The double root where the two real roots meet, if the equation is quadratic.
    fn vertex(&self) -> Option<f64> {
        (self.a.abs() > 1e-12).then(|| -self.b / (2.0 * self.a))
    }
}

/// Sample `n` directions around `axis` and fold each sample's candidates into branches.
///
/// `quadratic` gives the equation along a direction and `candidate` maps one
/// of its roots to a point or rejects it. Where the equation gains or loses
/// its real roots between two samples, the turning direction is located by
/// bisection and its double root is given to both branches, approached by
/// samples spaced quadratically in angle so the key steps stay even. The two
/// branches of a closed loop then meet at both of its turning points.
fn sample_branches(
    n: usize,
    axis: &Vec3,
    quadratic: impl Fn(&Vec3) -> Quadratic,
    candidate: impl Fn(&Vec3, f64) -> Option<KeyedCandidate>,
) -> BranchState {
    let (u, v) = basis_from_axis(axis);
    let dir = |theta: f64| ring_dir(&u, &v, theta);
    let real = |theta: f64| quadratic(&dir(theta)).has_real_roots();
    let sample = |state: BranchState, theta: f64| {
        let w = dir(theta);
        let found: Vec<KeyedCandidate> = quadratic(&w)
            .roots()
            .iter()
            .filter_map(|s| candidate(&w, s))
            .collect();
        state.assign(&found)
    };
    let turn = |state: BranchState, theta: f64| {
        let w = dir(theta);
        match quadratic(&w).vertex().and_then(|s| candidate(&w, s)) {
            Some(c) => state.assign(&[c, c]),
            None => state,
        }
    };

    let step = TAU / n as f64;
    let mut state = BranchState::new();
    for i in 0..n {
        let t0 = step * i as f64;
        let t1 = t0 + step;
        state = sample(state, t0);
        let real0 = real(t0);
        if real0 == real(t1) {
            continue;
        }
        let edge = bisect_edge(t0, t1, real0, &real);
        if real0 {
            let gap = edge - t0;
            for j in 1..TURN_SAMPLES {
                let f = 1.0 - j as f64 / TURN_SAMPLES as f64;
                state = sample(state, edge - gap * f * f);
            }
            state = turn(state, edge);
        } else {
            state = turn(state, edge);
            let gap = t1 - edge;
            for j in 1..TURN_SAMPLES {
                let f = j as f64 / TURN_SAMPLES as f64;
                state = sample(state, edge + gap * f * f);
            }
        }
    }
    state
}

/// Bisect between `t0` and `t1` for where `real` flips; returns the side where it holds.
fn bisect_edge(t0: f64, t1: f64, real_at_t0: bool, real: impl Fn(f64) -> bool) -> f64 {
    let (mut inside, mut outside) = if real_at_t0 { (t0, t1) } else { (t1, t0) };
    for _ in 0..48 {
        let mid = 0.5 * (inside + outside);
        if real(mid) {
            inside = mid;
        } else {
            outside = mid;
        }
    }
    inside
}

fn angular_step(radius: f64, n: usize) -> f64 {
    TAU * radius.max(1e-3) / n as f64
}

fn in_range(x: f64, hi: f64) -> bool {
    (0.0..=hi).contains(&x)
}

/// `|(y0 + d·s)⊥|² = r²` against a cylinder axis through the origin.
fn cylinder_constraint(y0: &Vec3, d: &Vec3, c: &Cylinder) -> Quadratic {
    let a = c.axis;
    let p0 = y0 - a * y0.dot(&a);
    let p1 = d - a * d.dot(&a);
    Quadratic {
        a: p1.dot(&p1),
        b: 2.0 * p0.dot(&p1),
        c: p0.dot(&p0) - c.radius * c.radius,
    }
}

/// `|z⊥|² = (k·y)²` for `x0 + d·s`, with `z` measured from the cone apex.
///
/// This is the double cone; callers reject the far nappe with [`inside_cone_axial`].
fn cone_constraint(x0: &Point3, d: &Vec3, cone: &Cone) -> Quadratic {
    let a = cone.axis;
    let k2 = cone.slope() * cone.slope();
    let z0 = x0 - cone.apex;
    let y0 = z0.dot(&a);
    let y1 = d.dot(&a);
    let p0 = z0 - a * y0;
    let p1 = d - a * y1;
    Quadratic {
        a: p1.dot(&p1) - k2 * y1 * y1,
        b: 2.0 * p0.dot(&p1) - 2.0 * k2 * y0 * y1,
        c: p0.dot(&p0) - k2 * y0 * y0,
    }
}

fn inside_cylinder_axial(p: &Point3, c: &Cylinder) -> bool {
    let y = (p - c.base).dot(&c.axis);
    y >= -AXIAL_SLACK && y <= c.height + AXIAL_SLACK
}

fn inside_cone_axial(p: &Point3, c: &Cone) -> bool {
    let y = (p - c.apex).dot(&c.axis);
    y >= -AXIAL_SLACK && y <= c.height + AXIAL_SLACK
}

/// Sphere-sphere: a circle on the plane between the centers, exact.
///
/// Coincident centers, separated spheres and nested spheres give nothing.
pub fn intersect_sphere_sphere(s0: &Sphere, s1: &Sphere) -> Vec<CubicBezier3> {
    let delta = s1.center - s0.center;
    let d = delta.norm();
    let (r0, r1) = (s0.radius, s1.radius);
    if d <= 1e-9 || d > r0 + r1 || d < (r0 - r1).abs() {
        return Vec::new();
    }
    let x = (r0 * r0 - r1 * r1 + d * d) / (2.0 * d);
    let h2 = r0 * r0 - x * x;
    if h2 < 0.0 {
        return Vec::new();
    }
    let n = delta / d;
    circle_to_cubics(&(s0.center + n * x), &n, h2.sqrt())
}

/// Sphere-cylinder, sampled around the cylinder axis; key is the axial height.
pub fn intersect_sphere_cylinder(
    s: &Sphere,
    c: &Cylinder,
    samples: usize,
    strategy: FitStrategy,
) -> Vec<CubicBezier3> {
    let n = samples.max(32);
    let a = c.axis;
    let r2 = s.radius * s.radius;
    let state = sample_branches(
        n,
        &a,
        |w| {
            let q = (c.base - s.center) + w * c.radius;
            Quadratic {
                a: 1.0,
                b: 2.0 * a.dot(&q),
                c: q.dot(&q) - r2,
            }
        },
        |w, h| {
            in_range(h, c.height).then(|| KeyedCandidate {
                key: h,
                point: c.base + a * h + w * c.radius,
            })
        },
    );
    assemble_branches(&state, angular_step(c.radius, n), &SPHERE_TUNING, strategy)
}

/// Sphere-cone, sampled around the cone axis; key is the distance from the apex.
pub fn intersect_sphere_cone(
    s: &Sphere,
    cone: &Cone,
    samples: usize,
    strategy: FitStrategy,
) -> Vec<CubicBezier3> {
    let n = samples.max(32);
    let a = cone.axis;
    let k = cone.slope();
    let d0 = cone.apex - s.center;
    let (qa, qc) = (1.0 + k * k, d0.dot(&d0) - s.radius * s.radius);
    let state = sample_branches(
        n,
        &a,
        |w| Quadratic {
            a: qa,
            b: 2.0 * d0.dot(&(a + w * k)),
            c: qc,
        },
        |w, y| {
            in_range(y, cone.height).then(|| KeyedCandidate {
                key: y,
                point: cone.apex + (a + w * k) * y,
            })
        },
    );
    assemble_branches(&state, angular_step(cone.base_radius, n), &SPHERE_TUNING, strategy)
}

/// Cylinder-cylinder, sampled around the first cylinder's axis.
pub fn intersect_cylinder_cylinder(
    c0: &Cylinder,
    c1: &Cylinder,
    samples: usize,
    strategy: FitStrategy,
) -> Vec<CubicBezier3> {
    let n = samples.max(48);
    let a0 = c0.axis;
    let state = sample_branches(
        n,
        &a0,
        |w| cylinder_constraint(&((c0.base - c1.base) + w * c0.radius), &a0, c1),
        |w, s| {
            let point = c0.base + a0 * s + w * c0.radius;
            (in_range(s, c0.height) && inside_cylinder_axial(&point, c1))
                .then_some(KeyedCandidate { key: s, point })
        },
    );
    let step = angular_step(c0.radius.max(c1.radius), n);
    assemble_branches(&state, step, &CYLINDER_TUNING, strategy)
}

/// Cylinder-cone, sampled around the cylinder axis.
pub fn intersect_cylinder_cone(
    c: &Cylinder,
    cone: &Cone,
    samples: usize,
    strategy: FitStrategy,
) -> Vec<CubicBezier3> {
    let n = samples.max(48);
    let a = c.axis;
    let state = sample_branches(
        n,
        &a,
        |w| cone_constraint(&(c.base + w * c.radius), &a, cone),
        |w, s| {
            let point = c.base + w * c.radius + a * s;
            (in_range(s, c.height) && inside_cone_axial(&point, cone))
                .then_some(KeyedCandidate { key: s, point })
        },
    );
    let step = angular_step(c.radius.max(cone.base_radius), n);
    assemble_branches(&state, step, &CYLINDER_TUNING, strategy)
}

/// Cone-cone, sampled along the rulings of the first cone.
///
/// Branches here can appear and vanish mid-sweep, so runs are split with an
/// adaptive spacing threshold.
pub fn intersect_cone_cone(
    cone0: &Cone,
    cone1: &Cone,
    samples: usize,
    strategy: FitStrategy,
) -> Vec<CubicBezier3> {
    let n = samples.max(64);
    let a0 = cone0.axis;
    let k0 = cone0.slope();
    let state = sample_branches(
        n,
        &a0,
        |w| cone_constraint(&cone0.apex, &(a0 + w * k0), cone1),
        |w, y| {
            let point = cone0.apex + (a0 + w * k0) * y;
            (in_range(y, cone0.height) && inside_cone_axial(&point, cone1))
                .then_some(KeyedCandidate { key: y, point })
        },
    );
    let step = angular_step(cone0.base_radius.max(cone1.base_radius), n);
    assemble_branches(&state, step, &CONE_CONE_TUNING, strategy)
}
