//! Two-branch tracking for sampled quadratic intersections.
//!
//! Each angular sample of a pair solver yields up to two roots. Matching them
//! to branches by their algebraic key (the root value itself) keeps branch
//! identity stable where the two branches pass close together in space.

use linework_math::Point3;

/// An intersection point together with the root value that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyedCandidate {
    /// Root of the sample's quadratic (axial height, cone parameter, ...).
    pub key: f64,
    /// World-space point for that root.
    pub point: Point3,
}

/// Accumulated points and keys of the two branches.
///
/// Threaded through the sampling loop as a fold accumulator:
/// `state = state.assign(&candidates)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BranchState {
    /// Points of branch 0 (low key at birth).
    pub points0: Vec<Point3>,
    /// Points of branch 1 (high key at birth).
    pub points1: Vec<Point3>,
    /// Keys parallel to `points0`.
    pub keys0: Vec<f64>,
    /// Keys parallel to `points1`.
    pub keys1: Vec<f64>,
}

impl BranchState {
    /// Empty branches.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append this sample's candidates to the branches.
    ///
    /// Candidates with a non-finite key or point are dropped. With two
    /// candidates and two empty branches the lower key opens branch 0. Each
    /// candidate otherwise goes to the branch whose latest key is nearest; two
    /// candidates are matched jointly so they never land on the same branch.
    pub fn assign(mut self, candidates: &[KeyedCandidate]) -> Self {
        let mut finite = candidates
            .iter()
            .filter(|c| c.key.is_finite() && c.point.coords.iter().all(|x| x.is_finite()));
        let (first, second) = (finite.next().copied(), finite.next().copied());

        match (first, second) {
            (None, _) => {}
            (Some(c), None) => {
                let d0 = key_distance(self.keys0.last(), c.key);
                let d1 = key_distance(self.keys1.last(), c.key);
                if d0 <= d1 {
                    self.push0(c);
                } else {
                    self.push1(c);
                }
            }
            (Some(a), Some(b)) => {
                let (lo, hi) = if a.key <= b.key { (a, b) } else { (b, a) };
                match (self.keys0.last().copied(), self.keys1.last().copied()) {
                    (None, None) => {
                        self.push0(lo);
                        self.push1(hi);
                    }
                    (Some(k0), None) => {
                        let (near, far) = nearer(k0, lo, hi);
                        self.push0(near);
                        self.push1(far);
                    }
                    (None, Some(k1)) => {
                        let (near, far) = nearer(k1, lo, hi);
                        self.push1(near);
                        self.push0(far);
                    }
                    (Some(k0), Some(k1)) => {
                        let straight = (k0 - lo.key).abs() + (k1 - hi.key).abs();
                        let crossed = (k0 - hi.key).abs() + (k1 - lo.key).abs();
                        if straight <= crossed {
                            self.push0(lo);
                            self.push1(hi);
                        } else {
                            self.push0(hi);
                            self.push1(lo);
                        }
                    }
                }
            }
        }
        self
    }

    /// True when neither branch has any point.
    pub fn is_empty(&self) -> bool {
        self.points0.is_empty() && self.points1.is_empty()
    }

    fn push0(&mut self, c: KeyedCandidate) {
        self.points0.push(c.point);
        self.keys0.push(c.key);
    }

    fn push1(&mut self, c: KeyedCandidate) {
        self.points1.push(c.point);
        self.keys1.push(c.key);
    }
}

fn key_distance(last: Option<&f64>, key: f64) -> f64 {
    last.map_or(f64::INFINITY, |k| (k - key).abs())
}

fn nearer(k: f64, a: KeyedCandidate, b: KeyedCandidate) -> (KeyedCandidate, KeyedCandidate) {
    if (k - a.key).abs() <= (k - b.key).abs() {
        (a, b)
    } else {
        (b, a)
    }
}
