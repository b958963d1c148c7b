//! Locating the parameters where a curve changes visibility.

use linework_geom::CubicBezier3;
use linework_math::{clamp01, dedupe_sorted};
use linework_raytrace::PrimitiveId;

use crate::oracle::VisibilityOracle;
use crate::types::VisibilityParams;

/// Visibility transitions along one curve.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibilityCuts {
    /// Strictly increasing cut parameters in `(cut_eps, 1 - cut_eps)`.
    pub cuts: Vec<f64>,
    /// Visibility of each segment between cuts; `cuts.len() + 1` entries.
    ///
    /// Segment 0 spans `0..cuts[0]`, segment `i` spans `cuts[i-1]..cuts[i]`
    /// and the last one ends at 1.
    pub segment_visible: Vec<bool>,
}

struct Sampler<'a, O: ?Sized> {
    curve: &'a CubicBezier3,
    oracle: &'a O,
    eps: f64,
    owners: Option<&'a [PrimitiveId]>,
}

impl<O: VisibilityOracle + ?Sized> Sampler<'_, O> {
    fn at(&self, t: f64) -> bool {
        self.oracle
            .is_visible(&self.curve.eval(t), self.eps, self.owners)
    }

    /// Bisect `[lo, hi]` toward the transition, keeping `lo` on the `vis_lo` side.
    fn refine(&self, mut lo: f64, mut hi: f64, vis_lo: bool, iters: u32) -> f64 {
        for _ in 0..iters {
            let mid = 0.5 * (lo + hi);
            if self.at(mid) == vis_lo {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        0.5 * (lo + hi)
    }
}

/// Replace each interior sample by the majority of itself and its two neighbors.
///
/// Isolated single-sample flips disappear; transitions that last two or more
/// samples survive.
fn majority_filter(vis: &[bool]) -> Vec<bool> {
    let mut out = vis.to_vec();
    for i in 1..vis.len().saturating_sub(1) {
        let count = vis[i - 1] as u8 + vis[i] as u8 + vis[i + 1] as u8;
        out[i] = count >= 2;
    }
    out
}

/// Find the visibility transitions of `curve`.
///
/// Samples the oracle at `samples + 1` uniform parameters, smooths the result
/// with a 3-point majority filter, and bisects every remaining transition.
/// Segment visibility is read from the smoothed samples, so no extra oracle
/// queries are made beyond sampling and bisection.
///
/// With a coarse pre-pass enabled, a curve showing no transition at coarse
/// resolution gets zero cuts and the visibility of its midpoint.
pub fn find_visibility_cuts<O: VisibilityOracle + ?Sized>(
    curve: &CubicBezier3,
    oracle: &O,
    params: &VisibilityParams,
    owners: Option<&[PrimitiveId]>,
) -> VisibilityCuts {
    let params = params.sanitized();
    let n = params.samples;
    let sampler = Sampler {
        curve,
        oracle,
        eps: params.eps_visible,
        owners,
    };

    if let Some(coarse) = params.coarse_samples {
        let first = sampler.at(0.0);
        let changes = (1..=coarse).any(|i| sampler.at(i as f64 / coarse as f64) != first);
        if !changes {
            return VisibilityCuts {
                cuts: Vec::new(),
                segment_visible: vec![sampler.at(0.5)],
            };
        }
    }

    let raw: Vec<bool> = (0..=n).map(|i| sampler.at(i as f64 / n as f64)).collect();
    let vis = majority_filter(&raw);

    let mut cuts: Vec<f64> = (1..=n)
        .filter(|&i| vis[i - 1] != vis[i])
        .map(|i| {
            let t0 = (i - 1) as f64 / n as f64;
            let t1 = i as f64 / n as f64;
            clamp01(sampler.refine(t0, t1, vis[i - 1], params.refine_iters))
        })
        .collect();
    cuts.sort_by(f64::total_cmp);
    let eps = params.cut_eps;
    let cuts: Vec<f64> = dedupe_sorted(&cuts, eps)
        .into_iter()
        .filter(|&t| t > eps && t < 1.0 - eps)
        .collect();

    let sample_at = |t: f64| {
        let idx = (clamp01(t) * n as f64).round() as usize;
        vis[idx.min(n)]
    };
    let mut segment_visible = Vec::with_capacity(cuts.len() + 1);
    let mut prev = 0.0;
    for &c in &cuts {
        segment_visible.push(sample_at(0.5 * (prev + c)));
        prev = c;
    }
    segment_visible.push(sample_at(0.5 * (prev + 1.0)));

    VisibilityCuts {
        cuts,
        segment_visible,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::FnOracle;
    use linework_math::Point3;

    fn unit_line() -> CubicBezier3 {
        CubicBezier3::line(Point3::origin(), Point3::new(1.0, 0.0, 0.0))
    }

    #[test]
    fn test_majority_filter() {
        let v = [true, false, true, true, false, false, true];
        assert_eq!(
            majority_filter(&v),
            vec![true, true, true, true, false, false, true]
        );
        assert!(majority_filter(&[]).is_empty());
        assert_eq!(majority_filter(&[false, true]), vec![false, true]);
    }

    #[test]
    fn test_constant_visibility_has_no_cuts() {
        let oracle = FnOracle::new(|_: &Point3| false);
        let r = find_visibility_cuts(&unit_line(), &oracle, &VisibilityParams::default(), None);
        assert!(r.cuts.is_empty());
        assert_eq!(r.segment_visible, vec![false]);
    }

    #[test]
    fn test_single_transition_is_refined() {
        let oracle = FnOracle::new(|p: &Point3| p.x < 0.3);
        let r = find_visibility_cuts(&unit_line(), &oracle, &VisibilityParams::default(), None);
        assert_eq!(r.cuts.len(), 1);
        assert!((r.cuts[0] - 0.3).abs() < 1e-6);
        assert_eq!(r.segment_visible, vec![true, false]);
    }

    #[test]
    fn test_cuts_increasing_and_inside() {
        let oracle = FnOracle::new(|p: &Point3| ((p.x * 10.0).floor() as i64) % 2 == 0);
        let params = VisibilityParams::default();
        let r = find_visibility_cuts(&unit_line(), &oracle, &params, None);
        assert_eq!(r.cuts.len(), 9);
        assert_eq!(r.segment_visible.len(), 10);
        for w in r.cuts.windows(2) {
            assert!(w[0] < w[1]);
        }
        for &c in &r.cuts {
            assert!(c > params.cut_eps && c < 1.0 - params.cut_eps);
        }
        for (i, &v) in r.segment_visible.iter().enumerate() {
            assert_eq!(v, i % 2 == 0);
        }
    }

    #[test]
    fn test_single_sample_flip_is_smoothed() {
        // only the sample at t = 0.5 is hidden
        let oracle = FnOracle::new(|p: &Point3| (p.x - 0.5).abs() > 1e-3);
        let r = find_visibility_cuts(&unit_line(), &oracle, &VisibilityParams::default(), None);
        assert!(r.cuts.is_empty());
        assert_eq!(r.segment_visible, vec![true]);
    }

    #[test]
    fn test_coarse_pass_skips_full_sampling() {
        // a narrow hidden band between coarse samples goes unnoticed
        let oracle = FnOracle::new(|p: &Point3| !(0.52..0.55).contains(&p.x));
        let params = VisibilityParams::default().with_coarse_samples(8);
        let r = find_visibility_cuts(&unit_line(), &oracle, &params, None);
        assert!(r.cuts.is_empty());
        assert_eq!(r.segment_visible, vec![true]);
        assert_eq!(oracle.calls.get(), 10);

        // without it the band is found
        let r = find_visibility_cuts(&unit_line(), &oracle, &VisibilityParams::default(), None);
        assert_eq!(r.cuts.len(), 2);
        assert_eq!(r.segment_visible, vec![true, false, true]);
    }
}
