//! From samples to curves: run assembly followed by the chosen fit strategy.

use linework_geom::CubicBezier3;
use linework_math::Point3;
use serde::{Deserialize, Serialize};

use crate::branch::BranchState;
use crate::fit::{fit_polyline, BezierFitParams};
use crate::runs::{
    median_abs_delta, median_consecutive_step, merge_cyclic_runs, runs_to_line_cubics,
    split_branch, stitch_runs, try_merge_to_single_polyline, Polyline,
};

/// How assembled runs are turned into cubics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitStrategy {
    /// One straight cubic per sample segment.
    Lines,
    /// Fit every run on its own.
    PerRun,
    /// Chain all runs of a branch into one polyline when they connect, then fit.
    #[default]
    StitchThenFit,
}

/// Minimum cosine between directions across a stitched joint.
const STITCH_MIN_COS: f64 = 0.25;

/// Spatial split threshold for a branch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum JumpRule {
    /// A fixed multiple of the angular step.
    Steps(f64),
    /// `max(6·step, 4·median spacing)`, for branches that are born and die abruptly.
    Adaptive,
}

/// Per-solver constants for [`assemble_branches`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct BranchTuning {
    pub jump: JumpRule,
    /// Fit tolerance as a multiple of the angular step.
    pub error_steps: f64,
    pub max_alpha_factor: Option<f64>,
}

/// Split, merge, stitch and fit both branches of a sampled intersection.
///
/// `step` is the angular sample spacing measured on the largest radius involved.
pub(crate) fn assemble_branches(
    state: &BranchState,
    step: f64,
    tuning: &BranchTuning,
    strategy: FitStrategy,
) -> Vec<CubicBezier3> {
    let close = 3.0 * step;
    let max_jump = match tuning.jump {
        JumpRule::Steps(k) => k * step,
        JumpRule::Adaptive => {
            let spacing = median_consecutive_step(&state.points0, step)
                .max(median_consecutive_step(&state.points1, step));
            (6.0 * step).max(4.0 * spacing)
        }
    };
    let mut params = BezierFitParams::default()
        .with_max_error(tuning.error_steps * step)
        .with_close_eps(close);
    if let Some(factor) = tuning.max_alpha_factor {
        params = params.with_max_alpha_factor(factor);
    }

    let mut runs = Vec::new();
    for (points, keys) in [
        (&state.points0, &state.keys0),
        (&state.points1, &state.keys1),
    ] {
        let key_jump = (8.0 * median_abs_delta(keys, step)).max(1e-6);
        let branch_runs = split_branch(points, keys, max_jump * max_jump, key_jump);
        runs.extend(merge_cyclic_runs(branch_runs, close * close));
    }
    // a loop's two branches meet at its turning points
    let runs = stitch_runs(runs, close * close, Some(STITCH_MIN_COS));
    finish_runs(&runs, &params, strategy)
}

/// Runs of consecutive present samples around a closed angular sweep.
///
/// Runs that straddle the end of the sweep are joined through the seam. When
/// every sample is present the result is one closed polyline whose last point
/// repeats the first.
pub(crate) fn cyclic_runs(samples: &[Option<Point3>]) -> Vec<Polyline> {
    let n = samples.len();
    let Some(gap) = samples.iter().position(Option::is_none) else {
        let mut ring: Polyline = samples.iter().flatten().copied().collect();
        if let Some(&first) = ring.first() {
            ring.push(first);
        }
        return if ring.len() >= 3 { vec![ring] } else { Vec::new() };
    };

    let mut runs = Vec::new();
    let mut cur: Polyline = Vec::new();
    for i in 1..=n {
        match samples[(gap + i) % n] {
            Some(p) => cur.push(p),
            None => {
                if cur.len() >= 2 {
                    runs.push(std::mem::take(&mut cur));
                } else {
                    cur.clear();
                }
            }
        }
    }
    if cur.len() >= 2 {
        runs.push(cur);
    }
    runs
}

/// Turn finished runs into cubics according to `strategy`.
pub(crate) fn finish_runs(
    runs: &[Polyline],
    params: &BezierFitParams,
    strategy: FitStrategy,
) -> Vec<CubicBezier3> {
    let close_sq = params.close_eps * params.close_eps;
    match strategy {
        FitStrategy::Lines => runs_to_line_cubics(runs, close_sq),
        FitStrategy::PerRun => runs.iter().flat_map(|r| fit_polyline(r, params)).collect(),
        FitStrategy::StitchThenFit => match try_merge_to_single_polyline(runs, close_sq) {
            Some(merged) => fit_polyline(&merged, params),
            None => runs.iter().flat_map(|r| fit_polyline(r, params)).collect(),
        },
    }
}
