//! Turning branch samples into continuous polyline runs.
//!
//! A run is a maximal stretch of consecutive samples with no abnormal jump,
//! either in space or in the algebraic key. Runs are then merged across the
//! angular seam and greedily re-stitched where their endpoints meet.

use linework_geom::CubicBezier3;
use linework_math::{Point3, Vec3};

/// An ordered list of points.
pub type Polyline = Vec<Point3>;

/// Split `points` wherever consecutive points are farther apart than `sqrt(max_jump_sq)`.
///
/// Pieces with fewer than two points are dropped.
pub fn split_runs_by_jump(points: &[Point3], max_jump_sq: f64) -> Vec<Polyline> {
    split_where(points, |i| (points[i] - points[i - 1]).norm_squared() > max_jump_sq)
}

/// Split a keyed branch on spatial jumps and on key jumps larger than `max_key_jump`.
///
/// Equivalent to splitting by distance first and then splitting each piece
/// by key. `keys` must be parallel to `points`; if it is not, only the
/// spatial rule applies.
pub fn split_branch(
    points: &[Point3],
    keys: &[f64],
    max_jump_sq: f64,
    max_key_jump: f64,
) -> Vec<Polyline> {
    if keys.len() != points.len() {
        return split_runs_by_jump(points, max_jump_sq);
    }
    split_where(points, |i| {
        (points[i] - points[i - 1]).norm_squared() > max_jump_sq
            || (keys[i] - keys[i - 1]).abs() > max_key_jump
    })
}

fn split_where(points: &[Point3], breaks_before: impl Fn(usize) -> bool) -> Vec<Polyline> {
    let mut runs = Vec::new();
    let Some(first) = points.first() else {
        return runs;
    };
    let mut cur = vec![*first];
    for i in 1..points.len() {
        if breaks_before(i) {
            if cur.len() >= 2 {
                runs.push(std::mem::take(&mut cur));
            } else {
                cur.clear();
            }
        }
        cur.push(points[i]);
    }
    if cur.len() >= 2 {
        runs.push(cur);
    }
    runs
}

/// Join the last run onto the first when it ends where the first begins.
///
/// Sampling starts at angle zero, so a closed branch that was cut at the seam
/// comes back as a tail run followed by a head run.
pub fn merge_cyclic_runs(mut runs: Vec<Polyline>, close_eps_sq: f64) -> Vec<Polyline> {
    if runs.len() < 2 {
        return runs;
    }
    let (Some(tail_end), Some(head_start)) = (
        runs.last().and_then(|r| r.last()).copied(),
        runs.first().and_then(|r| r.first()).copied(),
    ) else {
        return runs;
    };
    if (tail_end - head_start).norm_squared() > close_eps_sq {
        return runs;
    }
    let Some(mut tail) = runs.pop() else {
        return runs;
    };
    let head = std::mem::take(&mut runs[0]);
    let skip = usize::from((tail_end - head_start).norm_squared() <= 1e-16);
    tail.extend(head.into_iter().skip(skip));
    runs[0] = tail;
    runs
}

/// Greedily chain runs whose endpoints lie within `sqrt(close_eps_sq)`.
///
/// Starting from the first unused run, the nearest compatible endpoint of any
/// other run is attached at the tail (then at the head) until nothing fits.
/// Runs may be reversed to connect. With `min_tangent_cos`, a join is only
/// made when the directions across it agree to at least that cosine.
pub fn stitch_runs(
    runs: Vec<Polyline>,
    close_eps_sq: f64,
    min_tangent_cos: Option<f64>,
) -> Vec<Polyline> {
    let mut pool: Vec<Option<Polyline>> = runs.into_iter().map(Some).collect();
    let mut out = Vec::new();

    for start in 0..pool.len() {
        let Some(mut chain) = pool[start].take() else {
            continue;
        };
        while let Some((idx, reverse)) = best_join(&chain, &pool, close_eps_sq, min_tangent_cos) {
            let Some(mut next) = pool[idx].take() else {
                break;
            };
            if reverse {
                next.reverse();
            }
            append_run(&mut chain, next);
        }
        chain.reverse();
        while let Some((idx, reverse)) = best_join(&chain, &pool, close_eps_sq, min_tangent_cos) {
            let Some(mut next) = pool[idx].take() else {
                break;
            };
            if reverse {
                next.reverse();
            }
            append_run(&mut chain, next);
        }
        chain.reverse();
        out.push(chain);
    }
    out
}

/// Extend `chain` with `next`, dropping `next`'s first point when it repeats the joint.
fn append_run(chain: &mut Polyline, next: Polyline) {
    let skip = match (chain.last(), next.first()) {
        (Some(a), Some(b)) => usize::from((b - a).norm_squared() <= 1e-16),
        _ => 0,
    };
    chain.extend(next.into_iter().skip(skip));
}

/// Best run to append after `chain`'s last point: `(index, needs_reverse)`.
fn best_join(
    chain: &[Point3],
    pool: &[Option<Polyline>],
    close_eps_sq: f64,
    min_tangent_cos: Option<f64>,
) -> Option<(usize, bool)> {
    let end = *chain.last()?;
    let out_dir = end_direction(chain);
    let mut best: Option<(usize, bool, f64)> = None;

    for (i, run) in pool.iter().enumerate() {
        let Some(run) = run else { continue };
        let (Some(&first), Some(&last)) = (run.first(), run.last()) else {
            continue;
        };
        for (reverse, attach) in [(false, first), (true, last)] {
            let d = (attach - end).norm_squared();
            if d > close_eps_sq || best.is_some_and(|(_, _, bd)| bd <= d) {
                continue;
            }
            if let Some(min_cos) = min_tangent_cos {
                let in_dir = if reverse {
                    start_direction_reversed(run)
                } else {
                    start_direction(run)
                };
                if out_dir.dot(&in_dir) < min_cos && out_dir != Vec3::zeros() && in_dir != Vec3::zeros() {
                    continue;
                }
            }
            best = Some((i, reverse, d));
        }
    }
    best.map(|(i, r, _)| (i, r))
}

fn end_direction(run: &[Point3]) -> Vec3 {
    match run {
        [.., a, b] => linework_math::normalize_or_zero(&(b - a)),
        _ => Vec3::zeros(),
    }
}

fn start_direction(run: &[Point3]) -> Vec3 {
    match run {
        [a, b, ..] => linework_math::normalize_or_zero(&(b - a)),
        _ => Vec3::zeros(),
    }
}

fn start_direction_reversed(run: &[Point3]) -> Vec3 {
    match run {
        [.., a, b] => linework_math::normalize_or_zero(&(a - b)),
        _ => Vec3::zeros(),
    }
}

/// Concatenate runs into one polyline if each starts where the previous ended.
///
/// A run may be reversed to connect. Returns `None` for an empty list or a
/// gap wider than `sqrt(close_eps_sq)`.
pub fn try_merge_to_single_polyline(runs: &[Polyline], close_eps_sq: f64) -> Option<Polyline> {
    let (first, rest) = runs.split_first()?;
    let mut merged = first.clone();
    for run in rest {
        let end = *merged.last()?;
        let (&a, &b) = (run.first()?, run.last()?);
        if (a - end).norm_squared() <= close_eps_sq {
            merged.extend(run.iter().copied());
        } else if (b - end).norm_squared() <= close_eps_sq {
            merged.extend(run.iter().rev().copied());
        } else {
            return None;
        }
    }
    Some(merged)
}

/// Median distance between consecutive points, ignoring coincident ones.
pub fn median_consecutive_step(points: &[Point3], fallback: f64) -> f64 {
    let steps: Vec<f64> = points.windows(2).map(|w| (w[1] - w[0]).norm()).collect();
    median_positive(steps, fallback)
}

/// Median absolute difference between consecutive keys, ignoring repeats.
pub fn median_abs_delta(keys: &[f64], fallback: f64) -> f64 {
    let deltas: Vec<f64> = keys.windows(2).map(|w| (w[1] - w[0]).abs()).collect();
    median_positive(deltas, fallback)
}

fn median_positive(mut values: Vec<f64>, fallback: f64) -> f64 {
    values.retain(|d| d.is_finite() && *d > 1e-12);
    if values.is_empty() {
        return fallback;
    }
    values.sort_by(f64::total_cmp);
    values[values.len() / 2]
}

/// Emit every run as straight segments, closing runs whose ends meet.
pub fn runs_to_line_cubics(runs: &[Polyline], close_eps_sq: f64) -> Vec<CubicBezier3> {
    let mut out = Vec::new();
    for run in runs {
        out.extend(run.windows(2).map(|w| CubicBezier3::line(w[0], w[1])));
        if let (Some(&a), Some(&b)) = (run.first(), run.last()) {
            let gap = (a - b).norm_squared();
            if run.len() > 2 && gap > 1e-16 && gap <= close_eps_sq {
                out.push(CubicBezier3::line(b, a));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(xs: &[f64]) -> Vec<Point3> {
        xs.iter().map(|&x| Point3::new(x, 0.0, 0.0)).collect()
    }

    #[test]
    fn test_split_by_jump_drops_singletons() {
        let runs = split_runs_by_jump(&pts(&[0.0, 0.1, 0.2, 5.0, 9.0, 9.1]), 1.0);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].len(), 3);
        assert_eq!(runs[1].len(), 2);
        assert!(split_runs_by_jump(&[], 1.0).is_empty());
    }

    #[test]
    fn test_split_by_key_jump() {
        // spatially smooth but the key leaps between the 2nd and 3rd samples
        let p = pts(&[0.0, 0.1, 0.2, 0.3]);
        let runs = split_branch(&p, &[0.0, 0.1, 3.0, 3.1], 1.0, 0.5);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0], pts(&[0.0, 0.1]));
        assert_eq!(runs[1], pts(&[0.2, 0.3]));
    }

    #[test]
    fn test_merge_cyclic() {
        let runs = vec![pts(&[0.0, 0.1, 0.2]), pts(&[5.0, 5.1]), pts(&[-0.2, -0.1])];
        let merged = merge_cyclic_runs(runs, 0.15 * 0.15);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0], pts(&[-0.2, -0.1, 0.0, 0.1, 0.2]));
    }

    #[test]
    fn test_stitch_reverses_runs() {
        let runs = vec![pts(&[0.0, 1.0]), pts(&[3.0, 1.05]), pts(&[10.0, 11.0])];
        let out = stitch_runs(runs, 0.1 * 0.1, Some(0.25));
        assert_eq!(out.len(), 2);
        assert_eq!(out[0], pts(&[0.0, 1.0, 1.05, 3.0]));
    }

    #[test]
    fn test_stitch_shared_joint_kept_once() {
        // two halves of a loop that share both end points
        let lower = vec![
            Point3::new(-1.0, 0.0, 0.0),
            Point3::new(0.0, -1.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
        ];
        let upper = vec![
            Point3::new(-1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
        ];
        let out = stitch_runs(vec![lower, upper], 0.1 * 0.1, None);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].len(), 5);
        assert_eq!(out[0].first(), out[0].last());
    }

    #[test]
    fn test_stitch_direction_gate() {
        // the second run touches the first's end but doubles back
        let a = vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)];
        let b = vec![Point3::new(1.01, 0.0, 0.0), Point3::new(0.0, 0.01, 0.0)];
        let gated = stitch_runs(vec![a.clone(), b.clone()], 0.05 * 0.05, Some(0.25));
        assert_eq!(gated.len(), 2);
        let free = stitch_runs(vec![a, b], 0.05 * 0.05, None);
        assert_eq!(free.len(), 1);
    }

    #[test]
    fn test_try_merge() {
        let runs = vec![pts(&[0.0, 1.0]), pts(&[2.0, 1.0])];
        assert_eq!(try_merge_to_single_polyline(&runs, 1e-6), Some(pts(&[0.0, 1.0, 1.0, 2.0])));
        let gap = vec![pts(&[0.0, 1.0]), pts(&[2.0, 3.0])];
        assert!(try_merge_to_single_polyline(&gap, 1e-6).is_none());
        assert!(try_merge_to_single_polyline(&[], 1e-6).is_none());
    }

    #[test]
    fn test_medians() {
        assert!((median_consecutive_step(&pts(&[0.0, 1.0, 1.0, 3.0, 4.0]), 9.0) - 1.0).abs() < 1e-12);
        assert_eq!(median_consecutive_step(&pts(&[2.0]), 9.0), 9.0);
        assert!((median_abs_delta(&[0.0, 0.5, 0.5, 1.5], 9.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_line_cubics_close_loop() {
        let square = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.05, 0.0),
        ];
        let cubics = runs_to_line_cubics(&[square], 0.1 * 0.1);
        assert_eq!(cubics.len(), 5);
        assert_eq!(cubics[4].p3, Point3::origin());
    }
}
