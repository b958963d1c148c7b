//! Cutting a curve into visible and hidden pieces.

use linework_geom::CubicBezier3;
use linework_raytrace::PrimitiveId;

use crate::cuts::find_visibility_cuts;
use crate::oracle::VisibilityOracle;
use crate::types::{StyledPiece, VisibilityParams};

/// Split `curve` at its visibility transitions.
///
/// Pieces come out in curve order. Each cut's global parameter is mapped
/// into the remaining sub-curve before splitting. Pieces whose squared chord
/// is below `min_seg_len_sq` are dropped.
pub fn split_by_visibility<O: VisibilityOracle + ?Sized>(
    curve: &CubicBezier3,
    oracle: &O,
    params: &VisibilityParams,
    owners: Option<&[PrimitiveId]>,
) -> Vec<StyledPiece> {
    let cuts = find_visibility_cuts(curve, oracle, params, owners);
    let min_len_sq = params.min_seg_len_sq.max(0.0);
    let mut out = Vec::with_capacity(cuts.segment_visible.len());
    let mut push = |c: CubicBezier3, visible: bool| {
        if c.chord_len_sq() >= min_len_sq {
            out.push(StyledPiece::new(c, visible));
        }
    };

    let mut current = *curve;
    let mut prev = 0.0;
    for (&cut, &visible) in cuts.cuts.iter().zip(&cuts.segment_visible) {
        let local = (cut - prev) / (1.0 - prev);
        let (left, right) = current.split(local);
        push(left, visible);
        current = right;
        prev = cut;
    }
    let last = cuts.segment_visible.last().copied().unwrap_or(true);
    push(current, last);
    out
}
