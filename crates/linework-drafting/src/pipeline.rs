//! The full drawing pass over a scene.

use linework_geom::CubicBezier3;
use linework_intersect::{intersection_curves, OwnedCubic3};
use linework_raytrace::Scene;
use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::edges::curves_from_primitives;
use crate::split::split_by_visibility;
use crate::types::{Drawing, DrawingOptions, StyledPiece};

/// Render `scene` into a hidden-line drawing.
///
/// Generated outlines are split with no owners, so any hit close to the
/// sampled point counts as its own surface. Intersection curves are split
/// with their owning primitives as the forgiven set. Curves are processed in
/// parallel; piece order is deterministic.
#[instrument(skip_all, fields(primitives = scene.len()))]
pub fn render_drawing(scene: &Scene, opts: &DrawingOptions) -> Drawing {
    let params = opts.visibility.sanitized();

    let outlines: Vec<CubicBezier3> =
        curves_from_primitives(scene.primitives(), scene.camera(), &opts.include);
    let owned: Vec<OwnedCubic3> = match &opts.intersections {
        Some(iopts) => intersection_curves(scene.primitives(), iopts),
        None => Vec::new(),
    };
    debug!(
        outlines = outlines.len(),
        intersections = owned.len(),
        "curves collected"
    );

    let outline_pieces: Vec<Vec<StyledPiece>> = outlines
        .par_iter()
        .map(|c| split_by_visibility(c, scene, &params, None))
        .collect();
    let owned_pieces: Vec<Vec<StyledPiece>> = owned
        .par_iter()
        .map(|c| split_by_visibility(&c.curve, scene, &params, Some(c.owners.as_slice())))
        .collect();

    let pieces: Vec<StyledPiece> = outline_pieces
        .into_iter()
        .chain(owned_pieces)
        .flatten()
        .collect();
    let drawing = Drawing::from_pieces(pieces);
    debug!(
        visible = drawing.num_visible(),
        hidden = drawing.num_hidden(),
        "drawing done"
    );
    drawing
}
