//! Core types for hidden-line drawings: labeled pieces, tuning knobs and the
//! finished drawing.

use linework_geom::CubicBezier3;
use linework_intersect::IntersectionOptions;
use serde::{Deserialize, Serialize};

/// A contiguous sub-arc of a source curve with its visibility.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyledPiece {
    /// The sub-curve.
    pub curve: CubicBezier3,
    /// True when unoccluded from the camera.
    pub visible: bool,
}

impl StyledPiece {
    /// Create a new piece.
    pub fn new(curve: CubicBezier3, visible: bool) -> Self {
        Self { curve, visible }
    }
}

// ============================================================================
// Visibility parameters
// ============================================================================

/// Accuracy and speed knobs for cutting curves by visibility.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisibilityParams {
    /// Samples along each curve in the full pass.
    pub samples: usize,
    /// Sample count of the optional coarse pre-pass.
    ///
    /// When the coarse pass sees no transition the curve is taken to have
    /// constant visibility and the full pass is skipped. Transitions narrower
    /// than the coarse step are missed.
    pub coarse_samples: Option<usize>,
    /// Bisection halvings per cut.
    pub refine_iters: u32,
    /// Absolute tolerance passed to the visibility oracle.
    pub eps_visible: f64,
    /// Cuts closer than this are merged; cuts this close to an end are dropped.
    pub cut_eps: f64,
    /// Pieces with a smaller squared chord are discarded.
    pub min_seg_len_sq: f64,
}

impl Default for VisibilityParams {
    fn default() -> Self {
        Self {
            samples: 192,
            coarse_samples: None,
            refine_iters: 22,
            eps_visible: 2e-4,
            cut_eps: 1e-6,
            min_seg_len_sq: 1e-6,
        }
    }
}

impl VisibilityParams {
    /// Set the full-pass sample count.
    pub fn with_samples(mut self, samples: usize) -> Self {
        self.samples = samples;
        self
    }

    /// Enable the coarse pre-pass.
    pub fn with_coarse_samples(mut self, coarse: usize) -> Self {
        self.coarse_samples = Some(coarse);
        self
    }

    /// Set the bisection iteration count.
    pub fn with_refine_iters(mut self, iters: u32) -> Self {
        self.refine_iters = iters;
        self
    }

    /// Set the oracle tolerance.
    pub fn with_eps_visible(mut self, eps: f64) -> Self {
        self.eps_visible = eps;
        self
    }

    /// Set the cut merge distance.
    pub fn with_cut_eps(mut self, eps: f64) -> Self {
        self.cut_eps = eps;
        self
    }

    /// Set the minimum kept squared chord length.
    pub fn with_min_seg_len_sq(mut self, len_sq: f64) -> Self {
        self.min_seg_len_sq = len_sq;
        self
    }

    /// Clamp misuse to safe values.
    ///
    /// At least 2 samples; a coarse pass below 2 samples is disabled and one
    /// above `samples` is capped; epsilons are non-negative (NaN becomes 0).
    pub fn sanitized(self) -> Self {
        let samples = self.samples.max(2);
        Self {
            samples,
            coarse_samples: self
                .coarse_samples
                .filter(|&n| n >= 2)
                .map(|n| n.min(samples)),
            refine_iters: self.refine_iters,
            eps_visible: self.eps_visible.max(0.0),
            cut_eps: self.cut_eps.max(0.0),
            min_seg_len_sq: self.min_seg_len_sq.max(0.0),
        }
    }
}

// ============================================================================
// Drawing options
// ============================================================================

/// Which generated outline curves to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveInclude {
    /// Silhouettes of spheres, cylinders and cones.
    pub silhouettes: bool,
    /// End circles of cylinders and cones, and disk outlines.
    pub rims: bool,
    /// Plane rectangle borders.
    pub borders: bool,
    /// The twelve edges of every box.
    pub box_edges: bool,
}

impl Default for CurveInclude {
    fn default() -> Self {
        Self {
            silhouettes: true,
            rims: true,
            borders: true,
            box_edges: true,
        }
    }
}

impl CurveInclude {
    /// Nothing enabled.
    pub const NONE: Self = Self {
        silhouettes: false,
        rims: false,
        borders: false,
        box_edges: false,
    };
}

/// Options for [`render_drawing`](crate::render_drawing).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawingOptions {
    /// Generated outline curves.
    pub include: CurveInclude,
    /// Intersection curves between solids; `None` skips them.
    pub intersections: Option<IntersectionOptions>,
    /// Visibility splitting knobs.
    pub visibility: VisibilityParams,
}

impl Default for DrawingOptions {
    fn default() -> Self {
        Self {
            include: CurveInclude::default(),
            intersections: Some(IntersectionOptions::default()),
            visibility: VisibilityParams::default(),
        }
    }
}

impl DrawingOptions {
    /// Set the outline selection.
    pub fn with_include(mut self, include: CurveInclude) -> Self {
        self.include = include;
        self
    }

    /// Set or disable intersection curves.
    pub fn with_intersections(mut self, intersections: Option<IntersectionOptions>) -> Self {
        self.intersections = intersections;
        self
    }

    /// Set the visibility knobs.
    pub fn with_visibility(mut self, visibility: VisibilityParams) -> Self {
        self.visibility = visibility;
        self
    }
}

// ============================================================================
// Drawing
// ============================================================================

/// A finished hidden-line drawing.
///
/// Hidden pieces come first, then visible ones, so drawing them in order
/// puts solid lines over dashed ones. Within each class pieces keep their
/// source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Drawing {
    /// All pieces, hidden first.
    pub pieces: Vec<StyledPiece>,
}

impl Drawing {
    /// Build a drawing, ordering hidden pieces before visible ones.
    pub fn from_pieces(mut pieces: Vec<StyledPiece>) -> Self {
        // stable: keeps source order within each class
        pieces.sort_by_key(|p| p.visible);
        Self { pieces }
    }

    /// Visible pieces.
    pub fn visible(&self) -> impl Iterator<Item = &StyledPiece> {
        self.pieces.iter().filter(|p| p.visible)
    }

    /// Hidden pieces.
    pub fn hidden(&self) -> impl Iterator<Item = &StyledPiece> {
        self.pieces.iter().filter(|p| !p.visible)
    }

    /// Number of visible pieces.
    pub fn num_visible(&self) -> usize {
        self.visible().count()
    }

    /// Number of hidden pieces.
    pub fn num_hidden(&self) -> usize {
        self.hidden().count()
    }

    /// Total number of pieces.
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    /// True when nothing was drawn.
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }
}
