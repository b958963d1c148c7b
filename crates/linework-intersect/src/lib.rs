#![warn(missing_docs)]

//! Analytic intersection curves between solids for the linework renderer.
//!
//! Where two solids meet, the drawing needs a line. Pair solvers in
//! [`pairs`] compute those lines either in closed form (planes, spheres) or
//! by sampling one surface around its axis and solving the other's implicit
//! equation. Sampled points are sorted into two branches ([`branch`]), cut
//! into continuous runs ([`runs`]) and fitted with cubic Béziers ([`fit`]).
//!
//! [`intersection_curves`] runs every applicable pair in a scene and tags
//! each curve with the primitives it lies on, so the visibility oracle can
//! ignore exactly those surfaces when testing it.
//!
//! # Example
//!
//! ```
//! use linework_geom::Sphere;
//! use linework_intersect::{intersection_curves, IntersectionOptions};
//! use linework_math::Point3;
//! use linework_raytrace::{Primitive, PrimitiveId};
//!
//! let a = Sphere::new(Point3::origin(), 1.0).unwrap();
//! let b = Sphere::new(Point3::new(1.5, 0.0, 0.0), 1.0).unwrap();
//! let prims = [
//!     Primitive { id: PrimitiveId(0), shape: a.into() },
//!     Primitive { id: PrimitiveId(1), shape: b.into() },
//! ];
//! let curves = intersection_curves(&prims, &IntersectionOptions::default());
//! assert_eq!(curves.len(), 4);
//! assert_eq!(curves[0].owners, vec![PrimitiveId(0), PrimitiveId(1)]);
//! ```

mod assemble;
pub mod branch;
pub mod caps;
pub mod fit;
pub mod pairs;
pub mod runs;

pub use assemble::FitStrategy;
pub use caps::{derive_cap_disks, CapDisk, CapEnd};
pub use fit::{fit_polyline, fit_polyline_report, BezierFitParams, FitReport};
pub use pairs::PlaneSurface;

use linework_geom::{BoxAabb, CubicBezier3, Disk, PlaneRect};
use linework_raytrace::{Primitive, PrimitiveId, Shape};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Curves whose control points all lie within this distance (squared) are dropped.
const DEGENERATE_EPS_SQ: f64 = 1e-18;

/// An intersection curve together with the primitives it lies on.
#[derive(Debug, Clone, PartialEq)]
pub struct OwnedCubic3 {
    /// The curve.
    pub curve: CubicBezier3,
    /// Primitives whose surfaces carry the curve, without duplicates.
    pub owners: Vec<PrimitiveId>,
}

/// Options for [`intersection_curves`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntersectionOptions {
    /// Samples around the axis for sampled curved pairs.
    ///
    /// Each solver raises this to its own floor (32 for sphere pairs, 48 for
    /// cylinder pairs, 64 for cone-cone).
    pub angular_samples: usize,
    /// How sampled runs become cubics.
    pub fit: FitStrategy,
}

impl Default for IntersectionOptions {
    fn default() -> Self {
        Self {
            angular_samples: 160,
            fit: FitStrategy::StitchThenFit,
        }
    }
}

impl IntersectionOptions {
    /// Set the angular sample count.
    pub fn with_angular_samples(mut self, n: usize) -> Self {
        self.angular_samples = n;
        self
    }

    /// Set the fit strategy.
    pub fn with_fit(mut self, fit: FitStrategy) -> Self {
        self.fit = fit;
        self
    }

    /// Clamp the sample count to at least 2.
    pub fn sanitized(self) -> Self {
        Self {
            angular_samples: self.angular_samples.max(2),
            ..self
        }
    }
}

// =============================================================================
// Pair jobs
// =============================================================================

/// A flat disk taking part in flat pairs: a cap or an explicit disk.
#[derive(Debug, Clone, Copy)]
struct FlatDisk {
    disk: Disk,
    owner: PrimitiveId,
}

#[derive(Debug, Clone, Copy)]
enum PairJob {
    DiskDisk(Disk, Disk),
    PlaneCurved(PlaneSurface, Shape),
    DiskRect(Disk, PlaneRect),
    RectBox(PlaneRect, BoxAabb),
    BoxBox(BoxAabb, BoxAabb),
    BoxCurved(BoxAabb, Shape),
    DiskBox(Disk, BoxAabb),
    Curved(Shape, Shape),
    RectRect(PlaneRect, PlaneRect),
}

#[derive(Debug, Clone, Copy)]
struct Job {
    pair: PairJob,
    owners: [PrimitiveId; 2],
}

/// Argument order for curved pairs: sphere, then cylinder, then cone.
fn curved_rank(shape: &Shape) -> u8 {
    match shape {
        Shape::Sphere(_) => 0,
        Shape::Cylinder(_) => 1,
        _ => 2,
    }
}

/// Enumerate every pair to solve, in output order.
fn collect_jobs(primitives: &[Primitive]) -> Vec<Job> {
    let caps = derive_cap_disks(primitives);
    let mut disks: Vec<FlatDisk> = caps
        .iter()
        .map(|c| FlatDisk {
            disk: c.disk,
            owner: c.parent,
        })
        .collect();
    let mut rects: Vec<(PlaneRect, PrimitiveId)> = Vec::new();
    let mut boxes: Vec<(BoxAabb, PrimitiveId)> = Vec::new();
    let mut curved: Vec<&Primitive> = Vec::new();
    for prim in primitives {
        match prim.shape {
            Shape::Disk(d) => disks.push(FlatDisk {
                disk: d,
                owner: prim.id,
            }),
            Shape::PlaneRect(r) => rects.push((r, prim.id)),
            Shape::Box(b) => boxes.push((b, prim.id)),
            _ => curved.push(prim),
        }
    }

    let mut jobs = Vec::new();
    let mut push = |pair: PairJob, a: PrimitiveId, b: PrimitiveId| {
        jobs.push(Job {
            pair,
            owners: [a, b],
        })
    };

    for (i, d0) in disks.iter().enumerate() {
        for d1 in &disks[i + 1..] {
            push(PairJob::DiskDisk(d0.disk, d1.disk), d0.owner, d1.owner);
        }
    }

    let surfaces = disks
        .iter()
        .map(|d| (PlaneSurface::Disk(d.disk), d.owner))
        .chain(rects.iter().map(|(r, id)| (PlaneSurface::Rect(*r), *id)));
    for (surface, owner) in surfaces {
        for prim in &curved {
            // a cap never cuts its own solid
            if owner != prim.id {
                push(PairJob::PlaneCurved(surface, prim.shape), owner, prim.id);
            }
        }
    }

    for d in &disks {
        for (r, id) in &rects {
            push(PairJob::DiskRect(d.disk, *r), d.owner, *id);
        }
    }

    for (r, rid) in &rects {
        for (b, bid) in &boxes {
            push(PairJob::RectBox(*r, *b), *rid, *bid);
        }
    }
    for (i, (b0, id0)) in boxes.iter().enumerate() {
        for (b1, id1) in &boxes[i + 1..] {
            push(PairJob::BoxBox(*b0, *b1), *id0, *id1);
        }
    }
    for (b, bid) in &boxes {
        for prim in &curved {
            push(PairJob::BoxCurved(*b, prim.shape), *bid, prim.id);
        }
    }
    for d in &disks {
        for (b, bid) in &boxes {
            push(PairJob::DiskBox(d.disk, *b), d.owner, *bid);
        }
    }

    for (i, a) in curved.iter().enumerate() {
        for b in &curved[i + 1..] {
            let pair = if curved_rank(&b.shape) < curved_rank(&a.shape) {
                PairJob::Curved(b.shape, a.shape)
            } else {
                PairJob::Curved(a.shape, b.shape)
            };
            push(pair, a.id, b.id);
        }
    }

    for (i, (r0, id0)) in rects.iter().enumerate() {
        for (r1, id1) in &rects[i + 1..] {
            push(PairJob::RectRect(*r0, *r1), *id0, *id1);
        }
    }

    jobs
}

fn solve_curved(a: &Shape, b: &Shape, opts: &IntersectionOptions) -> Vec<CubicBezier3> {
    let (n, fit) = (opts.angular_samples, opts.fit);
    match (a, b) {
        (Shape::Sphere(s0), Shape::Sphere(s1)) => pairs::intersect_sphere_sphere(s0, s1),
        (Shape::Sphere(s), Shape::Cylinder(c)) => pairs::intersect_sphere_cylinder(s, c, n, fit),
        (Shape::Sphere(s), Shape::Cone(c)) => pairs::intersect_sphere_cone(s, c, n, fit),
        (Shape::Cylinder(c0), Shape::Cylinder(c1)) => {
            pairs::intersect_cylinder_cylinder(c0, c1, n, fit)
        }
        (Shape::Cylinder(c), Shape::Cone(k)) => pairs::intersect_cylinder_cone(c, k, n, fit),
        (Shape::Cone(k0), Shape::Cone(k1)) => pairs::intersect_cone_cone(k0, k1, n, fit),
        _ => Vec::new(),
    }
}

impl Job {
    fn solve(&self, opts: &IntersectionOptions) -> Vec<CubicBezier3> {
        let fit = opts.fit;
        match &self.pair {
            PairJob::DiskDisk(d0, d1) => pairs::intersect_disk_disk(d0, d1),
            PairJob::PlaneCurved(surface, shape) => match shape {
                Shape::Sphere(s) => pairs::intersect_plane_sphere(surface, s, fit),
                Shape::Cylinder(c) => pairs::intersect_plane_cylinder(surface, c, fit),
                Shape::Cone(c) => pairs::intersect_plane_cone(surface, c, fit),
                _ => Vec::new(),
            },
            PairJob::DiskRect(d, r) => pairs::intersect_disk_plane_rect(d, r, fit),
            PairJob::RectBox(r, b) => pairs::intersect_plane_rect_box(r, b),
            PairJob::BoxBox(b0, b1) => pairs::intersect_box_box(b0, b1),
            PairJob::BoxCurved(b, shape) => pairs::intersect_box_curved(b, shape, fit),
            PairJob::DiskBox(d, b) => pairs::intersect_disk_box(d, b, fit),
            PairJob::Curved(a, b) => solve_curved(a, b, opts),
            PairJob::RectRect(r0, r1) => pairs::intersect_plane_rect_plane_rect(r0, r1),
        }
    }

    fn owners(&self) -> Vec<PrimitiveId> {
        let [a, b] = self.owners;
        if a == b {
            vec![a]
        } else {
            vec![a, b]
        }
    }
}

// =============================================================================
// Orchestrator
// =============================================================================

/// All intersection curves between the given primitives.
///
/// Pairs are solved in parallel; the output order is fixed: disk pairs,
/// plane surfaces against curved solids, disks against rectangles,
/// rectangles against boxes, box pairs, boxes against curved solids, disks
/// against boxes, curved pairs, then rectangle pairs. Within a pair, curves keep the
/// solver's order. Non-finite and degenerate curves are dropped.
#[instrument(skip_all, fields(primitives = primitives.len()))]
pub fn intersection_curves(
    primitives: &[Primitive],
    opts: &IntersectionOptions,
) -> Vec<OwnedCubic3> {
    let opts = opts.sanitized();
    let jobs = collect_jobs(primitives);
    debug!(jobs = jobs.len(), "solving intersection pairs");

    let per_job: Vec<Vec<OwnedCubic3>> = jobs
        .par_iter()
        .map(|job| {
            let owners = job.owners();
            job.solve(&opts)
                .into_iter()
                .filter(|c| c.is_finite() && !c.is_degenerate(DEGENERATE_EPS_SQ))
                .map(|curve| OwnedCubic3 {
                    curve,
                    owners: owners.clone(),
                })
                .collect()
        })
        .collect();

    let out: Vec<OwnedCubic3> = per_job.into_iter().flatten().collect();
    debug!(curves = out.len(), "intersection curves done");
    out
}
