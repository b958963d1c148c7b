#![warn(missing_docs)]

//! Hidden-line drawings of analytic solids.
//!
//! This crate turns a [`Scene`](linework_raytrace::Scene) into line art,
//! including:
//!
//! - **Outline generation**: silhouettes, rims, rectangle borders and box edges
//! - **Intersection curves**: where solids meet, from `linework-intersect`
//! - **Hidden line removal**: every curve is cut at its visibility
//!   transitions and each piece labeled visible or hidden
//!
//! # Example
//!
//! ```
//! use linework_drafting::{render_drawing, DrawingOptions};
//! use linework_geom::{BoxAabb, Sphere};
//! use linework_math::Point3;
//! use linework_raytrace::{Camera, Scene};
//!
//! let camera = Camera::perspective(Point3::new(0.0, 0.0, 10.0), Point3::origin()).unwrap();
//! let mut scene = Scene::new(camera);
//! scene.add(Sphere::new(Point3::new(0.0, 0.0, 2.0), 1.0).unwrap());
//! scene.add(BoxAabb::new(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 0.0)).unwrap());
//!
//! let drawing = render_drawing(&scene, &DrawingOptions::default());
//!
//! // Solid lines
//! for piece in drawing.visible() {
//!     let _ = piece.curve;
//! }
//! // Dashed lines
//! assert!(drawing.num_hidden() > 0);
//! ```

pub mod cuts;
pub mod edges;
pub mod oracle;
pub mod pipeline;
pub mod split;
pub mod types;

pub use cuts::{find_visibility_cuts, VisibilityCuts};
pub use edges::{
    cone_silhouette, curves_from_primitives, cylinder_silhouette, rims, silhouette,
    sphere_silhouette,
};
pub use oracle::VisibilityOracle;
pub use pipeline::render_drawing;
pub use split::split_by_visibility;
pub use types::{CurveInclude, Drawing, DrawingOptions, StyledPiece, VisibilityParams};
