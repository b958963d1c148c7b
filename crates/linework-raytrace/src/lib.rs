#![warn(missing_docs)]

//! Analytic ray casting for the linework hidden-line renderer.
//!
//! Every solid answers one question: where does a ray first touch it? On
//! top of that, [`Scene`] provides closest-hit casting over all primitives
//! and the point visibility oracle the curve splitter is built on.
//!
//! # Architecture
//!
//! - [`Ray`] / [`RayHit`] - ray representation and tagged hit records
//! - [`intersect`] - per-solid closed-form intersectors
//! - [`Shape`] / [`Primitive`] - closed tagged union over the solid kinds
//! - [`Camera`] - eye position and view direction
//! - [`Scene`] - raycasting and [`Scene::is_visible`]
//!
//! # Example
//!
//! ```
//! use linework_geom::Sphere;
//! use linework_math::Point3;
//! use linework_raytrace::{Camera, Scene, VisibilityQuery};
//!
//! let camera = Camera::perspective(Point3::new(0.0, 0.0, 10.0), Point3::origin()).unwrap();
//! let mut scene = Scene::new(camera);
//! scene.add(Sphere::new(Point3::origin(), 1.0).unwrap());
//!
//! let behind = Point3::new(0.0, 0.0, -3.0);
//! assert!(!scene.is_visible(&behind, &VisibilityQuery::default()));
//! ```

mod camera;
pub mod error;
pub mod intersect;
mod primitive;
mod ray;
mod scene;

pub use camera::{Camera, Projection};
pub use error::{CameraError, Result};
pub use primitive::{Primitive, PrimitiveId, Shape, ShapeKind};
pub use ray::{Ray, RayHit};
pub use scene::{
    RaycastOptions, Scene, VisibilityQuery, DEFAULT_VISIBILITY_EPS, ORTHO_FAR,
};
