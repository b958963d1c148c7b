#![warn(missing_docs)]

//! Hidden-line technical drawings of analytic solids.
//!
//! Build a [`Scene`](prelude::Scene) of spheres, cylinders, cones, boxes,
//! rectangles and disks, then render it into cubic Bézier pieces labeled
//! visible or hidden.
//!
//! # Example
//!
//! ```
//! use linework::prelude::*;
//!
//! let camera = Camera::perspective(Point3::new(3.0, 2.0, 6.0), Point3::origin()).unwrap();
//! let mut scene = Scene::new(camera);
//! scene.add(Sphere::new(Point3::origin(), 1.0).unwrap());
//! scene.add(Cylinder::new(Point3::new(0.0, -1.5, 0.0), Vec3::y(), 3.0, 0.4, CylinderCaps::Both).unwrap());
//!
//! let drawing = render_drawing(&scene, &DrawingOptions::default());
//! assert!(drawing.num_visible() > 0);
//! ```

pub use linework_drafting;
pub use linework_geom;
pub use linework_intersect;
pub use linework_math;
pub use linework_raytrace;

/// The types needed to build a scene and render it.
pub mod prelude {
    pub use linework_drafting::{
        render_drawing, CurveInclude, Drawing, DrawingOptions, StyledPiece, VisibilityParams,
    };
    pub use linework_geom::{
        BoxAabb, Cone, ConeCap, CubicBezier3, Cylinder, CylinderCaps, Disk, PlaneRect, Sphere,
    };
    pub use linework_intersect::{FitStrategy, IntersectionOptions};
    pub use linework_math::{Point3, Vec3};
    pub use linework_raytrace::{Camera, PrimitiveId, Scene, Shape};
}
