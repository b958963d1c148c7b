//! The point visibility question the splitter is built on.

use linework_math::Point3;
use linework_raytrace::{PrimitiveId, Scene, VisibilityQuery};

/// Answers whether a world point is unoccluded from the camera.
///
/// `owners` lists the primitives the point lies on. Hits from those
/// primitives close to the point are treated as the point's own surface;
/// `None` forgives every close hit.
pub trait VisibilityOracle {
    /// True when `point` is visible.
    fn is_visible(&self, point: &Point3, eps: f64, owners: Option<&[PrimitiveId]>) -> bool;
}

impl VisibilityOracle for Scene {
    fn is_visible(&self, point: &Point3, eps: f64, owners: Option<&[PrimitiveId]>) -> bool {
        Scene::is_visible(self, point, &VisibilityQuery { eps, owners })
    }
}

/// Oracle driven by a predicate on the point, counting its queries.
#[cfg(test)]
pub(crate) struct FnOracle<F> {
    f: F,
    pub calls: std::cell::Cell<usize>,
}

#[cfg(test)]
impl<F: Fn(&Point3) -> bool> FnOracle<F> {
    pub fn new(f: F) -> Self {
        Self {
            f,
            calls: std::cell::Cell::new(0),
        }
    }
}

#[cfg(test)]
impl<F: Fn(&Point3) -> bool> VisibilityOracle for FnOracle<F> {
    fn is_visible(&self, p: &Point3, _eps: f64, _owners: Option<&[PrimitiveId]>) -> bool {
        self.calls.set(self.calls.get() + 1);
        (self.f)(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linework_geom::Sphere;
    use linework_raytrace::Camera;

    #[test]
    fn test_scene_oracle_behind_sphere() {
        let cam = Camera::perspective(Point3::new(0.0, 0.0, 10.0), Point3::origin()).unwrap();
        let mut scene = Scene::new(cam);
        let id = scene.add(Sphere::new(Point3::origin(), 1.0).unwrap());

        let oracle: &dyn VisibilityOracle = &scene;
        assert!(!oracle.is_visible(&Point3::new(0.0, 0.0, -3.0), 2e-4, None));
        assert!(oracle.is_visible(&Point3::new(3.0, 0.0, 0.0), 2e-4, None));
        // a point on the near surface is its own hit
        let front = Point3::new(0.0, 0.0, 1.0);
        assert!(oracle.is_visible(&front, 2e-4, Some(&[id])));
        assert!(oracle.is_visible(&front, 2e-4, None));
    }
}
