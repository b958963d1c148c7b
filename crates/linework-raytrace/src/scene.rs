//! Scene container, closest-hit ray casting and the point visibility oracle.

use linework_math::{normalize_or_zero, Point3};
use tracing::trace;

use crate::{Camera, Primitive, PrimitiveId, Projection, Ray, RayHit, Shape};

/// Offset used to place the ray origin in front of a point for orthographic views.
pub const ORTHO_FAR: f64 = 1e6;

/// Default absolute visibility epsilon.
pub const DEFAULT_VISIBILITY_EPS: f64 = 2e-4;

/// Options for [`Scene::raycast_closest`].
#[derive(Debug, Clone, Copy)]
pub struct RaycastOptions<'a> {
    /// Minimum accepted ray parameter.
    pub t_min: f64,
    /// Maximum accepted ray parameter.
    pub t_max: f64,
    /// Primitives skipped entirely.
    pub exclude: &'a [PrimitiveId],
}

impl Default for RaycastOptions<'_> {
    fn default() -> Self {
        Self {
            t_min: 0.0,
            t_max: f64::INFINITY,
            exclude: &[],
        }
    }
}

/// Parameters of a single point visibility query.
#[derive(Debug, Clone, Copy)]
pub struct VisibilityQuery<'a> {
    /// Absolute distance tolerance in world units.
    pub eps: f64,
    /// Primitives that own the queried point.
    ///
    /// When set, a hit close to the target is forgiven only if it belongs to
    /// one of these. When `None`, every hit close to the target is forgiven.
    /// Owners are never skipped by the raycast itself, so a far part of an
    /// owning solid still occludes.
    pub owners: Option<&'a [PrimitiveId]>,
}

impl Default for VisibilityQuery<'_> {
    fn default() -> Self {
        Self {
            eps: DEFAULT_VISIBILITY_EPS,
            owners: None,
        }
    }
}

/// An ordered collection of primitives observed by one camera.
#[derive(Debug, Clone)]
pub struct Scene {
    camera: Camera,
    primitives: Vec<Primitive>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new(camera: Camera) -> Self {
        Self {
            camera,
            primitives: Vec::new(),
        }
    }

    /// Add a shape and return its id. Ids are assigned sequentially from zero.
    pub fn add(&mut self, shape: impl Into<Shape>) -> PrimitiveId {
        let id = PrimitiveId(self.primitives.len() as u32);
        let shape = shape.into();
        trace!(%id, kind = ?shape.kind(), "added primitive");
        self.primitives.push(Primitive { id, shape });
        id
    }

    /// The viewing camera.
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// All primitives in insertion order.
    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    /// Look up a primitive by id.
    pub fn get(&self, id: PrimitiveId) -> Option<&Primitive> {
        self.primitives.get(id.0 as usize)
    }

    /// Number of primitives.
    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    /// True when the scene has no primitives.
    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// Closest hit over all non-excluded primitives.
    ///
    /// The search window shrinks to the best hit found so far.
    pub fn raycast_closest(&self, ray: &Ray, opts: &RaycastOptions<'_>) -> Option<RayHit> {
        let mut best: Option<RayHit> = None;
        let mut best_t = opts.t_max;
        for p in &self.primitives {
            if opts.exclude.contains(&p.id) {
                continue;
            }
            if let Some(hit) = p.intersect(ray, opts.t_min, best_t) {
                if hit.t < best_t || best.is_none() {
                    best_t = hit.t;
                    best = Some(hit);
                }
            }
        }
        best
    }

    /// Is `point` unoccluded from the camera?
    ///
    /// One ray is cast toward the point and truncated just short of it. No
    /// hit means visible. A hit within the snap radius of the point is
    /// treated as the point's own surface (subject to
    /// [`VisibilityQuery::owners`]); any other hit occludes.
    ///
    /// Perspective: origin is the eye, `eps' = max(eps, dist·1e-6)`,
    /// `t_max = dist - eps'`, snap radius `max(8·eps, dist·2e-6)`.
    /// Orthographic: origin is `point - forward·ORTHO_FAR`,
    /// `t_max = ORTHO_FAR - eps`, snap radius `8·eps`.
    pub fn is_visible(&self, point: &Point3, query: &VisibilityQuery<'_>) -> bool {
        let eps = query.eps.max(0.0);
        let (ray, t_max, snap) = match self.camera.projection {
            Projection::Perspective => {
                let origin = self.camera.position;
                let to_point = point - origin;
                let dist = to_point.norm();
                let margin = eps.max(dist * 1e-6);
                let ray = Ray {
                    origin,
                    direction: normalize_or_zero(&to_point),
                };
                (ray, (dist - margin).max(0.0), (8.0 * eps).max(dist * 2e-6))
            }
            Projection::Orthographic => {
                let dir = self.camera.forward;
                let ray = Ray {
                    origin: point - dir * ORTHO_FAR,
                    direction: dir,
                };
                (ray, (ORTHO_FAR - eps).max(0.0), 8.0 * eps)
            }
        };

        let opts = RaycastOptions {
            t_min: 0.0,
            t_max,
            exclude: &[],
        };
        let Some(hit) = self.raycast_closest(&ray, &opts) else {
            return true;
        };

        if (hit.point - point).norm_squared() <= snap * snap {
            return match query.owners {
                None => true,
                Some(owners) => owners.contains(&hit.primitive),
            };
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linework_geom::{BoxAabb, Sphere};
    use linework_math::Vec3;

    fn sphere_scene() -> (Scene, PrimitiveId) {
        let cam = Camera::perspective(Point3::new(0.0, 0.0, 10.0), Point3::origin()).unwrap();
        let mut scene = Scene::new(cam);
        let id = scene.add(Sphere::new(Point3::origin(), 1.0).unwrap());
        (scene, id)
    }

    #[test]
    fn test_ids_are_sequential() {
        let (mut scene, first) = sphere_scene();
        let second = scene.add(Sphere::new(Point3::new(3.0, 0.0, 0.0), 1.0).unwrap());
        assert_eq!(first, PrimitiveId(0));
        assert_eq!(second, PrimitiveId(1));
        assert_eq!(scene.len(), 2);
        assert!(scene.get(second).is_some());
        assert!(scene.get(PrimitiveId(9)).is_none());
    }

    #[test]
    fn test_raycast_closest_and_exclude() {
        let (mut scene, front) = sphere_scene();
        let back = scene.add(Sphere::new(Point3::new(0.0, 0.0, -5.0), 1.0).unwrap());
        let ray = Ray::new(Point3::new(0.0, 0.0, 10.0), -Vec3::z());
        let hit = scene.raycast_closest(&ray, &RaycastOptions::default()).unwrap();
        assert_eq!(hit.primitive, front);
        assert!((hit.t - 9.0).abs() < 1e-10);

        let exclude = [front];
        let opts = RaycastOptions {
            exclude: &exclude,
            ..Default::default()
        };
        let hit = scene.raycast_closest(&ray, &opts).unwrap();
        assert_eq!(hit.primitive, back);
    }

    #[test]
    fn test_point_behind_sphere_is_hidden() {
        let (scene, id) = sphere_scene();
        let behind = Point3::new(0.0, 0.0, -3.0);
        assert!(!scene.is_visible(&behind, &VisibilityQuery::default()));
        let owners = [id];
        let q = VisibilityQuery {
            owners: Some(&owners),
            ..Default::default()
        };
        // the hit is far from the target, owners do not help
        assert!(!scene.is_visible(&behind, &q));
    }

    #[test]
    fn test_front_point_is_visible() {
        let (scene, _) = sphere_scene();
        assert!(scene.is_visible(&Point3::new(0.0, 0.0, 1.0), &VisibilityQuery::default()));
        assert!(scene.is_visible(&Point3::new(5.0, 0.0, 0.0), &VisibilityQuery::default()));
    }

    #[test]
    fn test_near_self_hit_is_snapped_for_owners_only() {
        let (scene, id) = sphere_scene();
        // just under the surface: the ray hits the sphere 1e-3 before the point
        let p = Point3::new(0.0, 0.0, 1.0 - 1e-3);

        let owners = [id];
        let as_owner = VisibilityQuery {
            owners: Some(&owners),
            ..Default::default()
        };
        assert!(scene.is_visible(&p, &as_owner));

        let strangers = [PrimitiveId(42)];
        let not_owner = VisibilityQuery {
            owners: Some(&strangers),
            ..Default::default()
        };
        assert!(!scene.is_visible(&p, &not_owner));

        // no owner list forgives any near hit
        assert!(scene.is_visible(&p, &VisibilityQuery::default()));
    }

    #[test]
    fn test_third_party_occluder_not_forgiven() {
        let (mut scene, id) = sphere_scene();
        // a thin box sits just in front of the owner's surface point
        let wall = scene.add(
            BoxAabb::new(Point3::new(-0.5, -0.5, 1.0 + 1e-3), Point3::new(0.5, 0.5, 1.0 + 1.2e-3))
                .unwrap(),
        );
        let p = Point3::new(0.0, 0.0, 1.0);
        let owners = [id];
        let q = VisibilityQuery {
            owners: Some(&owners),
            ..Default::default()
        };
        assert!(!scene.is_visible(&p, &q));
        let owners = [id, wall];
        let q = VisibilityQuery {
            owners: Some(&owners),
            ..Default::default()
        };
        assert!(scene.is_visible(&p, &q));
    }

    #[test]
    fn test_orthographic_visibility() {
        let cam = Camera::orthographic(Point3::new(0.0, 0.0, 10.0), Point3::origin()).unwrap();
        let mut scene = Scene::new(cam);
        scene.add(Sphere::new(Point3::origin(), 1.0).unwrap());
        // off to the side of the sphere, the parallel ray misses it
        assert!(scene.is_visible(&Point3::new(0.9, 0.9, -2.0), &VisibilityQuery::default()));
        assert!(!scene.is_visible(&Point3::new(0.2, 0.0, -2.0), &VisibilityQuery::default()));
    }
}
