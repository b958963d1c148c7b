//! Outline curves generated from the primitives: silhouettes, rims, borders
//! and box edges.
//!
//! Silhouettes depend on the camera. Perspective cameras use the eye point;
//! orthographic cameras use the view direction.

use linework_geom::{circle_to_cubics, Cone, CubicBezier3, Cylinder, Sphere};
use linework_math::{basis_from_axis, Vec3};
use linework_raytrace::{Camera, Primitive, Projection, Shape};
use tracing::trace;

use crate::types::CurveInclude;

/// All outline curves for `primitives`, grouped by kind.
///
/// Order: silhouettes, rims, borders, box edges; within each group,
/// primitive order.
pub fn curves_from_primitives(
    primitives: &[Primitive],
    camera: &Camera,
    include: &CurveInclude,
) -> Vec<CubicBezier3> {
    let mut out = Vec::new();
    if include.silhouettes {
        for p in primitives {
            out.extend(silhouette(&p.shape, camera));
        }
    }
    if include.rims {
        out.extend(primitives.iter().flat_map(|p| rims(&p.shape)));
    }
    if include.borders {
        for p in primitives {
            if let Shape::PlaneRect(r) = &p.shape {
                out.extend(r.edges().map(|(a, b)| CubicBezier3::line(a, b)));
            }
        }
    }
    if include.box_edges {
        for p in primitives {
            if let Shape::Box(b) = &p.shape {
                out.extend(b.edges().map(|(a, e)| CubicBezier3::line(a, e)));
            }
        }
    }
    out
}

/// Silhouette curves of a curved solid; empty for flat ones.
pub fn silhouette(shape: &Shape, camera: &Camera) -> Vec<CubicBezier3> {
    match shape {
        Shape::Sphere(s) => sphere_silhouette(s, camera),
        Shape::Cylinder(c) => cylinder_silhouette(c, camera),
        Shape::Cone(c) => cone_silhouette(c, camera),
        Shape::Box(_) | Shape::PlaneRect(_) | Shape::Disk(_) => Vec::new(),
    }
}

/// Circular rims: both ends of a cylinder, the base of a cone, a disk outline.
///
/// Rims are drawn whether or not the solid is capped.
pub fn rims(shape: &Shape) -> Vec<CubicBezier3> {
    match shape {
        Shape::Cylinder(c) => {
            let mut out = circle_to_cubics(&c.base, &c.axis, c.radius);
            out.extend(circle_to_cubics(&c.top_center(), &c.axis, c.radius));
            out
        }
        Shape::Cone(c) => circle_to_cubics(&c.base_center(), &c.axis, c.base_radius),
        Shape::Disk(d) => circle_to_cubics(&d.center, &d.normal, d.radius),
        Shape::Sphere(_) | Shape::Box(_) | Shape::PlaneRect(_) => Vec::new(),
    }
}

/// The circle where lines of sight touch the sphere.
///
/// Empty when the eye is inside the sphere.
pub fn sphere_silhouette(s: &Sphere, camera: &Camera) -> Vec<CubicBezier3> {
    if camera.projection == Projection::Orthographic {
        return circle_to_cubics(&s.center, &camera.forward, s.radius);
    }
    let u = s.center - camera.position;
    let d = u.norm();
    let r = s.radius;
    if d <= r * (1.0 + 1e-8) {
        trace!("eye inside sphere, no silhouette");
        return Vec::new();
    }
    let k = 1.0 - (r * r) / (d * d);
    let center = camera.position + u * k;
    let radius = r * (d * d - r * r).max(0.0).sqrt() / d;
    circle_to_cubics(&center, &(u / d), radius)
}

/// The two side lines where lines of sight graze the cylinder.
///
/// Empty when the eye is within the infinite cylinder, or for an
/// orthographic view along the axis.
pub fn cylinder_silhouette(c: &Cylinder, camera: &Camera) -> Vec<CubicBezier3> {
    let a = c.axis;
    let normals: [Vec3; 2] = match camera.projection {
        Projection::Perspective => {
            let w = camera.position - c.base;
            let w_perp = w - a * w.dot(&a);
            let w_len = w_perp.norm();
            if w_len <= c.radius * (1.0 + 1e-8) {
                return Vec::new();
            }
            let w_unit = w_perp / w_len;
            let perp = a.cross(&w_unit).normalize();
            let cos_phi = c.radius / w_len;
            let sin_phi = (1.0 - cos_phi * cos_phi).max(0.0).sqrt();
            [
                w_unit * cos_phi + perp * sin_phi,
                w_unit * cos_phi - perp * sin_phi,
            ]
        }
        Projection::Orthographic => {
            let side = a.cross(&camera.forward);
            let len = side.norm();
            if len <= 1e-8 {
                return Vec::new();
            }
            let side = side / len;
            [side, -side]
        }
    };
    let top = c.top_center();
    normals
        .iter()
        .map(|n| CubicBezier3::line(c.base + n * c.radius, top + n * c.radius))
        .collect()
}

/// The two rulings from apex to base rim where lines of sight graze the cone.
///
/// Empty when the eye lies on the axis or no real tangent exists.
pub fn cone_silhouette(cone: &Cone, camera: &Camera) -> Vec<CubicBezier3> {
    let a = cone.axis;
    let k = cone.slope();
    let (u, v) = basis_from_axis(&a);
    // direction toward the viewer
    let q = match camera.projection {
        Projection::Perspective => camera.position - cone.apex,
        Projection::Orthographic => -camera.forward,
    };
    let (qu, qv, qa) = (q.dot(&u), q.dot(&v), q.dot(&a));
    let m = qu.hypot(qv);
    if m <= 1e-8 {
        return Vec::new();
    }
    let rhs = k * qa / m;
    if rhs.abs() > 1.0 {
        return Vec::new();
    }
    let phi = qv.atan2(qu);
    let delta = rhs.acos();
    let base = cone.base_center();
    [phi + delta, phi - delta]
        .iter()
        .map(|psi| {
            let (s, c) = psi.sin_cos();
            let w = u * c + v * s;
            CubicBezier3::line(cone.apex, base + w * cone.base_radius)
        })
        .collect()
}
