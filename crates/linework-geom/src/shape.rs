//! The six analytic solids a scene is built from.
//!
//! Fields are public so callers can read dimensions directly; the `new`
//! constructors are the validated way in and normalize every direction.

use linework_math::{Point3, Vec3};

use crate::error::{GeometryError, Result};

// =============================================================================
// Validation helpers
// =============================================================================

fn check_point(p: &Point3, shape: &'static str) -> Result<()> {
    if p.coords.iter().all(|c| c.is_finite()) {
        Ok(())
    } else {
        Err(GeometryError::NonFinite(shape))
    }
}

fn unit(v: &Vec3, shape: &'static str, what: &'static str) -> Result<Vec3> {
    if !v.iter().all(|c| c.is_finite()) {
        return Err(GeometryError::NonFinite(shape));
    }
    let len = v.norm();
    if len <= 1e-12 {
        return Err(GeometryError::ZeroDirection { shape, what });
    }
    Ok(v / len)
}

fn check_radius(radius: f64, shape: &'static str) -> Result<()> {
    if radius.is_finite() && radius > 0.0 {
        Ok(())
    } else {
        Err(GeometryError::NonPositiveRadius { shape, radius })
    }
}

fn check_extent(value: f64, shape: &'static str, what: &'static str) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(GeometryError::NonPositiveExtent { shape, what, value })
    }
}

// =============================================================================
// Sphere
// =============================================================================

/// A solid sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    /// Center point.
    pub center: Point3,
    /// Radius.
    pub radius: f64,
}

impl Sphere {
    /// Create a sphere, rejecting non-positive radii.
    pub fn new(center: Point3, radius: f64) -> Result<Self> {
        check_point(&center, "sphere")?;
        check_radius(radius, "sphere")?;
        Ok(Self { center, radius })
    }
}

// =============================================================================
// Cylinder
// =============================================================================

/// Which flat ends of a cylinder are closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CylinderCaps {
    /// Open tube.
    None,
    /// Base and top are both closed.
    #[default]
    Both,
}

/// A finite right circular cylinder.
///
/// Side surface: `base + axis·s + radius·w(θ)` with `s ∈ [0, height]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cylinder {
    /// Center of the base disk.
    pub base: Point3,
    /// Unit axis from base toward top.
    pub axis: Vec3,
    /// Distance from base to top along the axis.
    pub height: f64,
    /// Radius.
    pub radius: f64,
    /// Cap configuration.
    pub caps: CylinderCaps,
}

impl Cylinder {
    /// Create a cylinder. `axis` is normalized.
    pub fn new(
        base: Point3,
        axis: Vec3,
        height: f64,
        radius: f64,
        caps: CylinderCaps,
    ) -> Result<Self> {
        check_point(&base, "cylinder")?;
        let axis = unit(&axis, "cylinder", "axis")?;
        check_extent(height, "cylinder", "height")?;
        check_radius(radius, "cylinder")?;
        Ok(Self {
            base,
            axis,
            height,
            radius,
            caps,
        })
    }

    /// Center of the top disk.
    pub fn top_center(&self) -> Point3 {
        self.base + self.axis * self.height
    }
}

// =============================================================================
// Cone
// =============================================================================

/// Whether a cone's base is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConeCap {
    /// Open at the base.
    None,
    /// Closed by a base disk.
    #[default]
    Base,
}

/// A finite right circular cone with its apex at one end.
///
/// Side surface: `apex + y·(axis + k·w(θ))` with `y ∈ [0, height]` and
/// `k = base_radius / height`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cone {
    /// Apex point.
    pub apex: Point3,
    /// Unit axis from apex toward the base.
    pub axis: Vec3,
    /// Apex-to-base distance.
    pub height: f64,
    /// Radius of the base circle.
    pub base_radius: f64,
    /// Cap configuration.
    pub cap: ConeCap,
}

impl Cone {
    /// Create a cone. `axis` is normalized.
    pub fn new(
        apex: Point3,
        axis: Vec3,
        height: f64,
        base_radius: f64,
        cap: ConeCap,
    ) -> Result<Self> {
        check_point(&apex, "cone")?;
        let axis = unit(&axis, "cone", "axis")?;
        check_extent(height, "cone", "height")?;
        check_radius(base_radius, "cone")?;
        Ok(Self {
            apex,
            axis,
            height,
            base_radius,
            cap,
        })
    }

    /// Radius growth per unit of axial distance (tangent of the half-angle).
    #[inline]
    pub fn slope(&self) -> f64 {
        self.base_radius / self.height
    }

    /// Center of the base circle.
    pub fn base_center(&self) -> Point3 {
        self.apex + self.axis * self.height
    }
}

// =============================================================================
// Axis-aligned box
// =============================================================================

/// An axis-aligned box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxAabb {
    /// Minimum corner.
    pub min: Point3,
    /// Maximum corner.
    pub max: Point3,
}

impl BoxAabb {
    /// Create a box; `min` must not exceed `max` on any axis.
    pub fn new(min: Point3, max: Point3) -> Result<Self> {
        check_point(&min, "box")?;
        check_point(&max, "box")?;
        for (i, axis) in ['x', 'y', 'z'].into_iter().enumerate() {
            if min[i] > max[i] {
                return Err(GeometryError::InvertedBox {
                    axis,
                    min: min[i],
                    max: max[i],
                });
            }
        }
        Ok(Self { min, max })
    }

    /// The twelve edges: bottom ring, top ring, then the four verticals.
    pub fn edges(&self) -> [(Point3, Point3); 12] {
        let (a, b) = (self.min, self.max);
        let p000 = Point3::new(a.x, a.y, a.z);
        let p001 = Point3::new(a.x, a.y, b.z);
        let p010 = Point3::new(a.x, b.y, a.z);
        let p011 = Point3::new(a.x, b.y, b.z);
        let p100 = Point3::new(b.x, a.y, a.z);
        let p101 = Point3::new(b.x, a.y, b.z);
        let p110 = Point3::new(b.x, b.y, a.z);
        let p111 = Point3::new(b.x, b.y, b.z);
        [
            (p000, p100),
            (p100, p101),
            (p101, p001),
            (p001, p000),
            (p010, p110),
            (p110, p111),
            (p111, p011),
            (p011, p010),
            (p000, p010),
            (p100, p110),
            (p101, p111),
            (p001, p011),
        ]
    }

    /// The six faces as outward-facing rectangles, in `+x, -x, +y, -y, +z, -z` order.
    pub fn faces(&self) -> [PlaneRect; 6] {
        let (a, b) = (self.min, self.max);
        let c = midpoint(&a, &b);
        let h = (b - a) / 2.0;
        let face = |center: Point3, normal: Vec3, u: Vec3, half_width: f64, half_height: f64| {
            PlaneRect {
                center,
                normal,
                u,
                v: normal.cross(&u),
                half_width,
                half_height,
            }
        };
        [
            face(Point3::new(b.x, c.y, c.z), Vec3::x(), Vec3::z(), h.z, h.y),
            face(Point3::new(a.x, c.y, c.z), -Vec3::x(), Vec3::z(), h.z, h.y),
            face(Point3::new(c.x, b.y, c.z), Vec3::y(), Vec3::x(), h.x, h.z),
            face(Point3::new(c.x, a.y, c.z), -Vec3::y(), Vec3::x(), h.x, h.z),
            face(Point3::new(c.x, c.y, b.z), Vec3::z(), Vec3::x(), h.x, h.y),
            face(Point3::new(c.x, c.y, a.z), -Vec3::z(), Vec3::x(), h.x, h.y),
        ]
    }
}

fn midpoint(a: &Point3, b: &Point3) -> Point3 {
    Point3::from((a.coords + b.coords) / 2.0)
}

// =============================================================================
// Plane rectangle
// =============================================================================

/// A finite rectangle in a plane.
///
/// Points are `center + u·a + v·b` with `|a| ≤ half_width`, `|b| ≤ half_height`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneRect {
    /// Rectangle center.
    pub center: Point3,
    /// Unit normal.
    pub normal: Vec3,
    /// Unit in-plane width direction.
    pub u: Vec3,
    /// Unit in-plane height direction, `normal × u`.
    pub v: Vec3,
    /// Half extent along `u`.
    pub half_width: f64,
    /// Half extent along `v`.
    pub half_height: f64,
}

impl PlaneRect {
    /// Create a rectangle. `u_hint` is projected into the plane and normalized.
    pub fn new(
        center: Point3,
        normal: Vec3,
        u_hint: Vec3,
        half_width: f64,
        half_height: f64,
    ) -> Result<Self> {
        check_point(&center, "plane rect")?;
        let normal = unit(&normal, "plane rect", "normal")?;
        let projected = u_hint - normal * u_hint.dot(&normal);
        let u = unit(&projected, "plane rect", "in-plane direction")?;
        let v = normal.cross(&u).normalize();
        check_extent(half_width, "plane rect", "half width")?;
        check_extent(half_height, "plane rect", "half height")?;
        Ok(Self {
            center,
            normal,
            u,
            v,
            half_width,
            half_height,
        })
    }

    /// In-plane coordinates `(a, b)` of `p` relative to the center.
    #[inline]
    pub fn local(&self, p: &Point3) -> (f64, f64) {
        let d = p - self.center;
        (d.dot(&self.u), d.dot(&self.v))
    }

    /// True when the in-plane projection of `p` lies inside the rectangle grown by `slack`.
    pub fn contains_projected(&self, p: &Point3, slack: f64) -> bool {
        let (a, b) = self.local(p);
        a.abs() <= self.half_width + slack && b.abs() <= self.half_height + slack
    }

    /// Corners in counter-clockwise order about `normal`, starting at `(-w, -h)`.
    pub fn corners(&self) -> [Point3; 4] {
        let ux = self.u * self.half_width;
        let vy = self.v * self.half_height;
        let c = self.center;
        [c - ux - vy, c + ux - vy, c + ux + vy, c - ux + vy]
    }

    /// The four border edges following [`corners`](Self::corners).
    pub fn edges(&self) -> [(Point3, Point3); 4] {
        let [p00, p10, p11, p01] = self.corners();
        [(p00, p10), (p10, p11), (p11, p01), (p01, p00)]
    }
}

// =============================================================================
// Disk
// =============================================================================

/// A flat circular disk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Disk {
    /// Center point.
    pub center: Point3,
    /// Unit normal.
    pub normal: Vec3,
    /// Radius.
    pub radius: f64,
}

impl Disk {
    /// Create a disk. `normal` is normalized.
    pub fn new(center: Point3, normal: Vec3, radius: f64) -> Result<Self> {
        check_point(&center, "disk")?;
        let normal = unit(&normal, "disk", "normal")?;
        check_radius(radius, "disk")?;
        Ok(Self {
            center,
            normal,
            radius,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_rejects_bad_radius() {
        assert!(Sphere::new(Point3::origin(), 1.0).is_ok());
        assert!(matches!(
            Sphere::new(Point3::origin(), 0.0),
            Err(GeometryError::NonPositiveRadius { .. })
        ));
        assert!(Sphere::new(Point3::origin(), f64::NAN).is_err());
        assert!(matches!(
            Sphere::new(Point3::new(f64::INFINITY, 0.0, 0.0), 1.0),
            Err(GeometryError::NonFinite("sphere"))
        ));
    }

    #[test]
    fn test_cylinder_normalizes_axis() {
        let c = Cylinder::new(
            Point3::origin(),
            Vec3::new(0.0, 0.0, 5.0),
            2.0,
            1.0,
            CylinderCaps::Both,
        )
        .unwrap();
        assert!((c.axis.norm() - 1.0).abs() < 1e-12);
        assert!((c.top_center() - Point3::new(0.0, 0.0, 2.0)).norm() < 1e-12);
    }

    #[test]
    fn test_zero_axis_rejected() {
        let err = Cone::new(Point3::origin(), Vec3::zeros(), 1.0, 1.0, ConeCap::Base).unwrap_err();
        assert_eq!(
            err,
            GeometryError::ZeroDirection {
                shape: "cone",
                what: "axis"
            }
        );
        assert!(Cylinder::new(Point3::origin(), Vec3::z(), 1.0, 0.0, CylinderCaps::None).is_err());
        assert!(Cylinder::new(Point3::origin(), Vec3::z(), -1.0, 1.0, CylinderCaps::None).is_err());
    }

    #[test]
    fn test_cone_slope() {
        let c = Cone::new(Point3::origin(), Vec3::z(), 2.0, 1.0, ConeCap::Base).unwrap();
        assert!((c.slope() - 0.5).abs() < 1e-12);
        assert!((c.base_center() - Point3::new(0.0, 0.0, 2.0)).norm() < 1e-12);
    }

    #[test]
    fn test_box_inverted() {
        let err = BoxAabb::new(Point3::new(0.0, 1.0, 0.0), Point3::new(1.0, 0.0, 1.0)).unwrap_err();
        assert!(matches!(err, GeometryError::InvertedBox { axis: 'y', .. }));
    }

    #[test]
    fn test_box_faces_are_outward_and_cover_box() {
        let b = BoxAabb::new(Point3::new(-1.0, -2.0, -3.0), Point3::new(1.0, 2.0, 3.0)).unwrap();
        let center = Point3::origin();
        for f in b.faces() {
            // outward: center lies behind every face
            assert!((center - f.center).dot(&f.normal) < 0.0);
            assert!(f.u.dot(&f.normal).abs() < 1e-12);
            assert!((f.v.norm() - 1.0).abs() < 1e-12);
            for corner in f.corners() {
                for i in 0..3 {
                    assert!(corner[i] >= b.min[i] - 1e-12 && corner[i] <= b.max[i] + 1e-12);
                }
            }
        }
    }

    #[test]
    fn test_box_edges_length() {
        let b = BoxAabb::new(Point3::origin(), Point3::new(1.0, 2.0, 3.0)).unwrap();
        let total: f64 = b.edges().iter().map(|(p, q)| (q - p).norm()).sum();
        assert!((total - 4.0 * (1.0 + 2.0 + 3.0)).abs() < 1e-12);
    }

    #[test]
    fn test_plane_rect_projects_hint() {
        let r = PlaneRect::new(
            Point3::origin(),
            Vec3::z(),
            Vec3::new(1.0, 0.0, 1.0),
            2.0,
            1.0,
        )
        .unwrap();
        assert!((r.u - Vec3::x()).norm() < 1e-12);
        assert!((r.v - Vec3::y()).norm() < 1e-12);
        assert!(r.contains_projected(&Point3::new(1.9, -0.9, 5.0), 0.0));
        assert!(!r.contains_projected(&Point3::new(2.1, 0.0, 0.0), 0.0));
        assert_eq!(r.local(&Point3::new(1.0, 0.5, 3.0)), (1.0, 0.5));
    }

    #[test]
    fn test_plane_rect_hint_parallel_to_normal() {
        assert!(PlaneRect::new(Point3::origin(), Vec3::z(), Vec3::z(), 1.0, 1.0).is_err());
    }

    #[test]
    fn test_disk() {
        let d = Disk::new(Point3::origin(), Vec3::new(0.0, 3.0, 0.0), 1.5).unwrap();
        assert!((d.normal - Vec3::y()).norm() < 1e-12);
        assert!(Disk::new(Point3::origin(), Vec3::y(), -1.0).is_err());
    }
}
