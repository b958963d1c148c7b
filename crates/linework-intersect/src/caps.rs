//! Flat end caps of cylinders and cones, treated as disks.

use linework_geom::{ConeCap, CylinderCaps, Disk};
use linework_raytrace::{Primitive, PrimitiveId, Shape};

/// Which end of its solid a cap closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapEnd {
    /// Cylinder base, or the base of a cone.
    Base,
    /// Cylinder top.
    Top,
}

/// A cap disk derived from a capped cylinder or cone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapDisk {
    /// The solid this cap belongs to.
    pub parent: PrimitiveId,
    /// Which end it closes.
    pub end: CapEnd,
    /// The cap geometry; its normal is the parent's axis.
    pub disk: Disk,
}

/// Collect the cap disks of every capped cylinder and cone, in primitive order.
pub fn derive_cap_disks(primitives: &[Primitive]) -> Vec<CapDisk> {
    let mut out = Vec::new();
    for prim in primitives {
        match &prim.shape {
            Shape::Cylinder(c) if c.caps == CylinderCaps::Both => {
                out.push(CapDisk {
                    parent: prim.id,
                    end: CapEnd::Base,
                    disk: Disk {
                        center: c.base,
                        normal: c.axis,
                        radius: c.radius,
                    },
                });
                out.push(CapDisk {
                    parent: prim.id,
                    end: CapEnd::Top,
                    disk: Disk {
                        center: c.top_center(),
                        normal: c.axis,
                        radius: c.radius,
                    },
                });
            }
            Shape::Cone(c) if c.cap == ConeCap::Base => {
                out.push(CapDisk {
                    parent: prim.id,
                    end: CapEnd::Base,
                    disk: Disk {
                        center: c.base_center(),
                        normal: c.axis,
                        radius: c.base_radius,
                    },
                });
            }
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use linework_geom::{Cone, Cylinder, Sphere};
    use linework_math::{Point3, Vec3};

    fn prim(id: u32, shape: impl Into<Shape>) -> Primitive {
        Primitive {
            id: PrimitiveId(id),
            shape: shape.into(),
        }
    }

    #[test]
    fn test_caps_follow_cap_flags() {
        let open = Cylinder::new(Point3::origin(), Vec3::z(), 2.0, 1.0, CylinderCaps::None).unwrap();
        let closed = Cylinder::new(Point3::origin(), Vec3::z(), 2.0, 1.0, CylinderCaps::Both).unwrap();
        let cone = Cone::new(Point3::new(5.0, 0.0, 0.0), Vec3::x(), 1.5, 0.5, ConeCap::Base).unwrap();
        let sphere = Sphere::new(Point3::origin(), 1.0).unwrap();
        let prims = [prim(0, open), prim(1, closed), prim(2, cone), prim(3, sphere)];

        let caps = derive_cap_disks(&prims);
        assert_eq!(caps.len(), 3);
        assert_eq!((caps[0].parent, caps[0].end), (PrimitiveId(1), CapEnd::Base));
        assert_eq!((caps[1].parent, caps[1].end), (PrimitiveId(1), CapEnd::Top));
        assert!((caps[1].disk.center - Point3::new(0.0, 0.0, 2.0)).norm() < 1e-12);
        assert_eq!(caps[2].parent, PrimitiveId(2));
        assert!((caps[2].disk.center - Point3::new(6.5, 0.0, 0.0)).norm() < 1e-12);
        assert_eq!(caps[2].disk.radius, 0.5);
    }
}
