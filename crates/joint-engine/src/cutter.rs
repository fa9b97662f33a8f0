//! Oriented planar cutters: a large square loop extruded to one or both sides.

use frame_kernel::primitives::square_loop;
use frame_kernel::{GeometryKernel, SolidHandle};
use nalgebra::{Isometry3, Point3, Vector3};
use profile_sweep::usable_up;

use crate::error::JointError;

/// Oriented cutting plane with an in-plane basis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CutterPlane {
    pub origin: Point3<f64>,
    /// Unit normal.
    pub normal: Vector3<f64>,
    pub u: Vector3<f64>,
    pub v: Vector3<f64>,
}

impl CutterPlane {
    /// Plane through `origin` with the given normal; `hint` fixes the in-plane rotation.
    pub fn new(
        origin: Point3<f64>,
        normal: Vector3<f64>,
        hint: &Vector3<f64>,
    ) -> Result<Self, JointError> {
        let normal = normal
            .try_normalize(1e-12)
            .ok_or_else(|| JointError::degenerate("cutting plane normal has zero length"))?;
        let up = usable_up(&normal, hint);
        let u = up.cross(&normal).normalize();
        let v = normal.cross(&u);
        Ok(Self {
            origin,
            normal,
            u,
            v,
        })
    }

    pub fn signed_distance(&self, p: &Point3<f64>) -> f64 {
        (p - self.origin).dot(&self.normal)
    }

    /// Express a world-space plane in the local space of `placement`.
    pub fn to_local(&self, placement: &Isometry3<f64>) -> Self {
        Self {
            origin: placement.inverse_transform_point(&self.origin),
            normal: placement.inverse_transform_vector(&self.normal),
            u: placement.inverse_transform_vector(&self.u),
            v: placement.inverse_transform_vector(&self.v),
        }
    }

    pub fn translated(&self, offset: &Vector3<f64>) -> Self {
        Self {
            origin: self.origin + offset,
            ..*self
        }
    }
}

/// Extrusion lengths along a plane normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extrusion {
    /// Unit direction that receives `long`.
    pub direction: Vector3<f64>,
    pub long: f64,
    /// Length along `-direction`.
    pub short: f64,
}

/// Pick which side of the plane gets the long extrusion.
///
/// `(joint - far)` is projected on `+normal` and `-normal`; the larger
/// projection receives `long`. A tie goes to `+normal`.
pub fn determine_extrusion_direction(
    joint: &Point3<f64>,
    far: &Point3<f64>,
    normal: &Vector3<f64>,
    long: f64,
    short: f64,
) -> Extrusion {
    let toward_joint = joint - far;
    let plus = toward_joint.dot(normal);
    let minus = toward_joint.dot(&-normal);
    let direction = if minus > plus { -normal } else { *normal };
    Extrusion {
        direction,
        long,
        short,
    }
}

/// Square of half-size `half` on `plane`, extruded per `extrusion`.
pub fn build_cutter(
    kernel: &mut dyn GeometryKernel,
    plane: &CutterPlane,
    half: f64,
    extrusion: &Extrusion,
) -> Result<SolidHandle, JointError> {
    let outline = square_loop(&plane.origin, &plane.u, &plane.v, half);
    let long = kernel.extrude_loop(&outline, &extrusion.direction, extrusion.long)?;
    if extrusion.short <= 0.0 {
        return Ok(long);
    }
    let short = match kernel.extrude_loop(&outline, &-extrusion.direction, extrusion.short) {
        Ok(s) => s,
        Err(e) => {
            kernel.release(long);
            return Err(e.into());
        }
    };
    let both = kernel.boolean_union(&long, &short);
    kernel.release(long);
    kernel.release(short);
    Ok(both?)
}

/// Remove from `body` everything on the joint side of `plane`.
///
/// `plane` and `far` are in the body's space; the side away from `far`
/// is cut. Returns a new solid; `body` is left untouched.
pub fn cut_at_plane(
    kernel: &mut dyn GeometryKernel,
    body: &SolidHandle,
    plane: &CutterPlane,
    far: &Point3<f64>,
    reach: f64,
) -> Result<SolidHandle, JointError> {
    let extrusion = determine_extrusion_direction(&plane.origin, far, &plane.normal, reach, 0.0);
    let cutter = build_cutter(kernel, plane, reach, &extrusion)?;
    let result = kernel.boolean_subtract(body, &cutter);
    kernel.release(cutter);
    Ok(result?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use frame_kernel::primitives::extrude_box;
    use frame_kernel::CellKernel;

    #[test]
    fn long_side_faces_the_joint() {
        let n = Vector3::x();
        let e = determine_extrusion_direction(
            &Point3::new(1.0, 0.0, 0.0),
            &Point3::new(0.0, 0.0, 0.0),
            &n,
            10.0,
            1.0,
        );
        assert_eq!(e.direction, n);
        let e = determine_extrusion_direction(
            &Point3::new(0.0, 0.0, 0.0),
            &Point3::new(1.0, 0.0, 0.0),
            &n,
            10.0,
            1.0,
        );
        assert_eq!(e.direction, -n);
    }

    #[test]
    fn plane_basis_is_orthonormal() {
        let p = CutterPlane::new(Point3::origin(), Vector3::new(1.0, 1.0, 0.0), &Vector3::z()).unwrap();
        assert_relative_eq!(p.u.dot(&p.normal), 0.0, epsilon = 1e-12);
        assert_relative_eq!(p.v.dot(&p.normal), 0.0, epsilon = 1e-12);
        assert_relative_eq!(p.u.cross(&p.v), p.normal, epsilon = 1e-12);
    }

    #[test]
    fn cut_keeps_far_side() {
        let mut k = CellKernel::new();
        let body = extrude_box(&mut k, 4.0, 1.0, 1.0).unwrap();
        let plane = CutterPlane::new(Point3::new(1.0, 0.5, 0.5), Vector3::x(), &Vector3::z()).unwrap();
        let cut = cut_at_plane(&mut k, &body, &plane, &Point3::new(4.0, 0.5, 0.5), 50.0).unwrap();
        assert_relative_eq!(k.volume(&cut).unwrap(), 3.0, epsilon = 1e-9);
        assert_relative_eq!(k.bounding_box(&cut).unwrap().min.x, 1.0, epsilon = 1e-9);
        assert_eq!(k.live_solids(), 2);
    }

    #[test]
    fn bidirectional_cutter_spans_both_sides() {
        let mut k = CellKernel::new();
        let plane = CutterPlane::new(Point3::origin(), Vector3::z(), &Vector3::y()).unwrap();
        let e = Extrusion {
            direction: Vector3::z(),
            long: 3.0,
            short: 1.0,
        };
        let c = build_cutter(&mut k, &plane, 1.0, &e).unwrap();
        let bb = k.bounding_box(&c).unwrap();
        assert_relative_eq!(bb.min.z, -1.0, epsilon = 1e-12);
        assert_relative_eq!(bb.max.z, 3.0, epsilon = 1e-12);
        assert_relative_eq!(k.volume(&c).unwrap(), 16.0, epsilon = 1e-9);
        assert_eq!(k.live_solids(), 1);
    }
}
