//! Placement of a cross-section along a member axis.

use frame_types::Segment;
use nalgebra::{
    Isometry3, Matrix3, Point3, Rotation3, Translation3, UnitQuaternion, Vector2, Vector3,
};
use tracing::warn;

use crate::types::SweepError;

/// A usable section reference for `axis`.
///
/// Falls back to world Y, then world X, when `up` is near zero or parallel to
/// the axis.
pub fn usable_up(axis: &Vector3<f64>, up: &Vector3<f64>) -> Vector3<f64> {
    let candidates = [*up, Vector3::y(), Vector3::x()];
    for (i, c) in candidates.into_iter().enumerate() {
        if let Some(unit) = c.try_normalize(1e-9) {
            if unit.cross(axis).norm() > 1e-6 {
                if i > 0 {
                    warn!(?up, ?axis, fallback = ?unit, "section up unusable for axis");
                }
                return unit;
            }
        }
    }
    warn!(?up, ?axis, "section up unusable for axis; using world Z");
    Vector3::z()
}

/// Orthonormal section frame: `x`/`y` span the section, `axis` runs along the member.
///
/// `x × y == axis`. `origin` is the section center at the axis start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionFrame {
    pub origin: Point3<f64>,
    pub axis: Vector3<f64>,
    pub x: Vector3<f64>,
    pub y: Vector3<f64>,
}

impl SectionFrame {
    pub fn new(
        segment: &Segment,
        local_up: &Vector3<f64>,
        rotation: f64,
        offset: &Vector2<f64>,
    ) -> Result<Self, SweepError> {
        let axis = segment.direction().ok_or(SweepError::DegenerateAxis)?;
        let up = usable_up(&axis, local_up);
        let y0 = (up - axis * up.dot(&axis)).normalize();
        let x0 = y0.cross(&axis);
        let (s, c) = rotation.sin_cos();
        let x = x0 * c + y0 * s;
        let y = y0 * c - x0 * s;
        let origin = segment.start + x * offset.x + y * offset.y;
        Ok(Self { origin, axis, x, y })
    }

    /// Section point `(u, v)` on the start plane.
    pub fn point(&self, u: f64, v: f64) -> Point3<f64> {
        self.origin + self.x * u + self.y * v
    }

    /// Displacement of the section center from the axis.
    pub fn center_shift(&self, segment: &Segment) -> Vector3<f64> {
        self.origin - segment.start
    }

    /// Half extent of a `width` x `height` section measured along `dir`.
    pub fn half_extent_along(&self, dir: &Vector3<f64>, width: f64, height: f64) -> f64 {
        dir.dot(&self.x).abs() * width / 2.0 + dir.dot(&self.y).abs() * height / 2.0
    }

    /// Maps frame coordinates (section x, section y, distance along axis) to local space.
    pub fn isometry(&self) -> Isometry3<f64> {
        let basis = Matrix3::from_columns(&[self.x, self.y, self.axis]);
        let rotation = UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix_unchecked(basis));
        Isometry3::from_parts(Translation3::from(self.origin.coords), rotation)
    }
}
