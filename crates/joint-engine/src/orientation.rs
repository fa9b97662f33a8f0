//! Deterministic "up" vectors for pairs of member directions.

use nalgebra::Vector3;
use tracing::warn;

/// Flip `v` into a canonical hemisphere.
///
/// The first of world Y, X, Z with a dot product above `tol` in magnitude
/// decides the sign; a negative dot flips the vector.
pub fn orient_to_hemisphere(v: Vector3<f64>, tol: f64) -> Vector3<f64> {
    for reference in [Vector3::y(), Vector3::x(), Vector3::z()] {
        let d = v.dot(&reference);
        if d.abs() > tol {
            return if d < 0.0 { -v } else { v };
        }
    }
    v
}

/// Shared up vector for two member directions.
///
/// Normalized cross product, world Y when the directions are parallel, then
/// stabilized so that operand order never changes the result.
pub fn stabilized_up(da: &Vector3<f64>, db: &Vector3<f64>, tol: f64) -> Vector3<f64> {
    let cross = da.cross(db);
    let up = if cross.norm() < tol {
        warn!(?da, ?db, "parallel member directions; up falls back to world Y");
        Vector3::y()
    } else {
        cross.normalize()
    };
    orient_to_hemisphere(up, tol)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn right_angle_in_xy_points_up_z() {
        let up = stabilized_up(&Vector3::x(), &Vector3::y(), 1e-6);
        assert_relative_eq!(up, Vector3::z());
        let swapped = stabilized_up(&Vector3::y(), &Vector3::x(), 1e-6);
        assert_eq!(up, swapped);
    }

    #[test]
    fn parallel_directions_fall_back_to_world_y() {
        let up = stabilized_up(&Vector3::x(), &-Vector3::x(), 1e-6);
        assert_eq!(up, Vector3::y());
    }

    #[test]
    fn hemisphere_prefers_y_then_x() {
        let v = Vector3::new(-0.6, -0.8, 0.0);
        assert_relative_eq!(orient_to_hemisphere(v, 1e-6), Vector3::new(0.6, 0.8, 0.0));
        let w = Vector3::new(-1.0, 0.0, 0.0);
        assert_relative_eq!(orient_to_hemisphere(w, 1e-6), Vector3::x());
        let z = Vector3::new(0.0, 0.0, -1.0);
        assert_relative_eq!(orient_to_hemisphere(z, 1e-6), Vector3::z());
    }
}
