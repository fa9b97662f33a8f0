//! Helper functions: error type, profile shortcuts, geometry math.

use frame_kernel::{Aabb, GeometryKernel, KernelError};
use frame_types::ProfileSpec;
use joint_engine::{JointError, Member};
use nalgebra::Point3;

// ── Error Type ──────────────────────────────────────────────────────────────

/// Unified error type for the test harness.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("member not found: {name}")]
    MemberNotFound { name: String },

    #[error("duplicate name: {name}")]
    DuplicateName { name: String },

    #[error("assertion failed: {detail}")]
    AssertionFailed { detail: String },

    #[error("joint engine error: {0}")]
    Joint(#[from] JointError),

    #[error("kernel error: {0}")]
    Kernel(#[from] KernelError),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

// ── Profiles ────────────────────────────────────────────────────────────────

/// Solid square bar of side `w`.
pub fn square_bar(w: f64) -> ProfileSpec {
    ProfileSpec::rectangular(w, w)
}

/// Square hollow section of side `w` and wall `t`.
pub fn square_tube(w: f64, t: f64) -> ProfileSpec {
    ProfileSpec::rectangular_tube(w, w, t)
}

// ── Geometry ────────────────────────────────────────────────────────────────

/// Volume cut from each member of a right-angle miter of square section `w`.
pub fn right_angle_miter_cutoff(w: f64) -> f64 {
    (w / 2.0) * (w / 2.0) / 2.0 * w
}

/// Total volume of a member's body, summing split halves.
pub fn member_volume(kernel: &dyn GeometryKernel, member: &Member) -> Result<f64, KernelError> {
    member
        .body()
        .handles()
        .iter()
        .try_fold(0.0, |acc, h| Ok(acc + kernel.volume(h)?))
}

/// World-space box around a member's body, from the corners of its local box.
pub fn world_bounds(kernel: &dyn GeometryKernel, member: &Member) -> Result<Aabb, KernelError> {
    let mut out = Aabb::empty();
    for h in member.body().handles() {
        let local = kernel.bounding_box(&h)?;
        if local.is_empty() {
            continue;
        }
        for x in [local.min.x, local.max.x] {
            for y in [local.min.y, local.max.y] {
                for z in [local.min.z, local.max.z] {
                    out.include_point(&member.placement().transform_point(&Point3::new(x, y, z)));
                }
            }
        }
    }
    Ok(out)
}

/// Component of a point by axis index (0 = X, 1 = Y, 2 = Z).
pub fn axis_value(p: &Point3<f64>, axis: usize) -> f64 {
    p.coords[axis]
}
