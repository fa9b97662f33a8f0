use frame_types::{ProfileSpec, Segment};
use nalgebra::{Vector2, Vector3};

/// Everything needed to rebuild a member body from its construction axis.
///
/// All geometry is in the member's local space.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepRequest {
    /// Axis to sweep along. May be an extended copy of the construction axis.
    pub segment: Segment,
    /// Cross-section to sweep.
    pub profile: ProfileSpec,
    /// Planar offset of the section center from the axis, in section X/Y.
    pub offset: Vector2<f64>,
    /// Reference for section Y before rotation.
    pub local_up: Vector3<f64>,
    /// Rotation of the section about the axis, radians.
    pub rotation: f64,
}

impl SweepRequest {
    pub fn new(segment: Segment, profile: ProfileSpec) -> Self {
        Self {
            segment,
            profile,
            offset: Vector2::zeros(),
            local_up: Vector3::z(),
            rotation: 0.0,
        }
    }
}

/// Errors from profile sweeping.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SweepError {
    #[error("kernel error: {0}")]
    Kernel(#[from] frame_kernel::KernelError),

    #[error("sweep axis has zero length")]
    DegenerateAxis,

    #[error("invalid section: {reason}")]
    InvalidSection { reason: String },

    #[error("section triangulation failed: {reason}")]
    Triangulation { reason: String },
}
