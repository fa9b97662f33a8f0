use frame_kernel::KernelError;
use profile_sweep::SweepError;

/// Errors from joint resolution. None of them escape a pass; each skips one joint.
#[derive(Debug, Clone, thiserror::Error)]
pub enum JointError {
    #[error("missing geometry: {what}")]
    MissingGeometry { what: String },

    #[error("degenerate input: {reason}")]
    DegenerateInput { reason: String },

    #[error("kernel failure: {0}")]
    KernelFailure(#[from] KernelError),

    #[error("profile regeneration failed: {0}")]
    SweepFailure(#[from] SweepError),

    #[error("cannot join: {reason}")]
    NoIntersection { reason: String },

    #[error("cut would consume member {member}")]
    EmptyResult { member: String },

    #[error("invalid request: {reason}")]
    InvalidRequest { reason: String },
}

impl JointError {
    pub(crate) fn degenerate(reason: impl Into<String>) -> Self {
        JointError::DegenerateInput {
            reason: reason.into(),
        }
    }

    pub(crate) fn no_intersection(reason: impl Into<String>) -> Self {
        JointError::NoIntersection {
            reason: reason.into(),
        }
    }
}
