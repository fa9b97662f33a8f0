use frame_kernel::GeometryKernel;
use profile_sweep::ProfileExtrusionService;

use crate::config::JointConfig;

/// Collaborators for one joint pass, threaded explicitly through every step.
pub struct PassContext<'a> {
    pub kernel: &'a mut dyn GeometryKernel,
    pub sweeper: &'a dyn ProfileExtrusionService,
    pub config: &'a JointConfig,
}

impl<'a> PassContext<'a> {
    pub fn new(
        kernel: &'a mut dyn GeometryKernel,
        sweeper: &'a dyn ProfileExtrusionService,
        config: &'a JointConfig,
    ) -> Self {
        Self {
            kernel,
            sweeper,
            config,
        }
    }
}
