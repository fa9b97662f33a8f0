use frame_kernel::{CellKernel, GeometryKernel};
use frame_types::{ProfileSpec, Segment};
use nalgebra::Point3;
use profile_sweep::SectionSweeper;

use crate::config::JointConfig;
use crate::context::PassContext;
use crate::member::{MemberId, MemberSpec};
use crate::store::MemberStore;

/// Cell kernel, sweeper, and store wired together for unit tests.
pub(crate) struct Bench {
    pub kernel: CellKernel,
    pub sweeper: SectionSweeper,
    pub config: JointConfig,
    pub store: MemberStore,
}

impl Bench {
    pub fn new() -> Self {
        Self {
            kernel: CellKernel::new(),
            sweeper: SectionSweeper::default(),
            config: JointConfig::default(),
            store: MemberStore::new(),
        }
    }

    pub fn ctx(&mut self) -> (PassContext<'_>, &mut MemberStore) {
        (
            PassContext::new(&mut self.kernel, &self.sweeper, &self.config),
            &mut self.store,
        )
    }

    /// Square bar of side `w` between two world points.
    pub fn bar(&mut self, name: &str, start: [f64; 3], end: [f64; 3], w: f64) -> MemberId {
        let axis = Segment::new(Point3::from(start), Point3::from(end));
        let spec = MemberSpec::new(name, axis, ProfileSpec::rectangular(w, w));
        let (mut ctx, store) = self.ctx();
        store.add_member(&mut ctx, spec).unwrap()
    }

    pub fn volume(&self, id: MemberId) -> f64 {
        self.store
            .member(id)
            .unwrap()
            .body()
            .handles()
            .iter()
            .map(|h| self.kernel.volume(h).unwrap())
            .sum()
    }
}
