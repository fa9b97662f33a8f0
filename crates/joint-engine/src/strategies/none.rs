use frame_types::JointType;
use nalgebra::Point3;
use tracing::debug;

use super::{cut_staged, expect_pair, JointStrategy, JointTarget, Staging};
use crate::context::PassContext;
use crate::cutter::CutterPlane;
use crate::error::JointError;
use crate::member::MemberId;
use crate::offset_edges::nearest_ends;
use crate::orientation::stabilized_up;
use crate::reset::{rebuild_half, RegenMode};
use crate::store::MemberStore;

/// Removes any joint: both corner halves go back to a plain, flush end.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoneJoint;

impl NoneJoint {
    fn flatten(
        &self,
        ctx: &mut PassContext<'_>,
        store: &mut MemberStore,
        staging: &mut Staging,
        id: MemberId,
        other: MemberId,
    ) -> Result<(), JointError> {
        let tol = ctx.config.tolerance;
        let (corner_end, meeting) = {
            let m = store.member(id)?;
            let o = store.member(other)?;
            let (corner_end, _) = nearest_ends(m, o);
            let meeting = m
                .world_axis()
                .line()
                .intersect(&o.world_axis().line(), tol)
                .unwrap_or_else(|| m.world_endpoint(corner_end));
            (corner_end, meeting)
        };

        let rebuilt = rebuild_half(ctx, store, id, corner_end, RegenMode::GeometryOnly)?;
        staging.stage(ctx.kernel, id, rebuilt);

        let m = store.member(id)?;
        let o = store.member(other)?;
        let corner = m.world_endpoint(corner_end);
        let far = m.world_endpoint(corner_end.opposite());
        let away = (far - corner)
            .try_normalize(tol)
            .ok_or_else(|| JointError::degenerate(format!("member {} has a zero-length axis", m.name)))?;
        let up = stabilized_up(&m.world_direction()?, &o.world_direction()?, tol);
        let origin: Point3<f64> = meeting - away * ctx.config.flush_cut_epsilon;
        let plane = CutterPlane::new(origin, away, &up)?;
        cut_staged(ctx, store, staging, id, &plane, &far)?;
        debug!(member = %store.member(id)?.name, end = ?corner_end, "joint removed");
        Ok(())
    }
}

impl JointStrategy for NoneJoint {
    fn joint_type(&self) -> JointType {
        JointType::None
    }

    fn build(
        &self,
        ctx: &mut PassContext<'_>,
        store: &mut MemberStore,
        target: &JointTarget,
        staging: &mut Staging,
    ) -> Result<(), JointError> {
        let (pair, _) = expect_pair(target, JointType::None)?;
        self.flatten(ctx, store, staging, pair.a, pair.b)?;
        self.flatten(ctx, store, staging, pair.b, pair.a)
    }
}
