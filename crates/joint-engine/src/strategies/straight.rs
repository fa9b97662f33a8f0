use frame_types::JointType;
use tracing::debug;

use super::{cut_staged, expect_pair, JointStrategy, JointTarget, Staging};
use crate::context::PassContext;
use crate::cutter::CutterPlane;
use crate::error::JointError;
use crate::offset_edges::{edge_intersection, world_offset_edges};
use crate::orientation::stabilized_up;
use crate::reset::{rebuild_half, RegenMode};
use crate::store::MemberStore;

/// Which member of the pair butts against the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Butting {
    First,
    Second,
}

/// Butt joint: the continuous member runs past the corner to the butting
/// member's outer face; the butting member stops at the continuous member's
/// inner face, less the configured gap.
#[derive(Debug, Clone, Copy)]
pub struct StraightJoint {
    pub butting: Butting,
}

impl JointStrategy for StraightJoint {
    fn joint_type(&self) -> JointType {
        match self.butting {
            Butting::First => JointType::Straight,
            Butting::Second => JointType::Straight2,
        }
    }

    fn build(
        &self,
        ctx: &mut PassContext<'_>,
        store: &mut MemberStore,
        target: &JointTarget,
        staging: &mut Staging,
    ) -> Result<(), JointError> {
        let (pair, gap) = expect_pair(target, self.joint_type())?;
        let (butt_id, cont_id) = match self.butting {
            Butting::First => (pair.a, pair.b),
            Butting::Second => (pair.b, pair.a),
        };
        let tol = ctx.config.tolerance;

        let (cont_plane, cont_end, butt_plane, butt_end) = {
            let butt = store.member(butt_id)?;
            let cont = store.member(cont_id)?;
            let butt_edges = world_offset_edges(butt, cont, tol)?;
            let cont_edges = world_offset_edges(cont, butt, tol)?;
            if butt_edges.approximate || cont_edges.approximate {
                return Err(JointError::degenerate("colinear members cannot be butted"));
            }
            let d_butt = butt.world_direction()?;
            let d_cont = cont.world_direction()?;
            let up = stabilized_up(&d_butt, &d_cont, tol);

            let p_cont = edge_intersection(&cont_edges.inner, &butt_edges.outer, tol)?;
            let cont_plane = CutterPlane::new(p_cont, d_butt.cross(&up), &up)?;

            let p_butt = edge_intersection(&butt_edges.inner, &cont_edges.inner, tol)?;
            let butt_plane = CutterPlane::new(p_butt, d_cont.cross(&up), &up)?;
            let butt_far = butt.world_endpoint(butt_edges.corner_end.opposite());
            let toward_far = if butt_plane.signed_distance(&butt_far) >= 0.0 {
                butt_plane.normal
            } else {
                -butt_plane.normal
            };
            let butt_plane = butt_plane.translated(&(toward_far * gap));
            (cont_plane, cont_edges.corner_end, butt_plane, butt_edges.corner_end)
        };

        let rebuilt = rebuild_half(ctx, store, cont_id, cont_end, RegenMode::GeometryAndExtend)?;
        staging.stage(ctx.kernel, cont_id, rebuilt);
        let cont_far = store.member(cont_id)?.world_endpoint(cont_end.opposite());
        cut_staged(ctx, store, staging, cont_id, &cont_plane, &cont_far)?;

        let rebuilt = rebuild_half(ctx, store, butt_id, butt_end, RegenMode::GeometryOnly)?;
        staging.stage(ctx.kernel, butt_id, rebuilt);
        let butt_far = store.member(butt_id)?.world_endpoint(butt_end.opposite());
        cut_staged(ctx, store, staging, butt_id, &butt_plane, &butt_far)?;

        debug!(
            butting = %store.member(butt_id)?.name,
            continuous = %store.member(cont_id)?.name,
            gap,
            "butt joint cut"
        );
        Ok(())
    }
}
