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

/// Both members cut on the bisecting plane of the corner.
///
/// The plane contains the line through the inner-edge and outer-edge
/// intersections and the common up vector.
#[derive(Debug, Clone, Copy, Default)]
pub struct MiterJoint;

impl JointStrategy for MiterJoint {
    fn joint_type(&self) -> JointType {
        JointType::Miter
    }

    fn build(
        &self,
        ctx: &mut PassContext<'_>,
        store: &mut MemberStore,
        target: &JointTarget,
        staging: &mut Staging,
    ) -> Result<(), JointError> {
        let (pair, _) = expect_pair(target, JointType::Miter)?;
        let tol = ctx.config.tolerance;

        let (plane, corners) = {
            let a = store.member(pair.a)?;
            let b = store.member(pair.b)?;
            let ea = world_offset_edges(a, b, tol)?;
            let eb = world_offset_edges(b, a, tol)?;
            if ea.approximate || eb.approximate {
                return Err(JointError::degenerate("colinear members cannot be mitered"));
            }
            let up = stabilized_up(&a.world_direction()?, &b.world_direction()?, tol);
            let p_in = edge_intersection(&ea.inner, &eb.inner, tol)?;
            let p_out = edge_intersection(&ea.outer, &eb.outer, tol)?;
            let across = p_out - p_in;
            if across.norm() < tol {
                return Err(JointError::degenerate("inner and outer corners coincide"));
            }
            let origin = nalgebra::center(&p_in, &p_out);
            let plane = CutterPlane::new(origin, across.cross(&up), &up)?;
            (plane, [(pair.a, ea.corner_end), (pair.b, eb.corner_end)])
        };

        for (id, corner_end) in corners {
            let rebuilt = rebuild_half(ctx, store, id, corner_end, RegenMode::GeometryOnly)?;
            staging.stage(ctx.kernel, id, rebuilt);
            let far = store.member(id)?.world_endpoint(corner_end.opposite());
            cut_staged(ctx, store, staging, id, &plane, &far)?;
        }
        debug!(origin = ?plane.origin, normal = ?plane.normal, "miter cut");
        Ok(())
    }
}
