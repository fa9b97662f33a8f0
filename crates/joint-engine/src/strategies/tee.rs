use frame_kernel::SolidHandle;
use frame_types::{AxisEnd, JointType};
use tracing::debug;

use super::{cut_staged, expect_pair, stage_checked, JointStrategy, JointTarget, Staging};
use crate::connectivity::Connection;
use crate::context::PassContext;
use crate::cutter::CutterPlane;
use crate::error::JointError;
use crate::member::MemberId;
use crate::orientation::stabilized_up;
use crate::reset::{rebuild_half, RegenMode, Scratch};
use crate::store::MemberStore;

/// A branch ending on the side of a through member.
///
/// The branch is extended, cut on the plane through the junction holding the
/// through axis, then shaped by subtracting the through member's solid
/// envelope. The through member is rebuilt plain on the half holding the
/// junction.
#[derive(Debug, Clone, Copy, Default)]
pub struct TeeJoint;

impl JointStrategy for TeeJoint {
    fn joint_type(&self) -> JointType {
        JointType::T
    }

    fn build(
        &self,
        ctx: &mut PassContext<'_>,
        store: &mut MemberStore,
        target: &JointTarget,
        staging: &mut Staging,
    ) -> Result<(), JointError> {
        let (pair, _) = expect_pair(target, JointType::T)?;
        let Connection::TJunction {
            through,
            branch,
            branch_end,
            point,
        } = pair.connection
        else {
            return Err(JointError::InvalidRequest {
                reason: "T joint needs a branch ending inside the through member".into(),
            });
        };
        let tol = ctx.config.tolerance;

        let (through_half, plane, branch_far) = {
            let t = store.member(through)?;
            let b = store.member(branch)?;
            let d_through = t.world_direction()?;
            let up = stabilized_up(&d_through, &b.world_direction()?, tol);
            let half = if t.world_axis().parameter_of(&point) < 0.5 {
                AxisEnd::Start
            } else {
                AxisEnd::End
            };
            let plane = CutterPlane::new(point, d_through.cross(&up), &up)?;
            (half, plane, b.world_endpoint(branch_end.opposite()))
        };

        let rebuilt = rebuild_half(ctx, store, through, through_half, RegenMode::GeometryOnly)?;
        staging.stage(ctx.kernel, through, rebuilt);

        let rebuilt = rebuild_half(ctx, store, branch, branch_end, RegenMode::GeometryAndExtend)?;
        staging.stage(ctx.kernel, branch, rebuilt);
        cut_staged(ctx, store, staging, branch, &plane, &branch_far)?;

        let mut scratch = Scratch::default();
        let shaped = subtract_envelope(ctx, store, staging, through, branch, &mut scratch);
        scratch.release(ctx.kernel);
        let name = store.member(branch)?.name.clone();
        stage_checked(ctx, staging, branch, shaped?, &name)?;

        debug!(
            through = %store.member(through)?.name,
            branch = %name,
            "tee joint cut"
        );
        Ok(())
    }
}

/// The staged branch body minus the through member's solid envelope, in branch space.
///
/// The whole envelope is used rather than the junction half so a junction
/// at the through member's midpoint is still fully cleared.
fn subtract_envelope(
    ctx: &mut PassContext<'_>,
    store: &MemberStore,
    staging: &Staging,
    through: MemberId,
    branch: MemberId,
    scratch: &mut Scratch,
) -> Result<SolidHandle, JointError> {
    let t = store.member(through)?;
    let b = store.member(branch)?;
    let branch_body = staging.get(branch).ok_or_else(|| JointError::MissingGeometry {
        what: format!("staged body for {}", b.name),
    })?;

    let envelope = scratch.keep(
        ctx.sweeper
            .regenerate_member_body(ctx.kernel, &t.envelope_request())?,
    );
    let to_branch = b.placement().inverse() * t.placement();
    let tool = scratch.keep(ctx.kernel.transform_solid(&envelope, &to_branch)?);
    Ok(ctx.kernel.boolean_subtract(&branch_body, &tool)?)
}
