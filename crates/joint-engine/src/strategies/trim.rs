use frame_types::{AxisEnd, JointType};
use tracing::debug;

use super::{cut_staged, JointStrategy, JointTarget, Staging, TrimSelection};
use crate::context::PassContext;
use crate::cutter::CutterPlane;
use crate::error::JointError;
use crate::reset::{rebuild_half, RegenMode};
use crate::store::MemberStore;

/// One member cut against a user-selected planar face.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrimJoint;

impl JointStrategy for TrimJoint {
    fn joint_type(&self) -> JointType {
        JointType::Trim
    }

    fn build(
        &self,
        ctx: &mut PassContext<'_>,
        store: &mut MemberStore,
        target: &JointTarget,
        staging: &mut Staging,
    ) -> Result<(), JointError> {
        let JointTarget::Trim(TrimSelection { member: id, face }) = *target else {
            return Err(JointError::InvalidRequest {
                reason: "trim joint needs a member and a face".into(),
            });
        };
        let tol = ctx.config.tolerance;

        let (corner_end, plane, far) = {
            let m = store.member(id)?;
            let world_up = m.placement().transform_vector(m.local_up());
            let face_plane = CutterPlane::new(face.origin, face.normal, &world_up)?;
            if face_plane.normal.dot(&m.world_direction()?).abs() < tol {
                return Err(JointError::degenerate(format!(
                    "trim face is parallel to member {}",
                    m.name
                )));
            }
            let d_start = face_plane.signed_distance(&m.world_endpoint(AxisEnd::Start));
            let d_end = face_plane.signed_distance(&m.world_endpoint(AxisEnd::End));
            let corner_end = if d_start.abs() <= d_end.abs() {
                AxisEnd::Start
            } else {
                AxisEnd::End
            };
            let d_far = match corner_end {
                AxisEnd::Start => d_end,
                AxisEnd::End => d_start,
            };
            if d_far.abs() < tol {
                return Err(JointError::degenerate(format!(
                    "member {} lies in the trim face",
                    m.name
                )));
            }
            let d_corner = match corner_end {
                AxisEnd::Start => d_start,
                AxisEnd::End => d_end,
            };
            let corner = m.world_endpoint(corner_end);
            let plane = CutterPlane {
                origin: corner - face_plane.normal * d_corner,
                ..face_plane
            };
            (corner_end, plane, m.world_endpoint(corner_end.opposite()))
        };

        let rebuilt = rebuild_half(ctx, store, id, corner_end, RegenMode::GeometryAndExtend)?;
        staging.stage(ctx.kernel, id, rebuilt);
        cut_staged(ctx, store, staging, id, &plane, &far)?;
        debug!(member = %store.member(id)?.name, end = ?corner_end, "trimmed to face");
        Ok(())
    }
}
