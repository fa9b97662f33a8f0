//! Bisection of member bodies at the axis midpoint.

use frame_kernel::{GeometryKernel, SolidHandle};
use frame_types::AxisEnd;
use nalgebra::Vector3;
use tracing::{debug, warn};

use crate::config::JointConfig;
use crate::context::PassContext;
use crate::cutter::{build_cutter, determine_extrusion_direction, CutterPlane};
use crate::error::JointError;
use crate::member::{Member, MemberBody, MemberId};
use crate::store::MemberStore;

/// The two halves of a bisected body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HalfBodies {
    pub start: SolidHandle,
    pub end: SolidHandle,
}

impl HalfBodies {
    pub fn half(&self, end: AxisEnd) -> SolidHandle {
        match end {
            AxisEnd::Start => self.start,
            AxisEnd::End => self.end,
        }
    }
}

/// Bisect `solid` (in the member's local space) at the member's axis midpoint.
///
/// The cutting plane passes through the section center with the axis as its
/// normal. Returns fresh halves; `solid` is untouched and no temporaries remain.
pub fn split_solid(
    kernel: &mut dyn GeometryKernel,
    solid: &SolidHandle,
    member: &Member,
    local_up: &Vector3<f64>,
    config: &JointConfig,
) -> Result<HalfBodies, JointError> {
    let axis = member.axis();
    let dir = axis
        .direction()
        .ok_or_else(|| JointError::degenerate(format!("member {} has a zero-length axis", member.name)))?;
    let frame = member.section_frame()?;
    let mid = axis.midpoint() + frame.center_shift(axis);
    let plane = CutterPlane::new(mid, dir, local_up)?;
    let reach = config.cutter_reach(kernel.bounding_box(solid)?.diagonal());

    let toward_end = determine_extrusion_direction(&axis.end, &axis.start, &dir, reach, 0.0);
    let toward_start = determine_extrusion_direction(&axis.start, &axis.end, &dir, reach, 0.0);

    let end_cutter = build_cutter(kernel, &plane, reach, &toward_end)?;
    let start_cutter = match build_cutter(kernel, &plane, reach, &toward_start) {
        Ok(c) => c,
        Err(e) => {
            kernel.release(end_cutter);
            return Err(e);
        }
    };

    let end_half = kernel.boolean_intersect(solid, &end_cutter);
    let start_half = kernel.boolean_intersect(solid, &start_cutter);
    kernel.release(end_cutter);
    kernel.release(start_cutter);
    match (start_half, end_half) {
        (Ok(start), Ok(end)) => Ok(HalfBodies { start, end }),
        (Ok(h), Err(e)) | (Err(e), Ok(h)) => {
            kernel.release(h);
            Err(e.into())
        }
        (Err(e), Err(_)) => Err(e.into()),
    }
}

/// Split a member's body into start/end halves and persist them as its `Split` state.
///
/// Existing halves are reunited first. Returns `None` and leaves the member
/// unchanged when any step fails.
pub fn split_body_at_midpoint(
    ctx: &mut PassContext<'_>,
    store: &mut MemberStore,
    id: MemberId,
    local_up: &Vector3<f64>,
) -> Option<HalfBodies> {
    let attempt = split_and_store(ctx, store, id, local_up);
    match attempt {
        Ok(halves) => {
            debug!(?id, "member split at midpoint");
            Some(halves)
        }
        Err(e) => {
            warn!(?id, error = %e, "split failed; member skipped");
            None
        }
    }
}

fn split_and_store(
    ctx: &mut PassContext<'_>,
    store: &mut MemberStore,
    id: MemberId,
    local_up: &Vector3<f64>,
) -> Result<HalfBodies, JointError> {
    let whole = store.full_body(ctx.kernel, id)?;
    let halves = split_solid(ctx.kernel, &whole, store.member(id)?, local_up, ctx.config)?;
    store.replace_body(
        ctx.kernel,
        id,
        MemberBody::Split {
            start: halves.start,
            end: halves.end,
        },
    )?;
    Ok(halves)
}
