//! One algorithm per joint kind.
//!
//! Strategies never install bodies themselves. They stage a new body for each
//! member they touch; the orchestrator commits the staging only when the whole
//! joint succeeded, so a failure leaves every member as it was.

mod miter;
mod none;
mod straight;
mod tee;
mod trim;

pub use miter::MiterJoint;
pub use none::NoneJoint;
pub use straight::{Butting, StraightJoint};
pub use tee::TeeJoint;
pub use trim::TrimJoint;

use frame_kernel::{GeometryKernel, SolidHandle};
use frame_types::JointType;
use nalgebra::{Point3, Vector3};

use crate::connectivity::ConnectionPair;
use crate::context::PassContext;
use crate::cutter::{cut_at_plane, CutterPlane};
use crate::error::JointError;
use crate::member::{MemberBody, MemberId};
use crate::store::MemberStore;

/// User-picked planar face for a Trim joint, in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CuttingFace {
    pub origin: Point3<f64>,
    pub normal: Vector3<f64>,
}

/// Member and face selected for a Trim joint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrimSelection {
    pub member: MemberId,
    pub face: CuttingFace,
}

/// What a strategy is applied to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JointTarget {
    Pair { pair: ConnectionPair, gap: f64 },
    Trim(TrimSelection),
}

impl JointTarget {
    pub fn members(&self) -> Vec<MemberId> {
        match self {
            JointTarget::Pair { pair, .. } => vec![pair.a, pair.b],
            JointTarget::Trim(sel) => vec![sel.member],
        }
    }
}

/// New bodies produced by one joint, waiting to be installed together.
#[derive(Debug, Default)]
pub struct Staging {
    bodies: Vec<(MemberId, SolidHandle)>,
}

impl Staging {
    /// Stage `body` for `id`, releasing any body staged for it earlier.
    pub fn stage(&mut self, kernel: &mut dyn GeometryKernel, id: MemberId, body: SolidHandle) {
        match self.bodies.iter_mut().find(|(m, _)| *m == id) {
            Some(slot) => {
                kernel.release(slot.1);
                slot.1 = body;
            }
            None => self.bodies.push((id, body)),
        }
    }

    pub fn get(&self, id: MemberId) -> Option<SolidHandle> {
        self.bodies.iter().find(|(m, _)| *m == id).map(|(_, h)| *h)
    }

    pub fn members(&self) -> Vec<MemberId> {
        self.bodies.iter().map(|(m, _)| *m).collect()
    }

    /// Install every staged body. Returns the members touched.
    pub fn commit(
        self,
        kernel: &mut dyn GeometryKernel,
        store: &mut MemberStore,
    ) -> Result<Vec<MemberId>, JointError> {
        if let Some((missing, _)) = self.bodies.iter().find(|(m, _)| !store.contains(*m)) {
            let what = format!("member {:?}", missing);
            self.abort(kernel);
            return Err(JointError::MissingGeometry { what });
        }
        let mut touched = Vec::with_capacity(self.bodies.len());
        for (id, body) in self.bodies {
            store.replace_body(kernel, id, MemberBody::Full(body))?;
            touched.push(id);
        }
        Ok(touched)
    }

    /// Release every staged body.
    pub fn abort(self, kernel: &mut dyn GeometryKernel) {
        for (_, h) in self.bodies {
            kernel.release(h);
        }
    }
}

/// A joint algorithm.
pub trait JointStrategy: Sync {
    fn joint_type(&self) -> JointType;

    /// Stage the new body of every member the joint touches.
    fn build(
        &self,
        ctx: &mut PassContext<'_>,
        store: &mut MemberStore,
        target: &JointTarget,
        staging: &mut Staging,
    ) -> Result<(), JointError>;
}

static NONE: NoneJoint = NoneJoint;
static MITER: MiterJoint = MiterJoint;
static STRAIGHT: StraightJoint = StraightJoint {
    butting: Butting::First,
};
static STRAIGHT2: StraightJoint = StraightJoint {
    butting: Butting::Second,
};
static TEE: TeeJoint = TeeJoint;
static TRIM: TrimJoint = TrimJoint;

/// The strategy implementing `joint_type`.
pub fn strategy_for(joint_type: JointType) -> &'static dyn JointStrategy {
    match joint_type {
        JointType::None => &NONE,
        JointType::Miter => &MITER,
        JointType::Straight => &STRAIGHT,
        JointType::Straight2 => &STRAIGHT2,
        JointType::T => &TEE,
        JointType::Trim => &TRIM,
    }
}

fn expect_pair(target: &JointTarget, joint: JointType) -> Result<(ConnectionPair, f64), JointError> {
    match target {
        JointTarget::Pair { pair, gap } => Ok((*pair, *gap)),
        JointTarget::Trim(_) => Err(JointError::InvalidRequest {
            reason: format!("{joint} joint needs a member pair"),
        }),
    }
}

/// Cut the member's staged body with a world-space plane, keeping the side of `far`.
pub(crate) fn cut_staged(
    ctx: &mut PassContext<'_>,
    store: &MemberStore,
    staging: &mut Staging,
    id: MemberId,
    plane: &CutterPlane,
    far: &Point3<f64>,
) -> Result<(), JointError> {
    let member = store.member(id)?;
    let body = staging.get(id).ok_or_else(|| JointError::MissingGeometry {
        what: format!("staged body for {}", member.name),
    })?;
    let local_plane = plane.to_local(member.placement());
    let local_far = member.placement().inverse_transform_point(far);
    let reach = ctx
        .config
        .cutter_reach(ctx.kernel.bounding_box(&body)?.diagonal());
    let cut = cut_at_plane(ctx.kernel, &body, &local_plane, &local_far, reach)?;
    stage_checked(ctx, staging, id, cut, &member.name)
}

/// Stage `body` unless it has no material left.
pub(crate) fn stage_checked(
    ctx: &mut PassContext<'_>,
    staging: &mut Staging,
    id: MemberId,
    body: SolidHandle,
    name: &str,
) -> Result<(), JointError> {
    let empty = match (ctx.kernel.bounding_box(&body), ctx.kernel.volume(&body)) {
        (Ok(bb), Ok(v)) => bb.is_empty() || v <= ctx.config.tolerance.powi(3),
        (Err(e), _) | (_, Err(e)) => {
            ctx.kernel.release(body);
            return Err(e.into());
        }
    };
    if empty {
        ctx.kernel.release(body);
        return Err(JointError::EmptyResult {
            member: name.to_string(),
        });
    }
    staging.stage(ctx.kernel, id, body);
    Ok(())
}
