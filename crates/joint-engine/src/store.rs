use frame_kernel::{GeometryKernel, SolidHandle};
use slotmap::SlotMap;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::context::PassContext;
use crate::error::JointError;
use crate::member::{section_request, Member, MemberBody, MemberId, MemberSpec};

/// Owns every member and its current body.
#[derive(Debug, Default)]
pub struct MemberStore {
    members: SlotMap<MemberId, Member>,
}

impl MemberStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a member and sweep its initial body.
    #[instrument(skip(self, ctx, spec), fields(name = %spec.name))]
    pub fn add_member(
        &mut self,
        ctx: &mut PassContext<'_>,
        spec: MemberSpec,
    ) -> Result<MemberId, JointError> {
        if spec.axis.length() <= ctx.config.tolerance {
            return Err(JointError::degenerate(format!(
                "member {} has axis length {}",
                spec.name,
                spec.axis.length()
            )));
        }
        let request = section_request(
            spec.axis,
            spec.profile.clone(),
            spec.offset,
            spec.local_up,
            spec.rotation,
        );
        let body = ctx.sweeper.regenerate_member_body(ctx.kernel, &request)?;
        let member = Member::from_spec(spec, body);
        info!(tag = %member.tag, "member created");
        Ok(self.members.insert(member))
    }

    /// Remove a member and release its body.
    pub fn remove_member(&mut self, kernel: &mut dyn GeometryKernel, id: MemberId) -> Option<Member> {
        let member = self.members.remove(id)?;
        for h in member.slot.body.handles() {
            kernel.release(h);
        }
        Some(member)
    }

    pub fn member(&self, id: MemberId) -> Result<&Member, JointError> {
        self.members.get(id).ok_or_else(|| JointError::MissingGeometry {
            what: format!("member {:?}", id),
        })
    }

    pub fn contains(&self, id: MemberId) -> bool {
        self.members.contains_key(id)
    }

    pub fn find_by_tag(&self, tag: Uuid) -> Option<MemberId> {
        self.members
            .iter()
            .find(|(_, m)| m.tag == tag)
            .map(|(id, _)| id)
    }

    pub fn ids(&self) -> Vec<MemberId> {
        self.members.keys().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (MemberId, &Member)> {
        self.members.iter()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Install a new body, bump the generation, and release the previous handles.
    ///
    /// The new body must already exist; handles shared with the old body are kept.
    pub fn replace_body(
        &mut self,
        kernel: &mut dyn GeometryKernel,
        id: MemberId,
        body: MemberBody,
    ) -> Result<(), JointError> {
        let member = self.members.get_mut(id).ok_or_else(|| JointError::MissingGeometry {
            what: format!("member {:?}", id),
        })?;
        let old = std::mem::replace(&mut member.slot.body, body);
        member.slot.generation += 1;
        let keep = body.handles();
        for h in old.handles() {
            if !keep.contains(&h) {
                kernel.release(h);
            }
        }
        debug!(member = %member.name, generation = member.slot.generation, "body replaced");
        Ok(())
    }

    /// The member's body as one solid, reuniting split halves first.
    pub fn full_body(
        &mut self,
        kernel: &mut dyn GeometryKernel,
        id: MemberId,
    ) -> Result<SolidHandle, JointError> {
        match *self.member(id)?.body() {
            MemberBody::Full(h) => Ok(h),
            MemberBody::Split { start, end } => {
                let whole = kernel.boolean_union(&start, &end)?;
                self.replace_body(kernel, id, MemberBody::Full(whole))?;
                Ok(whole)
            }
        }
    }

    /// Reunite every member left split. Returns how many were reunited.
    pub fn settle(&mut self, kernel: &mut dyn GeometryKernel) -> usize {
        let split: Vec<MemberId> = self
            .members
            .iter()
            .filter(|(_, m)| m.body().is_split())
            .map(|(id, _)| id)
            .collect();
        let mut settled = 0;
        for id in split {
            match self.full_body(kernel, id) {
                Ok(_) => settled += 1,
                Err(e) => warn!(error = %e, "could not reunite split member"),
            }
        }
        settled
    }

    /// Turn a member's section about its axis by `angle` radians and rebuild its body.
    ///
    /// Joints on the member are discarded. On failure the member is unchanged.
    pub fn rotate_member(
        &mut self,
        ctx: &mut PassContext<'_>,
        id: MemberId,
        angle: f64,
    ) -> Result<(), JointError> {
        let mut rotated = self.member(id)?.clone();
        rotated.set_rotation(rotated.rotation() + angle);
        let body = ctx
            .sweeper
            .regenerate_member_body(ctx.kernel, &rotated.sweep_request(None))?;
        self.replace_body(ctx.kernel, id, MemberBody::Full(body))?;
        if let Some(member) = self.members.get_mut(id) {
            member.set_rotation(rotated.rotation());
        }
        info!(member = %rotated.name, rotation = rotated.rotation(), "member rotated");
        Ok(())
    }
}
