//! Regeneration of member bodies from their construction axis.

use frame_kernel::{GeometryKernel, SolidHandle};
use frame_types::AxisEnd;
use tracing::debug;

use crate::context::PassContext;
use crate::error::JointError;
use crate::member::{MemberBody, MemberId};
use crate::splitter::split_solid;
use crate::store::MemberStore;

/// How a body is regenerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegenMode {
    /// Sweep the construction axis as is.
    GeometryOnly,
    /// Sweep the axis extended by the configured margin past each end.
    GeometryAndExtend,
}

/// Temporary solids released together when a step finishes, successfully or not.
#[derive(Debug, Default)]
pub(crate) struct Scratch {
    handles: Vec<SolidHandle>,
}

impl Scratch {
    pub fn keep(&mut self, h: SolidHandle) -> SolidHandle {
        self.handles.push(h);
        h
    }

    pub fn release(self, kernel: &mut dyn GeometryKernel) {
        for h in self.handles {
            kernel.release(h);
        }
    }
}

fn regenerate(
    ctx: &mut PassContext<'_>,
    store: &MemberStore,
    id: MemberId,
    mode: RegenMode,
) -> Result<SolidHandle, JointError> {
    let member = store.member(id)?;
    let extend = match mode {
        RegenMode::GeometryOnly => None,
        RegenMode::GeometryAndExtend => Some(ctx.config.extension_margin),
    };
    Ok(ctx
        .sweeper
        .regenerate_member_body(ctx.kernel, &member.sweep_request(extend))?)
}

/// Rebuild the `corner` half of a member and join it to the untouched other half.
///
/// Returns the new full body without installing it; the member keeps its
/// current body and every temporary is released.
pub fn rebuild_half(
    ctx: &mut PassContext<'_>,
    store: &mut MemberStore,
    id: MemberId,
    corner: AxisEnd,
    mode: RegenMode,
) -> Result<SolidHandle, JointError> {
    let current = store.full_body(ctx.kernel, id)?;
    let mut scratch = Scratch::default();
    let result = rebuild_half_with(ctx, store, id, current, corner, mode, &mut scratch);
    scratch.release(ctx.kernel);
    result
}

fn rebuild_half_with(
    ctx: &mut PassContext<'_>,
    store: &MemberStore,
    id: MemberId,
    current: SolidHandle,
    corner: AxisEnd,
    mode: RegenMode,
    scratch: &mut Scratch,
) -> Result<SolidHandle, JointError> {
    let member = store.member(id)?;
    let up = *member.local_up();

    let old_halves = split_solid(ctx.kernel, &current, member, &up, ctx.config)?;
    scratch.keep(old_halves.start);
    scratch.keep(old_halves.end);
    let preserved = old_halves.half(corner.opposite());

    let fresh = scratch.keep(regenerate(ctx, store, id, mode)?);
    let fresh_halves = split_solid(ctx.kernel, &fresh, member, &up, ctx.config)?;
    scratch.keep(fresh_halves.start);
    scratch.keep(fresh_halves.end);

    let rebuilt = ctx
        .kernel
        .boolean_union(&fresh_halves.half(corner), &preserved)?;
    debug!(member = %member.name, ?corner, ?mode, "half rebuilt");
    Ok(rebuilt)
}

/// Rebuild one half of a member for a new joint and install the result.
///
/// On failure the member keeps its prior body.
pub fn reset_half_for_joint(
    ctx: &mut PassContext<'_>,
    store: &mut MemberStore,
    id: MemberId,
    corner: AxisEnd,
    mode: RegenMode,
) -> Result<(), JointError> {
    let rebuilt = rebuild_half(ctx, store, id, corner, mode)?;
    store.replace_body(ctx.kernel, id, MemberBody::Full(rebuilt))
}

fn reset_component(
    ctx: &mut PassContext<'_>,
    store: &mut MemberStore,
    id: MemberId,
    mode: RegenMode,
) -> Result<(), JointError> {
    let body = regenerate(ctx, store, id, mode)?;
    store.replace_body(ctx.kernel, id, MemberBody::Full(body))
}

/// Discard every joint on a member and rebuild it from its axis.
pub fn reset_component_geometry_only(
    ctx: &mut PassContext<'_>,
    store: &mut MemberStore,
    id: MemberId,
) -> Result<(), JointError> {
    reset_component(ctx, store, id, RegenMode::GeometryOnly)
}

/// Discard every joint on a member and rebuild it with both ends extended.
pub fn reset_component_geometry_and_extend(
    ctx: &mut PassContext<'_>,
    store: &mut MemberStore,
    id: MemberId,
) -> Result<(), JointError> {
    reset_component(ctx, store, id, RegenMode::GeometryAndExtend)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Bench;
    use approx::assert_relative_eq;

    #[test]
    fn rebuild_half_leaves_the_member_alone() {
        let mut b = Bench::new();
        let id = b.bar("a", [0.0, 0.0, 0.0], [1.0, 0.0, 0.0], 0.1);
        let before = *b.store.member(id).unwrap().body();
        let (mut ctx, store) = b.ctx();
        let rebuilt = rebuild_half(&mut ctx, store, id, AxisEnd::End, RegenMode::GeometryAndExtend).unwrap();
        assert_eq!(*store.member(id).unwrap().body(), before);
        assert_eq!(store.member(id).unwrap().generation(), 0);
        assert_eq!(ctx.kernel.live_solids(), 2);
        ctx.kernel.release(rebuilt);
    }

    #[test]
    fn extension_grows_only_the_corner_half() {
        let mut b = Bench::new();
        b.config.extension_margin = 0.5;
        let id = b.bar("a", [0.0, 0.0, 0.0], [1.0, 0.0, 0.0], 0.1);
        {
            let (mut ctx, store) = b.ctx();
            reset_half_for_joint(&mut ctx, store, id, AxisEnd::End, RegenMode::GeometryAndExtend).unwrap();
        }
        assert_relative_eq!(b.volume(id), 0.01 * 1.5, epsilon = 1e-12);
        let body = b.store.member(id).unwrap().body().handles()[0];
        let bb = b.kernel.bounding_box(&body).unwrap();
        assert_relative_eq!(bb.min.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(bb.max.x, 1.5, epsilon = 1e-9);
        assert_eq!(b.store.member(id).unwrap().generation(), 1);
        assert_eq!(b.kernel.live_solids(), 1);
    }

    #[test]
    fn repeated_resets_are_identical() {
        let mut b = Bench::new();
        let id = b.bar("a", [0.0, 0.0, 0.0], [0.0, 1.0, 0.0], 0.1);
        let mut seen = Vec::new();
        for _ in 0..2 {
            let (mut ctx, store) = b.ctx();
            reset_half_for_joint(&mut ctx, store, id, AxisEnd::Start, RegenMode::GeometryOnly).unwrap();
            let body = store.member(id).unwrap().body().handles()[0];
            seen.push((
                ctx.kernel.volume(&body).unwrap(),
                ctx.kernel.bounding_box(&body).unwrap(),
            ));
        }
        assert_relative_eq!(seen[0].0, seen[1].0, epsilon = 1e-12);
        assert_relative_eq!(seen[0].0, 0.01, epsilon = 1e-12);
        assert_relative_eq!(seen[0].1.min, seen[1].1.min, epsilon = 1e-12);
        assert_relative_eq!(seen[0].1.max, seen[1].1.max, epsilon = 1e-12);
    }

    #[test]
    fn component_reset_discards_extension() {
        let mut b = Bench::new();
        b.config.extension_margin = 0.25;
        let id = b.bar("a", [0.0, 0.0, 0.0], [1.0, 0.0, 0.0], 0.1);
        {
            let (mut ctx, store) = b.ctx();
            reset_component_geometry_and_extend(&mut ctx, store, id).unwrap();
        }
        assert_relative_eq!(b.volume(id), 0.01 * 1.5, epsilon = 1e-12);
        {
            let (mut ctx, store) = b.ctx();
            reset_component_geometry_only(&mut ctx, store, id).unwrap();
        }
        assert_relative_eq!(b.volume(id), 0.01, epsilon = 1e-12);
        assert_eq!(b.kernel.live_solids(), 1);
    }

    #[test]
    fn failed_reset_keeps_the_prior_body() {
        let mut b = Bench::new();
        let id = b.bar("a", [0.0, 0.0, 0.0], [1.0, 0.0, 0.0], 0.1);
        let other = b.bar("b", [0.0, 1.0, 0.0], [1.0, 1.0, 0.0], 0.1);
        b.store.remove_member(&mut b.kernel, other);
        let before = *b.store.member(id).unwrap().body();
        let (mut ctx, store) = b.ctx();
        assert!(reset_half_for_joint(&mut ctx, store, other, AxisEnd::End, RegenMode::GeometryOnly).is_err());
        assert_eq!(*store.member(id).unwrap().body(), before);
        assert_eq!(ctx.kernel.live_solids(), 1);
    }
}
