use frame_kernel::SolidHandle;
use frame_types::{AxisEnd, ProfileSpec, Segment};
use nalgebra::{Isometry3, Point3, Vector2, Vector3};
use profile_sweep::{SectionFrame, SweepRequest};
use slotmap::new_key_type;
use uuid::Uuid;

use crate::error::JointError;

new_key_type! {
    /// In-session member identity.
    pub struct MemberId;
}

/// Current solid of a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberBody {
    Full(SolidHandle),
    /// Transient bisected state between a split and the next reunion.
    Split {
        start: SolidHandle,
        end: SolidHandle,
    },
}

impl MemberBody {
    pub fn handles(&self) -> Vec<SolidHandle> {
        match *self {
            MemberBody::Full(h) => vec![h],
            MemberBody::Split { start, end } => vec![start, end],
        }
    }

    pub fn is_split(&self) -> bool {
        matches!(self, MemberBody::Split { .. })
    }
}

/// Body plus a generation bumped on every replacement.
#[derive(Debug, Clone)]
pub(crate) struct BodySlot {
    pub body: MemberBody,
    pub generation: u64,
}

/// Parameters for a new member.
#[derive(Debug, Clone)]
pub struct MemberSpec {
    pub name: String,
    /// Construction axis in local space.
    pub axis: Segment,
    pub placement: Isometry3<f64>,
    pub profile: ProfileSpec,
    pub offset: Vector2<f64>,
    pub local_up: Vector3<f64>,
    pub rotation: f64,
}

impl MemberSpec {
    pub fn new(name: impl Into<String>, axis: Segment, profile: ProfileSpec) -> Self {
        Self {
            name: name.into(),
            axis,
            placement: Isometry3::identity(),
            profile,
            offset: Vector2::zeros(),
            local_up: Vector3::z(),
            rotation: 0.0,
        }
    }

    pub fn with_placement(mut self, placement: Isometry3<f64>) -> Self {
        self.placement = placement;
        self
    }

    pub fn with_offset(mut self, x: f64, y: f64) -> Self {
        self.offset = Vector2::new(x, y);
        self
    }

    pub fn with_up(mut self, up: Vector3<f64>) -> Self {
        self.local_up = up;
        self
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }
}

/// Sweep request for a section placed on `segment`; shared by new and rebuilt bodies.
pub(crate) fn section_request(
    segment: Segment,
    profile: ProfileSpec,
    offset: Vector2<f64>,
    local_up: Vector3<f64>,
    rotation: f64,
) -> SweepRequest {
    SweepRequest {
        segment,
        profile,
        offset,
        local_up,
        rotation,
    }
}

/// A straight structural member: a profile swept along a construction axis.
///
/// The axis is never changed after creation; only the body is rebuilt.
#[derive(Debug, Clone)]
pub struct Member {
    /// Persistent identity for BOM and UI.
    pub tag: Uuid,
    pub name: String,
    axis: Segment,
    placement: Isometry3<f64>,
    profile: ProfileSpec,
    offset: Vector2<f64>,
    local_up: Vector3<f64>,
    rotation: f64,
    pub(crate) slot: BodySlot,
}

impl Member {
    pub(crate) fn from_spec(spec: MemberSpec, body: SolidHandle) -> Self {
        Self {
            tag: Uuid::new_v4(),
            name: spec.name,
            axis: spec.axis,
            placement: spec.placement,
            profile: spec.profile,
            offset: spec.offset,
            local_up: spec.local_up,
            rotation: spec.rotation,
            slot: BodySlot {
                body: MemberBody::Full(body),
                generation: 0,
            },
        }
    }

    /// Construction axis in local space.
    pub fn axis(&self) -> &Segment {
        &self.axis
    }

    pub fn world_axis(&self) -> Segment {
        self.axis.transformed(&self.placement)
    }

    pub fn placement(&self) -> &Isometry3<f64> {
        &self.placement
    }

    pub fn profile(&self) -> &ProfileSpec {
        &self.profile
    }

    pub fn offset(&self) -> &Vector2<f64> {
        &self.offset
    }

    pub fn local_up(&self) -> &Vector3<f64> {
        &self.local_up
    }

    /// Accumulated rotation about the axis, radians.
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub(crate) fn set_rotation(&mut self, rotation: f64) {
        self.rotation = rotation;
    }

    /// Section width and height.
    pub fn profile_extent(&self) -> (f64, f64) {
        self.profile.extent()
    }

    pub fn body(&self) -> &MemberBody {
        &self.slot.body
    }

    pub fn generation(&self) -> u64 {
        self.slot.generation
    }

    /// World position of one axis end.
    pub fn world_endpoint(&self, end: AxisEnd) -> Point3<f64> {
        self.placement.transform_point(&self.axis.endpoint(end))
    }

    /// Unit world direction from start to end.
    pub fn world_direction(&self) -> Result<Vector3<f64>, JointError> {
        self.world_axis()
            .direction()
            .ok_or_else(|| JointError::degenerate(format!("member {} has a zero-length axis", self.name)))
    }

    pub fn section_frame(&self) -> Result<SectionFrame, JointError> {
        Ok(SectionFrame::new(
            &self.axis,
            &self.local_up,
            self.rotation,
            &self.offset,
        )?)
    }

    /// Sweep request for the construction axis, optionally extended by `margin` past each end.
    pub fn sweep_request(&self, extend: Option<f64>) -> SweepRequest {
        let segment = match extend {
            Some(margin) => self.axis.extended(margin),
            None => self.axis,
        };
        section_request(
            segment,
            self.profile.clone(),
            self.offset,
            self.local_up,
            self.rotation,
        )
    }

    /// Sweep request for the section with any hollow filled.
    pub fn envelope_request(&self) -> SweepRequest {
        SweepRequest {
            profile: self.profile.envelope(),
            ..self.sweep_request(None)
        }
    }
}
