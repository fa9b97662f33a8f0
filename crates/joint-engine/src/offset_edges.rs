//! Inner and outer edge lines of a member at a corner.
//!
//! The lines run parallel to the member's axis, offset by the section's half
//! extent toward (inner) and away from (outer) the neighbor.

use frame_types::{AxisEnd, Line3};
use nalgebra::{Isometry3, Point3, Vector3};
use tracing::warn;

use crate::error::JointError;
use crate::member::Member;

/// Edge lines of one member against one neighbor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffsetEdges {
    pub inner: Line3,
    pub outer: Line3,
    /// Unit offset direction, pointing to the interior of the corner.
    pub perp: Vector3<f64>,
    /// The member's end at the corner.
    pub corner_end: AxisEnd,
    /// Set when the axes were colinear and `perp` came from a fallback reference.
    pub approximate: bool,
}

impl OffsetEdges {
    /// Express world-space edges in the member's local space.
    pub fn to_local(&self, placement: &Isometry3<f64>) -> Self {
        Self {
            inner: self.inner.inverse_transformed(placement),
            outer: self.outer.inverse_transformed(placement),
            perp: placement.inverse_transform_vector(&self.perp),
            ..*self
        }
    }
}

/// The member end and neighbor end that are closest together.
pub fn nearest_ends(member: &Member, neighbor: &Member) -> (AxisEnd, AxisEnd) {
    let mut best = (AxisEnd::Start, AxisEnd::Start, f64::INFINITY);
    for ea in [AxisEnd::Start, AxisEnd::End] {
        for eb in [AxisEnd::Start, AxisEnd::End] {
            let d = (member.world_endpoint(ea) - neighbor.world_endpoint(eb)).norm();
            if d < best.2 {
                best = (ea, eb, d);
            }
        }
    }
    (best.0, best.1)
}

/// Edge lines in world space.
pub fn world_offset_edges(
    member: &Member,
    neighbor: &Member,
    tol: f64,
) -> Result<OffsetEdges, JointError> {
    let (me, ne) = nearest_ends(member, neighbor);
    let corner = member.world_endpoint(me);
    let away_m = (member.world_endpoint(me.opposite()) - corner)
        .try_normalize(tol)
        .ok_or_else(|| JointError::degenerate(format!("member {} has a zero-length axis", member.name)))?;
    let neighbor_corner = neighbor.world_endpoint(ne);
    let away_n = (neighbor.world_endpoint(ne.opposite()) - neighbor_corner)
        .try_normalize(tol)
        .ok_or_else(|| JointError::degenerate(format!("member {} has a zero-length axis", neighbor.name)))?;

    let plane_normal = away_m.cross(&away_n);
    let (perp, approximate) = if plane_normal.norm() < tol {
        let fallback = away_m.cross(&Vector3::z());
        let fallback = if fallback.norm() < tol {
            away_m.cross(&Vector3::x())
        } else {
            fallback
        };
        warn!(
            member = %member.name,
            neighbor = %neighbor.name,
            "colinear axes; offset edges use a fallback perpendicular"
        );
        (fallback.normalize(), true)
    } else {
        let bisector = away_m + away_n;
        let perp = plane_normal.normalize().cross(&away_m).normalize();
        if perp.dot(&bisector) < 0.0 {
            (-perp, false)
        } else {
            (perp, false)
        }
    };

    let frame = member.section_frame()?;
    let perp_local = member.placement().inverse_transform_vector(&perp);
    let (w, h) = member.profile_extent();
    let half = frame.half_extent_along(&perp_local, w, h);
    let shift = frame.center_shift(member.axis()).dot(&perp_local);

    let line_at = |offset: f64| Line3::new(corner + perp * offset, away_m);
    Ok(OffsetEdges {
        inner: line_at(shift + half),
        outer: line_at(shift - half),
        perp,
        corner_end: me,
        approximate,
    })
}

/// Edge lines in the member's local space.
pub fn offset_edges(member: &Member, neighbor: &Member, tol: f64) -> Result<OffsetEdges, JointError> {
    Ok(world_offset_edges(member, neighbor, tol)?.to_local(member.placement()))
}

/// Intersection of two edge lines, or `NoIntersection` when they are parallel.
pub fn edge_intersection(a: &Line3, b: &Line3, tol: f64) -> Result<Point3<f64>, JointError> {
    a.intersect(b, tol)
        .ok_or_else(|| JointError::no_intersection("offset edges are parallel"))
}
