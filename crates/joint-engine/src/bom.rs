//! Bill-of-materials records published after each pass.

use frame_kernel::{Aabb, GeometryKernel};
use frame_types::ProfileType;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::error::JointError;
use crate::member::Member;
use crate::store::MemberStore;

/// Per-member data for BOM and UI consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberRecord {
    pub tag: Uuid,
    pub name: String,
    pub profile_type: ProfileType,
    pub width: f64,
    pub height: f64,
    pub hollow: bool,
    /// Length of the construction axis.
    pub axis_length: f64,
    /// Extent of the cut body along its axis.
    pub cut_length: f64,
    pub volume: f64,
    pub generation: u64,
}

/// Receives fresh records at the end of every pass.
pub trait BomObserver {
    fn refresh(&mut self, records: &[MemberRecord]);
}

/// Observer that keeps the latest records.
#[derive(Debug, Default)]
pub struct LatestRecords {
    pub records: Vec<MemberRecord>,
    pub refreshes: usize,
}

impl BomObserver for LatestRecords {
    fn refresh(&mut self, records: &[MemberRecord]) {
        self.records = records.to_vec();
        self.refreshes += 1;
    }
}

pub fn member_record(kernel: &dyn GeometryKernel, member: &Member) -> Result<MemberRecord, JointError> {
    let frame = member.section_frame()?.isometry();
    let mut bounds = Aabb::empty();
    let mut volume = 0.0;
    for h in member.body().handles() {
        bounds = bounds.union(&kernel.oriented_bounds(&h, &frame)?);
        volume += kernel.volume(&h)?;
    }
    let (width, height) = member.profile_extent();
    Ok(MemberRecord {
        tag: member.tag,
        name: member.name.clone(),
        profile_type: member.profile().profile_type,
        width,
        height,
        hollow: member.profile().is_hollow(),
        axis_length: member.axis().length(),
        cut_length: if bounds.is_empty() { 0.0 } else { bounds.size().z },
        volume,
        generation: member.generation(),
    })
}

/// Records for every member; members whose body cannot be measured are left out.
pub fn collect_records(kernel: &dyn GeometryKernel, store: &MemberStore) -> Vec<MemberRecord> {
    store
        .iter()
        .filter_map(|(_, m)| match member_record(kernel, m) {
            Ok(r) => Some(r),
            Err(e) => {
                warn!(member = %m.name, error = %e, "no BOM record");
                None
            }
        })
        .collect()
}

pub fn records_to_json(records: &[MemberRecord]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(records)
}
