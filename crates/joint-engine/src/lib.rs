//! Joint resolution for tubular frames.
//!
//! Members are straight profiles swept along a construction axis. A joint
//! pass finds which members touch, then for each connected pair rebuilds the
//! affected half of every member and cuts it to the joint's geometry. Bodies
//! are always regenerated from the axis, so re-applying or changing a joint
//! never accumulates earlier cuts.

pub mod bom;
pub mod config;
pub mod connectivity;
pub mod context;
pub mod cutter;
pub mod error;
pub mod member;
pub mod offset_edges;
pub mod orchestrator;
pub mod orientation;
pub mod reset;
pub mod splitter;
pub mod store;
pub mod strategies;

#[cfg(test)]
mod test_support;

pub use bom::{collect_records, records_to_json, BomObserver, LatestRecords, MemberRecord};
pub use config::JointConfig;
pub use connectivity::{all_pairs, classify_pair, connected_pairs, Connection, ConnectionPair, PairKey};
pub use context::PassContext;
pub use error::JointError;
pub use member::{Member, MemberBody, MemberId, MemberSpec};
pub use orchestrator::{
    apply_joints, apply_joints_and_refresh, build_worklist, AppliedJoint, JointRequest, PassReport,
    SkippedJoint,
};
pub use orientation::stabilized_up;
pub use reset::{
    rebuild_half, reset_component_geometry_and_extend, reset_component_geometry_only,
    reset_half_for_joint, RegenMode,
};
pub use splitter::{split_body_at_midpoint, split_solid, HalfBodies};
pub use store::MemberStore;
pub use strategies::{strategy_for, CuttingFace, JointStrategy, JointTarget, Staging, TrimSelection};
