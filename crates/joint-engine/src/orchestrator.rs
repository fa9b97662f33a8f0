//! Joint pass: worklist construction, per-pair dispatch, commit or skip.

use std::fmt;

use frame_types::JointType;
use tracing::{debug, info, instrument, warn};

use crate::bom::{collect_records, BomObserver, MemberRecord};
use crate::connectivity::{all_pairs, connected_pairs};
use crate::context::PassContext;
use crate::error::JointError;
use crate::member::MemberId;
use crate::store::MemberStore;
use crate::strategies::{strategy_for, JointTarget, Staging, TrimSelection};

/// One joint pass as requested by the user.
#[derive(Debug, Clone, PartialEq)]
pub struct JointRequest {
    pub joint_type: JointType,
    /// Members whose every connected pair is joined.
    pub members: Vec<MemberId>,
    /// Explicit pairs, processed before the pairs derived from `members`.
    pub pairs: Vec<(MemberId, MemberId)>,
    /// Butt gap; the configured default when `None`.
    pub gap: Option<f64>,
    /// Member and face for a Trim joint.
    pub trim: Option<TrimSelection>,
}

impl JointRequest {
    pub fn new(joint_type: JointType) -> Self {
        Self {
            joint_type,
            members: Vec::new(),
            pairs: Vec::new(),
            gap: None,
            trim: None,
        }
    }

    pub fn for_members(joint_type: JointType, members: impl IntoIterator<Item = MemberId>) -> Self {
        Self {
            members: members.into_iter().collect(),
            ..Self::new(joint_type)
        }
    }

    pub fn for_pairs(
        joint_type: JointType,
        pairs: impl IntoIterator<Item = (MemberId, MemberId)>,
    ) -> Self {
        Self {
            pairs: pairs.into_iter().collect(),
            ..Self::new(joint_type)
        }
    }

    pub fn trim(selection: TrimSelection) -> Self {
        Self {
            trim: Some(selection),
            ..Self::new(JointType::Trim)
        }
    }

    pub fn with_gap(mut self, gap: f64) -> Self {
        self.gap = Some(gap);
        self
    }
}

/// A joint that was installed.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedJoint {
    pub members: Vec<MemberId>,
}

/// A joint that was abandoned, with the reason.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedJoint {
    pub members: Vec<MemberId>,
    pub reason: String,
}

/// Outcome of one pass.
#[derive(Debug, Clone, PartialEq)]
pub struct PassReport {
    pub joint_type: JointType,
    pub applied: Vec<AppliedJoint>,
    pub skipped: Vec<SkippedJoint>,
    /// Members reunited by the settle step.
    pub settled: usize,
}

impl PassReport {
    fn new(joint_type: JointType) -> Self {
        Self {
            joint_type,
            applied: Vec::new(),
            skipped: Vec::new(),
            settled: 0,
        }
    }

    pub fn applied_count(&self) -> usize {
        self.applied.len()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    fn skip(&mut self, members: Vec<MemberId>, error: &JointError) {
        warn!(joint = %self.joint_type, ?members, error = %error, "joint skipped");
        self.skipped.push(SkippedJoint {
            members,
            reason: error.to_string(),
        });
    }
}

impl fmt::Display for PassReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} joint: {} applied, {} skipped",
            self.joint_type,
            self.applied_count(),
            self.skipped_count()
        )
    }
}

/// Targets for a request, in processing order, each pair at most once.
pub fn build_worklist(
    store: &MemberStore,
    request: &JointRequest,
    tol: f64,
    gap: f64,
) -> Vec<JointTarget> {
    if request.joint_type == JointType::Trim {
        return request.trim.map(JointTarget::Trim).into_iter().collect();
    }
    let mut candidates = request.pairs.clone();
    candidates.extend(all_pairs(&request.members));
    let include_t = request.joint_type == JointType::T;

    connected_pairs(store, &candidates, tol, include_t)
        .into_iter()
        .filter(|pair| {
            // T joints only act on T-junctions; corners are left alone.
            if include_t && pair.is_physical() {
                debug!(a = ?pair.a, b = ?pair.b, "corner pair ignored by T joint");
                return false;
            }
            true
        })
        .map(|pair| JointTarget::Pair { pair, gap })
        .collect()
}

/// Apply a joint to every target of `request`.
///
/// Each target is all-or-nothing: its new bodies are installed together or
/// not at all. Failures are recorded in the report, never returned.
#[instrument(skip_all, fields(joint = %request.joint_type))]
pub fn apply_joints(
    ctx: &mut PassContext<'_>,
    store: &mut MemberStore,
    request: &JointRequest,
) -> PassReport {
    let mut report = PassReport::new(request.joint_type);
    if request.joint_type == JointType::Trim && request.trim.is_none() {
        report.skip(
            Vec::new(),
            &JointError::InvalidRequest {
                reason: "trim joint requested without a face selection".into(),
            },
        );
        return report;
    }

    let gap = request.gap.unwrap_or(ctx.config.default_gap);
    let worklist = build_worklist(store, request, ctx.config.tolerance, gap);
    let strategy = strategy_for(request.joint_type);
    debug!(targets = worklist.len(), "worklist built");

    for target in &worklist {
        let members = target.members();
        let mut staging = Staging::default();
        let outcome = match strategy.build(ctx, store, target, &mut staging) {
            Ok(()) => staging.commit(ctx.kernel, store),
            Err(e) => {
                staging.abort(ctx.kernel);
                Err(e)
            }
        };
        match outcome {
            Ok(touched) => {
                debug!(?touched, "joint applied");
                report.applied.push(AppliedJoint { members });
            }
            Err(e) => report.skip(members, &e),
        }
    }

    report.settled = store.settle(ctx.kernel);
    info!(
        applied = report.applied_count(),
        skipped = report.skipped_count(),
        "joint pass complete"
    );
    report
}

/// Apply a joint, then publish fresh BOM records to `observer`.
pub fn apply_joints_and_refresh(
    ctx: &mut PassContext<'_>,
    store: &mut MemberStore,
    request: &JointRequest,
    observer: &mut dyn BomObserver,
) -> (PassReport, Vec<MemberRecord>) {
    let report = apply_joints(ctx, store, request);
    let records = collect_records(ctx.kernel, store);
    observer.refresh(&records);
    (report, records)
}
