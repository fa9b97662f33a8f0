//! FrameBuilder: fluent API for scripting frame workflows in tests.
//!
//! Drives the real joint engine through `apply_joints_and_refresh`, not a
//! simulation. All methods take member names instead of ids for readability.

use std::collections::HashMap;

use frame_kernel::{Aabb, CellKernel, GeometryKernel, TruckKernel};
use frame_types::{JointType, Segment};
use joint_engine::{
    apply_joints_and_refresh, records_to_json, reset_component_geometry_only, CuttingFace,
    JointConfig, JointRequest, LatestRecords, Member, MemberId, MemberRecord, MemberSpec,
    MemberStore, PassContext, PassReport, TrimSelection,
};
use nalgebra::{Point3, Vector3};
use profile_sweep::SectionSweeper;
use tracing::debug;

use crate::flaky::{FaultSwitch, FlakyKernel};
use crate::helpers::*;

/// A fluent builder for constructing and joining frames in tests.
pub struct FrameBuilder {
    kernel: Box<dyn GeometryKernel>,
    sweeper: SectionSweeper,
    config: JointConfig,
    store: MemberStore,
    names: HashMap<String, MemberId>,
    reports: Vec<PassReport>,
    bom: LatestRecords,
}

impl FrameBuilder {
    /// Builder over an arbitrary kernel.
    pub fn with_kernel(kernel: Box<dyn GeometryKernel>) -> Self {
        Self {
            kernel,
            sweeper: SectionSweeper::default(),
            config: JointConfig::default(),
            store: MemberStore::new(),
            names: HashMap::new(),
            reports: Vec::new(),
            bom: LatestRecords::default(),
        }
    }

    /// Builder with the exact cell kernel (deterministic, fast).
    pub fn cell() -> Self {
        Self::with_kernel(Box::new(CellKernel::new()))
    }

    /// Builder with the truck B-rep kernel (real geometry).
    pub fn truck() -> Self {
        Self::with_kernel(Box::new(TruckKernel::new()))
    }

    /// Builder over a cell kernel whose faults are armed through the returned switch.
    pub fn flaky() -> (Self, FaultSwitch) {
        let switch = FaultSwitch::new();
        let kernel = FlakyKernel::new(CellKernel::new(), switch.clone());
        (Self::with_kernel(Box::new(kernel)), switch)
    }

    pub fn with_config(mut self, config: JointConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_circle_segments(mut self, segments: usize) -> Self {
        self.sweeper = SectionSweeper::new(segments);
        self
    }

    pub fn config(&self) -> &JointConfig {
        &self.config
    }

    pub fn kernel(&self) -> &dyn GeometryKernel {
        self.kernel.as_ref()
    }

    pub fn store(&self) -> &MemberStore {
        &self.store
    }

    fn pass(&mut self) -> (PassContext<'_>, &mut MemberStore) {
        (
            PassContext::new(self.kernel.as_mut(), &self.sweeper, &self.config),
            &mut self.store,
        )
    }

    // ── Members ─────────────────────────────────────────────────────────

    /// Add a member under `spec.name`.
    pub fn add(&mut self, spec: MemberSpec) -> Result<MemberId, HarnessError> {
        if self.names.contains_key(&spec.name) {
            return Err(HarnessError::DuplicateName { name: spec.name });
        }
        let name = spec.name.clone();
        let (mut ctx, store) = self.pass();
        let id = store.add_member(&mut ctx, spec)?;
        self.names.insert(name, id);
        Ok(id)
    }

    /// Square bar of side `w` between two world points.
    pub fn bar(
        &mut self,
        name: &str,
        start: [f64; 3],
        end: [f64; 3],
        w: f64,
    ) -> Result<MemberId, HarnessError> {
        let axis = Segment::new(Point3::from(start), Point3::from(end));
        self.add(MemberSpec::new(name, axis, square_bar(w)))
    }

    /// Closed rectangle of square bars in the XY plane, named `{prefix}0..3`
    /// counter-clockwise from the bottom edge.
    pub fn rectangle(
        &mut self,
        prefix: &str,
        width: f64,
        height: f64,
        w: f64,
    ) -> Result<Vec<MemberId>, HarnessError> {
        let corners = [
            [0.0, 0.0, 0.0],
            [width, 0.0, 0.0],
            [width, height, 0.0],
            [0.0, height, 0.0],
        ];
        (0..4)
            .map(|i| self.bar(&format!("{prefix}{i}"), corners[i], corners[(i + 1) % 4], w))
            .collect()
    }

    pub fn id(&self, name: &str) -> Result<MemberId, HarnessError> {
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| HarnessError::MemberNotFound {
                name: name.to_string(),
            })
    }

    pub fn get(&self, name: &str) -> Result<&Member, HarnessError> {
        Ok(self.store.member(self.id(name)?)?)
    }

    /// Name registered for a member id.
    pub fn name_of(&self, id: MemberId) -> Option<&str> {
        self.names
            .iter()
            .find(|(_, v)| **v == id)
            .map(|(k, _)| k.as_str())
    }

    pub fn remove(&mut self, name: &str) -> Result<(), HarnessError> {
        let id = self.id(name)?;
        self.store.remove_member(self.kernel.as_mut(), id);
        self.names.remove(name);
        Ok(())
    }

    fn ids(&self, names: &[&str]) -> Result<Vec<MemberId>, HarnessError> {
        names.iter().map(|n| self.id(n)).collect()
    }

    // ── Joints ──────────────────────────────────────────────────────────

    /// Run one pass and publish BOM records.
    pub fn apply(&mut self, request: JointRequest) -> &PassReport {
        let (report, _) = {
            let mut ctx = PassContext::new(self.kernel.as_mut(), &self.sweeper, &self.config);
            apply_joints_and_refresh(&mut ctx, &mut self.store, &request, &mut self.bom)
        };
        debug!(%report, "harness pass");
        self.reports.push(report);
        &self.reports[self.reports.len() - 1]
    }

    /// Join every connected pair among the named members.
    pub fn joint(&mut self, joint_type: JointType, names: &[&str]) -> Result<&PassReport, HarnessError> {
        let ids = self.ids(names)?;
        Ok(self.apply(JointRequest::for_members(joint_type, ids)))
    }

    /// Join explicit pairs, in order.
    pub fn joint_pairs(
        &mut self,
        joint_type: JointType,
        pairs: &[(&str, &str)],
    ) -> Result<&PassReport, HarnessError> {
        let ids = pairs
            .iter()
            .map(|(a, b)| Ok((self.id(a)?, self.id(b)?)))
            .collect::<Result<Vec<_>, HarnessError>>()?;
        Ok(self.apply(JointRequest::for_pairs(joint_type, ids)))
    }

    /// Butt joint with an explicit gap.
    pub fn butt(
        &mut self,
        joint_type: JointType,
        butting: &str,
        continuous: &str,
        gap: f64,
    ) -> Result<&PassReport, HarnessError> {
        let pair = (self.id(butting)?, self.id(continuous)?);
        Ok(self.apply(JointRequest::for_pairs(joint_type, [pair]).with_gap(gap)))
    }

    /// Trim a member against a world-space face.
    pub fn trim(
        &mut self,
        name: &str,
        origin: [f64; 3],
        normal: [f64; 3],
    ) -> Result<&PassReport, HarnessError> {
        let member = self.id(name)?;
        Ok(self.apply(JointRequest::trim(TrimSelection {
            member,
            face: CuttingFace {
                origin: Point3::from(origin),
                normal: Vector3::from(normal),
            },
        })))
    }

    /// Turn a member's section about its axis.
    pub fn rotate(&mut self, name: &str, angle: f64) -> Result<(), HarnessError> {
        let id = self.id(name)?;
        let (mut ctx, store) = self.pass();
        store.rotate_member(&mut ctx, id, angle)?;
        Ok(())
    }

    /// Drop every joint on a member.
    pub fn reset(&mut self, name: &str) -> Result<(), HarnessError> {
        let id = self.id(name)?;
        let (mut ctx, store) = self.pass();
        reset_component_geometry_only(&mut ctx, store, id)?;
        Ok(())
    }

    // ── Queries ─────────────────────────────────────────────────────────

    pub fn volume(&self, name: &str) -> Result<f64, HarnessError> {
        Ok(member_volume(self.kernel(), self.get(name)?)?)
    }

    pub fn world_bounds(&self, name: &str) -> Result<Aabb, HarnessError> {
        Ok(world_bounds(self.kernel(), self.get(name)?)?)
    }

    pub fn live_solids(&self) -> usize {
        self.kernel.live_solids()
    }

    pub fn member_count(&self) -> usize {
        self.store.len()
    }

    pub fn reports(&self) -> &[PassReport] {
        &self.reports
    }

    pub fn last_report(&self) -> Option<&PassReport> {
        self.reports.last()
    }

    /// Records published by the last pass.
    pub fn records(&self) -> &[MemberRecord] {
        &self.bom.records
    }

    /// Number of BOM refreshes received.
    pub fn refreshes(&self) -> usize {
        self.bom.refreshes
    }

    pub fn record(&self, name: &str) -> Result<&MemberRecord, HarnessError> {
        let tag = self.get(name)?.tag;
        self.bom
            .records
            .iter()
            .find(|r| r.tag == tag)
            .ok_or_else(|| HarnessError::MemberNotFound {
                name: format!("{name} (no BOM record)"),
            })
    }

    pub fn bom_json(&self) -> Result<String, HarnessError> {
        Ok(records_to_json(&self.bom.records)?)
    }

    // ── Inline Assertions ───────────────────────────────────────────────

    /// Assert the last pass applied and skipped the given numbers of joints.
    pub fn assert_last_pass(&self, applied: usize, skipped: usize) -> Result<(), HarnessError> {
        let report = self.last_report().ok_or_else(|| HarnessError::AssertionFailed {
            detail: "no pass has run".into(),
        })?;
        crate::assertions::assert_pass_counts(report, applied, skipped)
    }

    /// Assert the kernel holds exactly one solid per member.
    pub fn assert_no_leaks(&self) -> Result<(), HarnessError> {
        crate::assertions::assert_live_solids(self.kernel(), self.member_count())
    }
}
