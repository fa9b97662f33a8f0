//! Kernel failures in the middle of a pass.
//!
//! A failing pair must be skipped with its members untouched, every other
//! pair must still be joined, and no solid may be left behind.

use frame_types::JointType;
use test_harness::assertions::*;
use test_harness::helpers::right_angle_miter_cutoff;
use test_harness::{FaultOp, FrameBuilder};

const W: f64 = 0.05;
const EPS: f64 = 1e-12;

/// Two separate right-angle corners: a+b at the origin, c+d at x = 5.
fn two_corners(m: &mut FrameBuilder) {
    m.bar("a", [0.0, 0.0, 0.0], [1.0, 0.0, 0.0], W).unwrap();
    m.bar("b", [0.0, 0.0, 0.0], [0.0, 1.0, 0.0], W).unwrap();
    m.bar("c", [5.0, 0.0, 0.0], [6.0, 0.0, 0.0], W).unwrap();
    m.bar("d", [5.0, 0.0, 0.0], [5.0, 1.0, 0.0], W).unwrap();
}

// ── Scenario 1: One failing cut ─────────────────────────────────────────

#[test]
fn failed_cut_skips_only_its_pair() {
    let (mut m, switch) = FrameBuilder::flaky();
    two_corners(&mut m);
    switch.fail_after(FaultOp::Subtract, 0);

    m.joint_pairs(JointType::Miter, &[("a", "b"), ("c", "d")]).unwrap();
    m.assert_last_pass(1, 1).unwrap();
    assert_eq!(switch.tripped(), 1);

    let report = m.last_report().unwrap();
    assert_eq!(report.skipped[0].members, vec![m.id("a").unwrap(), m.id("b").unwrap()]);
    assert!(report.skipped[0].reason.contains("kernel"), "{}", report.skipped[0].reason);

    assert_volume(&m, "a", W * W, EPS).unwrap();
    assert_volume(&m, "b", W * W, EPS).unwrap();
    assert_eq!(m.get("a").unwrap().generation(), 0);
    assert_volume(&m, "c", W * W - right_angle_miter_cutoff(W), EPS).unwrap();
    assert_volume(&m, "d", W * W - right_angle_miter_cutoff(W), EPS).unwrap();
    m.assert_no_leaks().unwrap();
}

#[test]
fn failure_on_second_member_rolls_back_the_first() {
    let (mut m, switch) = FrameBuilder::flaky();
    two_corners(&mut m);
    // The first member's cut succeeds; the second member's cut fails.
    switch.fail_after(FaultOp::Subtract, 1);

    m.joint_pairs(JointType::Miter, &[("a", "b")]).unwrap();
    m.assert_last_pass(0, 1).unwrap();
    assert_volume(&m, "a", W * W, EPS).unwrap();
    assert_volume(&m, "b", W * W, EPS).unwrap();
    m.assert_no_leaks().unwrap();
}

// ── Scenario 2: Persistent failure ──────────────────────────────────────

#[test]
fn persistent_union_failure_skips_every_pair() {
    let (mut m, switch) = FrameBuilder::flaky();
    m.rectangle("r", 1.0, 1.0, W).unwrap();
    switch.fail_always(FaultOp::Union);

    m.joint(JointType::Miter, &["r0", "r1", "r2", "r3"]).unwrap();
    m.assert_last_pass(0, 4).unwrap();
    for name in ["r0", "r1", "r2", "r3"] {
        assert_volume(&m, name, W * W, EPS).unwrap();
    }
    m.assert_no_leaks().unwrap();

    switch.clear();
    m.joint(JointType::Miter, &["r0", "r1", "r2", "r3"]).unwrap();
    m.assert_last_pass(4, 0).unwrap();
    m.assert_no_leaks().unwrap();
}

#[test]
fn failed_envelope_transform_skips_the_tee() {
    let (mut m, switch) = FrameBuilder::flaky();
    m.bar("rail", [0.0, 0.0, 0.0], [2.0, 0.0, 0.0], W).unwrap();
    m.bar("post", [0.7, 0.0, 0.0], [0.7, 0.0, 1.0], W).unwrap();
    switch.fail_always(FaultOp::Transform);

    m.joint(JointType::T, &["rail", "post"]).unwrap();
    m.assert_last_pass(0, 1).unwrap();
    assert_volume(&m, "post", W * W, EPS).unwrap();
    assert_eq!(m.get("post").unwrap().generation(), 0);
    m.assert_no_leaks().unwrap();
}

// ── Scenario 3: Member creation ─────────────────────────────────────────

#[test]
fn failed_sweep_adds_no_member() {
    let (mut m, switch) = FrameBuilder::flaky();
    m.bar("a", [0.0, 0.0, 0.0], [1.0, 0.0, 0.0], W).unwrap();
    switch.fail_after(FaultOp::Extrude, 0);

    assert!(m.bar("b", [0.0, 0.0, 0.0], [0.0, 1.0, 0.0], W).is_err());
    assert!(m.id("b").is_err());
    assert_eq!(m.member_count(), 1);
    m.assert_no_leaks().unwrap();

    m.bar("b", [0.0, 0.0, 0.0], [0.0, 1.0, 0.0], W).unwrap();
    assert_eq!(m.member_count(), 2);
}
