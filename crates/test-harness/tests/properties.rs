use frame_types::JointType;
use proptest::prelude::*;
use test_harness::helpers::right_angle_miter_cutoff;
use test_harness::FrameBuilder;

const W: f64 = 0.05;

// -----------------------------------------------------------------------
// Strategies
// -----------------------------------------------------------------------

/// Corner angle between two members, away from the colinear cases.
fn arb_corner_angle() -> impl Strategy<Value = f64> {
    0.6..2.5f64
}

fn arb_side() -> impl Strategy<Value = f64> {
    0.5..3.0f64
}

fn corner_at(theta: f64) -> FrameBuilder {
    let mut m = FrameBuilder::cell();
    m.bar("a", [0.0, 0.0, 0.0], [1.0, 0.0, 0.0], W).unwrap();
    m.bar("b", [0.0, 0.0, 0.0], [theta.cos(), theta.sin(), 0.0], W).unwrap();
    m
}

// -----------------------------------------------------------------------
// Miter
// -----------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn miter_removes_the_bisector_wedge(theta in arb_corner_angle()) {
        let mut m = corner_at(theta);
        m.joint(JointType::Miter, &["a", "b"]).unwrap();
        prop_assert_eq!(m.last_report().unwrap().applied_count(), 1);

        // The bisector plane crosses the section diagonal: the removed part
        // is a wedge of W * (W/2)^2 * cot(theta/2) / 2.
        let wedge = W * W * W / 8.0 / (theta / 2.0).tan();
        let expected = W * W - wedge;
        prop_assert!((m.volume("a").unwrap() - expected).abs() < 1e-12);
        prop_assert!((m.volume("b").unwrap() - expected).abs() < 1e-12);
        prop_assert!(m.assert_no_leaks().is_ok());
    }

    #[test]
    fn miter_then_none_restores_the_bar(theta in arb_corner_angle()) {
        let mut m = corner_at(theta);
        m.joint(JointType::Miter, &["a", "b"]).unwrap();
        m.joint(JointType::None, &["a", "b"]).unwrap();
        prop_assert!((m.volume("a").unwrap() - W * W).abs() < 1e-12);
        prop_assert!((m.volume("b").unwrap() - W * W).abs() < 1e-12);
        prop_assert!(m.assert_no_leaks().is_ok());
    }

    #[test]
    fn reapplied_miter_is_stable(theta in arb_corner_angle()) {
        let mut m = corner_at(theta);
        m.joint(JointType::Miter, &["a", "b"]).unwrap();
        let first = m.volume("a").unwrap();
        m.joint(JointType::Miter, &["a", "b"]).unwrap();
        prop_assert!((m.volume("a").unwrap() - first).abs() < 1e-12);
        prop_assert_eq!(m.get("a").unwrap().generation(), 2);
    }
}

// -----------------------------------------------------------------------
// Rectangles
// -----------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn mitered_rectangle_of_any_size(width in arb_side(), height in arb_side()) {
        let mut m = FrameBuilder::cell();
        m.rectangle("r", width, height, W).unwrap();
        m.joint(JointType::Miter, &["r0", "r1", "r2", "r3"]).unwrap();
        prop_assert_eq!(m.last_report().unwrap().applied_count(), 4);

        let cut = 2.0 * right_angle_miter_cutoff(W);
        prop_assert!((m.volume("r0").unwrap() - (W * W * width - cut)).abs() < 1e-12);
        prop_assert!((m.volume("r1").unwrap() - (W * W * height - cut)).abs() < 1e-12);
        prop_assert!(m.assert_no_leaks().is_ok());
    }

    #[test]
    fn straight_rectangle_keeps_total_length(width in arb_side(), height in arb_side()) {
        let mut m = FrameBuilder::cell();
        m.rectangle("r", width, height, W).unwrap();
        m.joint_pairs(
            JointType::Straight,
            &[("r0", "r1"), ("r2", "r1"), ("r2", "r3"), ("r0", "r3")],
        )
        .unwrap();
        prop_assert_eq!(m.last_report().unwrap().applied_count(), 4);

        // Butting members lose W/2 at both ends, continuous members gain it.
        let total: f64 = ["r0", "r1", "r2", "r3"].iter().map(|n| m.volume(n).unwrap()).sum();
        let expected = W * W * (2.0 * (width - W) + 2.0 * (height + W));
        prop_assert!((total - expected).abs() < 1e-10);
    }
}
