use approx::assert_relative_eq;
use frame_kernel::{CellKernel, GeometryKernel};
use frame_types::{ProfileSpec, Segment};
use joint_engine::{
    classify_pair, split_solid, stabilized_up, JointConfig, MemberSpec, MemberStore, PassContext,
};
use nalgebra::{Point3, Vector3};
use profile_sweep::SectionSweeper;
use proptest::prelude::*;

// -----------------------------------------------------------------------
// Strategies
// -----------------------------------------------------------------------

fn arb_unit_vector() -> impl Strategy<Value = Vector3<f64>> {
    (-1.0..1.0f64, -1.0..1.0f64, -1.0..1.0f64)
        .prop_filter("non-zero", |(x, y, z)| x * x + y * y + z * z > 0.01)
        .prop_map(|(x, y, z)| Vector3::new(x, y, z).normalize())
}

fn arb_point() -> impl Strategy<Value = Point3<f64>> {
    (-5.0..5.0f64, -5.0..5.0f64, -5.0..5.0f64).prop_map(|(x, y, z)| Point3::new(x, y, z))
}

fn store_with(specs: Vec<MemberSpec>) -> (CellKernel, MemberStore, Vec<joint_engine::MemberId>) {
    let mut kernel = CellKernel::new();
    let sweeper = SectionSweeper::default();
    let config = JointConfig::default();
    let mut store = MemberStore::new();
    let mut ids = Vec::new();
    {
        let mut ctx = PassContext::new(&mut kernel, &sweeper, &config);
        for spec in specs {
            ids.push(store.add_member(&mut ctx, spec).unwrap());
        }
    }
    (kernel, store, ids)
}

// -----------------------------------------------------------------------
// Orientation
// -----------------------------------------------------------------------

proptest! {
    #[test]
    fn up_ignores_operand_order(da in arb_unit_vector(), db in arb_unit_vector()) {
        let ab = stabilized_up(&da, &db, 1e-6);
        let ba = stabilized_up(&db, &da, 1e-6);
        prop_assert_eq!(ab, ba);
        prop_assert!((ab.norm() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn up_is_perpendicular_to_both_directions(da in arb_unit_vector(), db in arb_unit_vector()) {
        prop_assume!(da.cross(&db).norm() > 1e-3);
        let up = stabilized_up(&da, &db, 1e-6);
        prop_assert!(up.dot(&da).abs() < 1e-9);
        prop_assert!(up.dot(&db).abs() < 1e-9);
    }
}

// -----------------------------------------------------------------------
// Connectivity
// -----------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn connection_is_symmetric(
        corner in arb_point(),
        da in arb_unit_vector(),
        db in arb_unit_vector(),
        gap in prop_oneof![Just(0.0), 0.1..1.0f64],
    ) {
        let profile = ProfileSpec::rectangular(0.05, 0.05);
        let a = MemberSpec::new("a", Segment::new(corner, corner + da), profile.clone());
        let b = MemberSpec::new("b", Segment::new(corner + da * gap, corner + da * gap + db), profile);
        let (_kernel, store, ids) = store_with(vec![a, b]);

        let ab = classify_pair(&store, ids[0], ids[1], 1e-6, true);
        let ba = classify_pair(&store, ids[1], ids[0], 1e-6, true);
        prop_assert_eq!(ab.is_some(), ba.is_some());
        if let (Some(ab), Some(ba)) = (ab, ba) {
            prop_assert_eq!(ab.is_physical(), ba.is_physical());
            prop_assert_eq!(ab.key(), ba.key());
        }
    }
}

// -----------------------------------------------------------------------
// Splitting
// -----------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn halves_reproduce_the_whole(
        start in arb_point(),
        dir in arb_unit_vector(),
        length in 0.2..4.0f64,
        width in 0.02..0.2f64,
        height in 0.02..0.2f64,
    ) {
        let spec = MemberSpec::new(
            "m",
            Segment::new(start, start + dir * length),
            ProfileSpec::rectangular(width, height),
        );
        let (mut kernel, store, ids) = store_with(vec![spec]);
        let member = store.member(ids[0]).unwrap();
        let body = member.body().handles()[0];
        let whole = kernel.volume(&body).unwrap();
        let halves = split_solid(&mut kernel, &body, member, member.local_up(), &JointConfig::default()).unwrap();

        let start_v = kernel.volume(&halves.start).unwrap();
        let end_v = kernel.volume(&halves.end).unwrap();
        assert_relative_eq!(start_v + end_v, whole, epsilon = 1e-9 * whole.max(1.0));
        assert_relative_eq!(start_v, end_v, epsilon = 1e-9 * whole.max(1.0));
        prop_assert_eq!(kernel.live_solids(), 3);
    }
}
