//! Property-based tests for falloff, frames and topology.
//!
//! Run with: cargo test -p mesh-sweep -- proptest

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use mesh_sweep::{FalloffSpec, Reflect, TopologySpec, UpReference, falloff, frame, topology};
use nalgebra::{Point3, Vector3};
use proptest::prelude::*;
use sweep_curves::Easing;

// =============================================================================
// Strategies
// =============================================================================

fn arb_easing() -> impl Strategy<Value = Easing> {
    prop_oneof![
        Just(Easing::Off),
        Just(Easing::Linear),
        Just(Easing::In),
        Just(Easing::Out),
        Just(Easing::InOut),
    ]
}

fn arb_reflect() -> impl Strategy<Value = Reflect> {
    prop_oneof![
        Just(Reflect::None),
        Just(Reflect::All),
        Just(Reflect::Highs),
        Just(Reflect::Lows),
    ]
}

prop_compose! {
    fn arb_falloff()(
        start in -200i64..200,
        items in 0usize..80,
        gap in 0usize..10,
        repeats in 0usize..12,
        easing in arb_easing(),
        exponent in 0.0f64..6.0,
        mirror in any::<bool>(),
        reflect in arb_reflect(),
        reverse in any::<bool>(),
        falloff_factor in -1.0f64..2.0,
        falloff_step in 0usize..4,
    ) -> FalloffSpec {
        FalloffSpec {
            start,
            items,
            gap,
            repeats,
            easing,
            exponent,
            mirror,
            reflect,
            reverse,
            falloff_factor,
            falloff_step,
        }
    }
}

fn arb_path() -> impl Strategy<Value = Vec<Point3<f64>>> {
    prop::collection::vec(prop::array::uniform3(-10.0..10.0f64), 3..24).prop_map(|coords| {
        // Accumulate positive steps so consecutive points never coincide
        let mut p = Point3::origin();
        coords
            .into_iter()
            .map(|[x, y, z]| {
                p += Vector3::new(x, y, z.abs() + 0.5);
                p
            })
            .collect()
    })
}

// =============================================================================
// Falloff invariants
// =============================================================================

proptest! {
    #[test]
    fn proptest_falloff_is_well_formed(total in 1usize..64, spec in arb_falloff()) {
        let sel = falloff::compute(total, &spec);
        prop_assert_eq!(sel.indices.len(), sel.weights.len());
        prop_assert!(sel.len() <= total);
        prop_assert!(!sel.is_empty());

        let mut seen = vec![false; total];
        for (i, w) in sel.iter() {
            prop_assert!(i < total);
            prop_assert!(!seen[i], "duplicate index {}", i);
            seen[i] = true;
            prop_assert!((0.0..=1.0).contains(&w), "weight {} out of range", w);
        }
    }

    #[test]
    fn proptest_falloff_accepts_extreme_counts(
        total in 1usize..64,
        items in any::<usize>(),
        gap in any::<usize>(),
        repeats in any::<usize>(),
    ) {
        let spec = FalloffSpec::run(0, items).with_repeats(repeats, gap);
        let sel = falloff::compute(total, &spec);
        prop_assert!(!sel.is_empty());
        prop_assert!(sel.len() <= total);
        prop_assert!(sel.iter().all(|(i, _)| i < total));
    }

    #[test]
    fn proptest_linear_run_is_strictly_increasing(total in 2usize..64, items in 2usize..64) {
        let spec = FalloffSpec::run(0, items).with_easing(Easing::Linear, 1.0);
        let sel = falloff::compute(total, &spec);
        for pair in sel.weights.windows(2) {
            prop_assert!(pair[1] > pair[0]);
        }
    }

    #[test]
    fn proptest_mirrored_run_is_palindromic(total in 2usize..64, items in 2usize..64) {
        let spec = FalloffSpec::run(0, items)
            .with_easing(Easing::InOut, 2.0)
            .mirrored();
        let w = falloff::compute(total, &spec).weights;
        let n = w.len();
        for i in 0..n {
            prop_assert!((w[i] - w[n - 1 - i]).abs() < 1e-12);
        }
    }
}

// =============================================================================
// Frame transport
// =============================================================================

proptest! {
    #[test]
    fn proptest_frames_follow_tangents(points in arb_path(), closed in any::<bool>()) {
        let tangents = frame::secant_tangents(&points, closed);
        for up in [UpReference::default(), UpReference::Adaptive] {
            let frames = frame::transport_frames(&points, up, closed);
            prop_assert_eq!(frames.len(), points.len());
            for (q, t) in frames.iter().zip(&tangents) {
                prop_assert!((q * Vector3::z() - t).norm() < 1e-9);
            }
        }
    }
}

// =============================================================================
// Topology
// =============================================================================

proptest! {
    #[test]
    fn proptest_face_counts(
        rings in 2usize..40,
        points in 2usize..40,
        path_closed in any::<bool>(),
        profile_closed in any::<bool>(),
        endcaps in any::<bool>(),
        spin in -10.0f64..10.0,
    ) {
        let spec = TopologySpec {
            endcaps,
            spin,
            ..TopologySpec::grid(rings, points, path_closed, profile_closed)
        };
        let faces = topology::build(&spec);

        let columns = if profile_closed { points } else { points - 1 };
        let rows = if path_closed { rings } else { rings - 1 };
        let caps = usize::from(endcaps && !path_closed && points >= 3) * 2;
        prop_assert_eq!(faces.len(), rows * columns + caps);
        prop_assert_eq!(faces.len(), spec.face_count());

        let vertex_count = u32::try_from(rings * points).unwrap();
        for face in &faces {
            prop_assert!(face.vertices().iter().all(|&v| v < vertex_count));
        }
    }
}
