//! Property-based tests for value and index schedules.
//!
//! Run with: cargo test -p mesh-sweep-anim -- proptest

#![allow(clippy::unwrap_used)]

use mesh_sweep_anim::{IndexSchedule, NoiseEnvelope, ValueSchedule};
use nalgebra::Vector3;
use proptest::prelude::*;
use sweep_curves::Easing;

fn arb_easing() -> impl Strategy<Value = Easing> {
    prop_oneof![
        Just(Easing::Off),
        Just(Easing::Linear),
        Just(Easing::In),
        Just(Easing::Out),
        Just(Easing::InOut),
    ]
}

// =============================================================================
// Value schedules
// =============================================================================

proptest! {
    #[test]
    fn proptest_values_stay_between_start_and_target(
        len in 0usize..64,
        start in -100.0f64..100.0,
        target in -100.0f64..100.0,
        easing in arb_easing(),
        exponent in 0.1f64..5.0,
        mirror in any::<bool>(),
        cycles in 1usize..6,
    ) {
        let schedule = ValueSchedule {
            start,
            target,
            easing,
            exponent,
            mirror,
            cycles,
        };
        let values = schedule.values(len);
        prop_assert_eq!(values.len(), len);
        let (lo, hi) = (start.min(target), start.max(target));
        for v in values {
            prop_assert!(v >= lo - 1e-9 && v <= hi + 1e-9, "{} outside [{}, {}]", v, lo, hi);
        }
    }

    #[test]
    fn proptest_even_mirror_group_is_palindromic(half in 2usize..20, cycles in 1usize..4) {
        let group = half * 2;
        let values = ValueSchedule::ramp(0.0, 1.0)
            .mirrored(cycles)
            .values(group * cycles);
        for chunk in values.chunks(group) {
            for i in 0..group {
                prop_assert!((chunk[i] - chunk[group - 1 - i]).abs() < 1e-12);
            }
            prop_assert_eq!(chunk[0], 0.0);
            prop_assert_eq!(chunk[half - 1], 1.0);
        }
    }

    #[test]
    fn proptest_values_are_deterministic(len in 0usize..40, cycles in 1usize..5) {
        let schedule = ValueSchedule::ramp(-2.0, 3.0)
            .with_easing(Easing::InOut, 2.5)
            .mirrored(cycles);
        prop_assert_eq!(schedule.values(len), schedule.values(len));
    }
}

// =============================================================================
// Index schedules
// =============================================================================

proptest! {
    #[test]
    fn proptest_sequential_indices_step_by_offset(
        base in -50i64..50,
        begin in 0usize..10,
        step in 1usize..5,
        offset in -5i64..5,
        len in 1usize..40,
    ) {
        let ids = IndexSchedule::sequential(base, begin, step, offset).indices(len);
        prop_assert_eq!(ids.len(), len);
        for k in 0..len.min(begin) {
            prop_assert_eq!(ids[k], base);
        }
        for k in 1..len {
            let delta = ids[k] - ids[k - 1];
            prop_assert!(delta == 0 || delta == offset);
        }
    }

    #[test]
    fn proptest_random_indices_stay_in_range(
        base in -50i64..50,
        begin in 0usize..10,
        step in 1usize..5,
        offset in -8i64..8,
        seed in any::<u64>(),
        len in 1usize..40,
    ) {
        let schedule = IndexSchedule::random(base, begin, step, offset, seed);
        let ids = schedule.indices(len);
        let spread = offset.abs();
        prop_assert!(ids.iter().all(|i| (base - spread..=base + spread).contains(i)));
        prop_assert_eq!(*ids.last().unwrap(), base);
        prop_assert_eq!(ids, schedule.indices(len));
    }
}

// =============================================================================
// Noise envelopes
// =============================================================================

proptest! {
    #[test]
    fn proptest_envelope_gains_are_unit_bounded(
        blend_in in 0usize..8,
        hold in 0usize..8,
        blend_out in 0usize..8,
        len in 0usize..40,
    ) {
        let envelope = NoiseEnvelope {
            amplitude: Vector3::new(1.0, 2.0, 3.0),
            blend_in,
            hold,
            blend_out,
        };
        let gains = envelope.gains(len);
        prop_assert_eq!(gains.len(), len);
        prop_assert!(gains.iter().all(|g| (0.0..=1.0).contains(g)));
    }
}
