//! Property-based tests for time arithmetic and slot allocation.

use std::collections::HashSet;

use dose_engine::timeslot::{add_minutes, TimeOfDay};
use dose_engine::{build, DoseError, SlotRegistry};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn arb_time() -> impl Strategy<Value = TimeOfDay> {
    (0u32..24, 0u32..60).prop_map(|(h, m)| TimeOfDay::from_hm(h, m).unwrap())
}

fn arb_day() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("Monday"),
        Just("Tuesday"),
        Just("Wednesday"),
        Just("Thursday"),
        Just("Friday"),
        Just("Saturday"),
        Just("Sunday"),
    ]
}

/// A request: distinct days plus 1-4 dose times.
fn arb_request() -> impl Strategy<Value = (Vec<&'static str>, Vec<String>)> {
    (
        prop::collection::hash_set(arb_day(), 1..=3),
        prop::collection::vec(arb_time(), 1..=4),
    )
        .prop_map(|(days, times)| {
            let mut days: Vec<&str> = days.into_iter().collect();
            days.sort_unstable();
            (days, times.iter().map(|t| t.to_string()).collect())
        })
}

fn minutes(t: TimeOfDay) -> i64 {
    i64::from(t.hour()) * 60 + i64::from(t.minute())
}

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Property 1: add_minutes is addition modulo one day
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn add_minutes_is_modular(time in arb_time(), delta in -5000i64..5000) {
        let result = add_minutes(time, delta);
        prop_assert_eq!(minutes(result), (minutes(time) + delta).rem_euclid(1440));
    }

    #[test]
    fn add_minutes_round_trips(time in arb_time(), delta in -5000i64..5000) {
        prop_assert_eq!(add_minutes(add_minutes(time, delta), -delta), time);
    }
}

// ---------------------------------------------------------------------------
// Property 2: committed slots never collide across a sequence of builds
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn builds_never_share_a_slot(requests in prop::collection::vec(arb_request(), 1..8)) {
        let mut registry = SlotRegistry::new();
        let mut seen = HashSet::new();

        for (days, times) in &requests {
            let built = build(&mut registry, times.len(), &days[..], &times[..]).unwrap();
            prop_assert_eq!(built.schedule.dose_times.len(), times.len());
            for slot in built.schedule.slots() {
                prop_assert!(seen.insert(slot), "slot {} assigned twice", slot);
                prop_assert!(registry.contains(slot.day, slot.time));
            }
        }

        prop_assert_eq!(registry.len(), seen.len());
    }

    #[test]
    fn shifts_are_whole_ten_minute_steps(
        (days, times) in arb_request(),
        taken in prop::collection::vec((arb_day(), arb_time()), 0..40),
    ) {
        let mut registry = SlotRegistry::new();
        for (day, time) in &taken {
            registry.commit(day.parse().unwrap(), *time);
        }

        match build(&mut registry, times.len(), &days[..], &times[..]) {
            Ok(built) => {
                for (requested, committed) in times.iter().zip(&built.schedule.dose_times) {
                    let requested: TimeOfDay = requested.parse().unwrap();
                    let shift = (minutes(*committed) - minutes(requested)).rem_euclid(1440);
                    prop_assert_eq!(shift % 10, 0);
                }
            }
            Err(e) => prop_assert!(matches!(e, DoseError::ResourceExhausted { .. }), "unexpected error: {:?}", e),
        }
    }
}
