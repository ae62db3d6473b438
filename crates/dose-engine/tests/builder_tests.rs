//! Tests for conflict-resolving schedule construction.

use dose_engine::timeslot::{parse_time, Day, TimeOfDay};
use dose_engine::{build, build_request, Adjustment, DoseError, ScheduleRequest, SlotRegistry};

fn day(s: &str) -> Day {
    s.parse().unwrap()
}

fn t(s: &str) -> TimeOfDay {
    parse_time(s).unwrap()
}

fn times(v: &[TimeOfDay]) -> Vec<String> {
    v.iter().map(|t| t.to_string()).collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Conflict resolution
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn free_slot_is_committed_unchanged() {
    let mut registry = SlotRegistry::new();
    let built = build(&mut registry, 1, &["Monday"], &["09:00"]).unwrap();

    assert_eq!(times(&built.schedule.dose_times), ["09:00"]);
    assert!(built.adjustments.is_empty());
    assert!(registry.contains(day("Monday"), t("09:00")));
}

#[test]
fn taken_slot_shifts_once() {
    let mut registry = SlotRegistry::new();
    registry.commit(day("Monday"), t("09:00"));

    let built = build(&mut registry, 1, &["Monday"], &["09:00"]).unwrap();

    assert_eq!(times(&built.schedule.dose_times), ["09:10"]);
    assert_eq!(
        built.adjustments,
        [Adjustment {
            day: day("Monday"),
            from: t("09:00"),
            to: t("09:10"),
        }]
    );
    assert!(registry.contains(day("Monday"), t("09:10")));
}

#[test]
fn second_dose_at_same_time_shifts() {
    let mut registry = SlotRegistry::new();
    let built = build(&mut registry, 2, &["Monday"], &["09:00", "09:00"]).unwrap();

    assert_eq!(times(&built.schedule.dose_times), ["09:00", "09:10"]);
}

#[test]
fn shift_carries_forward_to_next_day() {
    let mut registry = SlotRegistry::new();
    registry.commit(day("Monday"), t("09:00"));

    let built = build(&mut registry, 1, &["Monday", "Tuesday"], &["09:00"]).unwrap();

    // Tuesday 09:00 was free, but Tuesday is checked at the carried 09:10.
    assert_eq!(times(&built.schedule.dose_times), ["09:10"]);
    assert!(registry.contains(day("Tuesday"), t("09:10")));
    assert!(!registry.contains(day("Tuesday"), t("09:00")));
}

#[test]
fn shifts_compound_across_days() {
    let mut registry = SlotRegistry::new();
    registry.commit(day("Monday"), t("09:00"));
    registry.commit(day("Tuesday"), t("09:10"));
    registry.commit(day("Tuesday"), t("09:20"));

    let built = build(&mut registry, 1, &["Monday", "Tuesday"], &["09:00"]).unwrap();

    assert_eq!(times(&built.schedule.dose_times), ["09:30"]);
    assert_eq!(built.adjustments.len(), 3);
    assert!(registry.contains(day("Monday"), t("09:10")));
    assert!(registry.contains(day("Tuesday"), t("09:30")));
}

#[test]
fn shift_wraps_past_midnight() {
    let mut registry = SlotRegistry::new();
    registry.commit(day("Sunday"), t("23:55"));

    let built = build(&mut registry, 1, &["Sunday"], &["23:55"]).unwrap();

    assert_eq!(times(&built.schedule.dose_times), ["00:05"]);
    assert!(registry.contains(day("Sunday"), t("00:05")));
}

#[test]
fn end_to_end_two_doses_on_empty_registry() {
    let mut registry = SlotRegistry::new();
    let built = build(&mut registry, 2, &["Friday"], &["08:00", "08:00"]).unwrap();

    assert_eq!(built.schedule.dose_count, 2);
    assert_eq!(times(&built.schedule.dose_times), ["08:00", "08:10"]);
    assert_eq!(built.schedule.days, [day("Friday")]);
    assert!(registry.contains(day("Friday"), t("08:00")));
    assert!(registry.contains(day("Friday"), t("08:10")));
    assert_eq!(registry.len(), 2);
}

#[test]
fn commits_doses_times_days_slots() {
    let mut registry = SlotRegistry::new();
    let request = ScheduleRequest::new(
        ["Monday", "Wednesday", "Friday"],
        ["08:00", "14:00", "20:00"],
    );
    let built = build_request(&mut registry, &request).unwrap();

    assert_eq!(registry.len(), 9);
    assert_eq!(built.schedule.slots().count(), 9);
}

#[test]
fn day_names_are_normalized() {
    let mut registry = SlotRegistry::new();
    registry.commit(day("Monday"), t("09:00"));

    let built = build(&mut registry, 1, &["MONDAY"], &["9:00"]).unwrap();

    assert_eq!(times(&built.schedule.dose_times), ["09:10"]);
    assert_eq!(built.schedule.days[0].to_string(), "Monday");
}

// ─────────────────────────────────────────────────────────────────────────────
// Validation and failure atomicity
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn invalid_time_fails_without_committing() {
    let mut registry = SlotRegistry::new();
    let err = build(&mut registry, 2, &["Monday"], &["08:00", "8-30"]).unwrap_err();

    assert_eq!(err, DoseError::InvalidFormat("8-30".to_string()));
    assert!(registry.is_empty());
}

#[test]
fn invalid_day_is_rejected() {
    let mut registry = SlotRegistry::new();
    let err = build(&mut registry, 1, &["Someday"], &["08:00"]).unwrap_err();
    assert_eq!(err, DoseError::InvalidDay("Someday".to_string()));
}

#[test]
fn structural_errors_are_invalid_schedule() {
    let mut registry = SlotRegistry::new();
    let none: [&str; 0] = [];

    assert!(matches!(
        build(&mut registry, 0, &["Monday"], &none),
        Err(DoseError::InvalidSchedule(_))
    ));
    assert!(matches!(
        build(&mut registry, 2, &["Monday"], &["08:00"]),
        Err(DoseError::InvalidSchedule(_))
    ));
    assert!(matches!(
        build(&mut registry, 1, &none, &["08:00"]),
        Err(DoseError::InvalidSchedule(_))
    ));
    assert!(matches!(
        build(&mut registry, 1, &["Monday", "monday"], &["08:00"]),
        Err(DoseError::InvalidSchedule(_))
    ));
    assert!(registry.is_empty());
}

#[test]
fn full_day_is_resource_exhausted() {
    let mut registry = SlotRegistry::new();
    let monday = day("Monday");
    // Claim every slot reachable from 00:00 in 10-minute steps.
    for i in 0..144 {
        registry.commit(monday, TimeOfDay::from_hm(i / 6, (i % 6) * 10).unwrap());
    }

    let err = build(&mut registry, 1, &["Monday"], &["00:00"]).unwrap_err();

    assert_eq!(
        err,
        DoseError::ResourceExhausted {
            day: monday,
            requested: t("00:00"),
        }
    );
    assert_eq!(registry.len(), 144);
}

#[test]
fn off_grid_time_still_finds_a_slot_on_a_full_grid() {
    let mut registry = SlotRegistry::new();
    let monday = day("Monday");
    for i in 0..144 {
        registry.commit(monday, TimeOfDay::from_hm(i / 6, (i % 6) * 10).unwrap());
    }

    let built = build(&mut registry, 1, &["Monday"], &["00:05"]).unwrap();
    assert_eq!(times(&built.schedule.dose_times), ["00:05"]);
}

#[test]
fn exhaustion_rolls_back_earlier_commits() {
    let mut registry = SlotRegistry::new();
    let tuesday = day("Tuesday");
    for i in 0..144 {
        registry.commit(tuesday, TimeOfDay::from_hm(i / 6, (i % 6) * 10).unwrap());
    }
    let before = registry.len();

    // Monday succeeds first, then Tuesday has nowhere to go.
    let err = build(&mut registry, 2, &["Monday", "Tuesday"], &["08:00", "12:00"]).unwrap_err();

    assert!(matches!(err, DoseError::ResourceExhausted { .. }));
    assert_eq!(registry.len(), before);
    assert!(!registry.contains(day("Monday"), t("08:00")));
}
