//! Build conflict-free dose schedules against a [`SlotRegistry`].
//!
//! Each requested dose time is placed on every scheduled day in input order. When the
//! (day, time) slot is already claimed the time moves forward by [`SHIFT_MINUTES`]
//! until a free slot turns up, and the shifted time carries over to the next day.
//! A dose therefore ends with a single committed time shared by all its days.
//!
//! The search for one (dose, day) pair stops after a full day cycle. A failed build
//! releases every slot it claimed, so the registry is left exactly as it was found.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::{DoseError, Result};
use crate::registry::{SlotKey, SlotRegistry};
use crate::timeslot::{add_minutes, parse_time, Day, TimeOfDay, SHIFT_MINUTES};

/// Number of distinct times a shifting dose can visit before coming back to its start.
const SHIFTS_PER_CYCLE: usize = (24 * 60 / SHIFT_MINUTES) as usize;

/// One medicine's dosing plan with its committed, collision-free times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub dose_count: usize,
    pub dose_times: Vec<TimeOfDay>,
    pub days: Vec<Day>,
}

impl Schedule {
    /// Whether this schedule has doses on `day`.
    pub fn applies_on(&self, day: Day) -> bool {
        self.days.contains(&day)
    }

    /// Every (day, time) slot this schedule occupies.
    pub fn slots(&self) -> impl Iterator<Item = SlotKey> + '_ {
        self.days.iter().flat_map(move |&day| {
            self.dose_times
                .iter()
                .map(move |&time| SlotKey::new(day, time))
        })
    }
}

/// A dose time that moved because its slot was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adjustment {
    pub day: Day,
    pub from: TimeOfDay,
    pub to: TimeOfDay,
}

/// The result of a successful build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltSchedule {
    pub schedule: Schedule,
    /// Every shift applied, in the order it happened.
    pub adjustments: Vec<Adjustment>,
}

/// User-supplied schedule parameters, still unparsed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScheduleRequest {
    pub dose_count: usize,
    pub days: Vec<String>,
    pub times: Vec<String>,
}

impl ScheduleRequest {
    /// One dose per requested time.
    pub fn new<D, T>(days: D, times: T) -> Self
    where
        D: IntoIterator,
        D::Item: Into<String>,
        T: IntoIterator,
        T::Item: Into<String>,
    {
        let times: Vec<String> = times.into_iter().map(Into::into).collect();
        Self {
            dose_count: times.len(),
            days: days.into_iter().map(Into::into).collect(),
            times,
        }
    }
}

/// Build a schedule from a [`ScheduleRequest`]. See [`build`].
pub fn build_request(
    registry: &mut SlotRegistry,
    request: &ScheduleRequest,
) -> Result<BuiltSchedule> {
    build(
        registry,
        request.dose_count,
        &request.days[..],
        &request.times[..],
    )
}

/// Allocate slots for `dose_count` doses on `days`, starting from `requested_times`.
///
/// Commits `dose_count * days.len()` slots on success.
///
/// # Errors
/// - [`DoseError::InvalidSchedule`] if `dose_count` is zero, `requested_times` has a
///   different length, `days` is empty, or a day appears twice.
/// - [`DoseError::InvalidDay`] if a day is not a weekday name.
/// - [`DoseError::InvalidFormat`] if a requested time is not `HH:mm`.
/// - [`DoseError::ResourceExhausted`] if a day has no free slot in a full cycle.
///
/// No slot is committed when an error is returned.
pub fn build<D, T>(
    registry: &mut SlotRegistry,
    dose_count: usize,
    days: &[D],
    requested_times: &[T],
) -> Result<BuiltSchedule>
where
    D: AsRef<str>,
    T: AsRef<str>,
{
    if dose_count == 0 {
        return Err(DoseError::InvalidSchedule(
            "number of doses must be positive".to_string(),
        ));
    }
    if requested_times.len() != dose_count {
        return Err(DoseError::InvalidSchedule(format!(
            "expected {} dose times, got {}",
            dose_count,
            requested_times.len()
        )));
    }
    if days.is_empty() {
        return Err(DoseError::InvalidSchedule(
            "at least one day is required".to_string(),
        ));
    }

    let mut parsed_days: Vec<Day> = Vec::with_capacity(days.len());
    for raw in days {
        let day: Day = raw.as_ref().parse()?;
        if parsed_days.contains(&day) {
            return Err(DoseError::InvalidSchedule(format!(
                "{} is listed more than once",
                day
            )));
        }
        parsed_days.push(day);
    }

    // Parse every time up front so a bad entry can't leave earlier doses committed.
    let parsed_times = requested_times
        .iter()
        .map(|t| parse_time(t.as_ref()))
        .collect::<Result<Vec<_>>>()?;

    let mut committed: Vec<SlotKey> = Vec::with_capacity(dose_count * parsed_days.len());
    let mut adjustments = Vec::new();
    let mut dose_times = Vec::with_capacity(dose_count);

    for requested in parsed_times {
        let placed = place_dose(
            registry,
            &parsed_days,
            requested,
            &mut committed,
            &mut adjustments,
        );
        match placed {
            Ok(time) => dose_times.push(time),
            Err(e) => {
                for key in &committed {
                    registry.release(key.day, key.time);
                }
                debug!("rolled back {} slots after failed build", committed.len());
                return Err(e);
            }
        }
    }

    Ok(BuiltSchedule {
        schedule: Schedule {
            dose_count,
            dose_times,
            days: parsed_days,
        },
        adjustments,
    })
}

/// Place one dose on every day, carrying shifts forward. Returns the final time.
fn place_dose(
    registry: &mut SlotRegistry,
    days: &[Day],
    requested: TimeOfDay,
    committed: &mut Vec<SlotKey>,
    adjustments: &mut Vec<Adjustment>,
) -> Result<TimeOfDay> {
    let mut time = requested;

    for &day in days {
        let start = time;
        let mut shifts = 0;
        while registry.contains(day, time) {
            shifts += 1;
            if shifts >= SHIFTS_PER_CYCLE {
                return Err(DoseError::ResourceExhausted {
                    day,
                    requested: start,
                });
            }
            let next = add_minutes(time, SHIFT_MINUTES);
            info!("Conflict on {} at {}, adjusted to {}", day, time, next);
            adjustments.push(Adjustment {
                day,
                from: time,
                to: next,
            });
            time = next;
        }

        registry.commit(day, time);
        committed.push(SlotKey::new(day, time));
    }

    Ok(time)
}
