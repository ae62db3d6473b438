//! Wall-clock sources.
//!
//! Everything runs on the host's local time; there is no timezone conversion.

use std::sync::Mutex;

use chrono::{Datelike, Duration, Local, NaiveDateTime};

use crate::timeslot::{Day, TimeOfDay};

pub trait Clock: Send + Sync {
    /// Current local date and time.
    fn now(&self) -> NaiveDateTime;

    /// Current weekday and minute, the coordinates a slot is matched on.
    fn slot_now(&self) -> (Day, TimeOfDay) {
        slot_of(self.now())
    }
}

/// The weekday and minute of `at`.
pub fn slot_of(at: NaiveDateTime) -> (Day, TimeOfDay) {
    (Day::from(at.weekday()), TimeOfDay::from(at.time()))
}

/// The host's local clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A manually driven clock for tests and simulations.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<NaiveDateTime>,
}

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: NaiveDateTime) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}
