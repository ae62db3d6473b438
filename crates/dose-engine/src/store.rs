//! Medicine identifier → current [`Schedule`].

use std::collections::BTreeMap;

use crate::builder::Schedule;
use crate::error::{DoseError, Result};

#[derive(Debug, Clone, Default)]
pub struct ScheduleStore {
    schedules: BTreeMap<String, Schedule>,
}

impl ScheduleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace, returning the schedule that was replaced.
    pub fn put(&mut self, medicine: impl Into<String>, schedule: Schedule) -> Option<Schedule> {
        self.schedules.insert(medicine.into(), schedule)
    }

    pub fn get(&self, medicine: &str) -> Result<&Schedule> {
        self.schedules
            .get(medicine)
            .ok_or_else(|| DoseError::NotFound(medicine.to_string()))
    }

    pub fn remove(&mut self, medicine: &str) -> Option<Schedule> {
        self.schedules.remove(medicine)
    }

    /// All (identifier, schedule) pairs, ordered by identifier.
    pub fn all(&self) -> impl Iterator<Item = (&str, &Schedule)> {
        self.schedules.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.schedules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schedules.is_empty()
    }
}
