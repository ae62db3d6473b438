//! The medicine list, its schedules, claimed slots and change history.
//!
//! A [`MedicineCabinet`] owns every piece of mutable scheduling state, so a single lock
//! around it (see [`SharedCabinet`]) is enough to keep builds atomic with respect to the
//! reminder scanner. Every mutating operation either completes fully or leaves the
//! cabinet untouched.

use std::sync::Arc;

use log::info;
use tokio::sync::RwLock;

use crate::builder::{build_request, BuiltSchedule, Schedule, ScheduleRequest};
use crate::clock::{Clock, SystemClock};
use crate::error::{DoseError, Result};
use crate::history::{History, HistoryAction, HistoryEvent};
use crate::registry::SlotRegistry;
use crate::store::ScheduleStore;

/// Cabinet shared between the command loop and the reminder scanner.
pub type SharedCabinet = Arc<RwLock<MedicineCabinet>>;

/// Normalize a medicine name into its identifier: trimmed and lowercased.
pub fn medicine_id(name: &str) -> Result<String> {
    let id = name.trim().to_lowercase();
    if id.is_empty() {
        return Err(DoseError::InvalidName(
            "medicine name cannot be empty".to_string(),
        ));
    }
    Ok(id)
}

pub struct MedicineCabinet {
    medicines: Vec<String>,
    store: ScheduleStore,
    registry: SlotRegistry,
    history: History,
    clock: Arc<dyn Clock>,
}

impl Default for MedicineCabinet {
    fn default() -> Self {
        Self::new()
    }
}

impl MedicineCabinet {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Use `clock` to timestamp history events.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            medicines: Vec::new(),
            store: ScheduleStore::new(),
            registry: SlotRegistry::new(),
            history: History::default(),
            clock,
        }
    }

    /// Wrap in the lock shared with the reminder scanner.
    pub fn into_shared(self) -> SharedCabinet {
        Arc::new(RwLock::new(self))
    }

    /// Add a new medicine and build its schedule.
    ///
    /// Nothing is recorded unless the schedule builds.
    pub fn add(&mut self, name: &str, request: &ScheduleRequest) -> Result<BuiltSchedule> {
        let id = medicine_id(name)?;
        if self.contains(&id) {
            return Err(DoseError::DuplicateMedicine(id));
        }

        let built = build_request(&mut self.registry, request)?;
        self.store.put(id.clone(), built.schedule.clone());
        self.medicines.push(id.clone());
        self.record(&id, HistoryAction::Added);
        info!("Added {} with {} doses per day", id, built.schedule.dose_count);
        Ok(built)
    }

    /// Replace `old` with a new medicine named `new`, scheduled from `request`.
    ///
    /// The old medicine's slots are available to the new schedule.
    pub fn rename(
        &mut self,
        old: &str,
        new: &str,
        request: &ScheduleRequest,
    ) -> Result<BuiltSchedule> {
        let old_id = medicine_id(old)?;
        let new_id = medicine_id(new)?;
        if !self.contains(&old_id) {
            return Err(DoseError::NotFound(old_id));
        }
        if new_id == old_id {
            return Err(DoseError::InvalidName(
                "new medicine name cannot be the same as the old one".to_string(),
            ));
        }
        if self.contains(&new_id) {
            return Err(DoseError::DuplicateMedicine(new_id));
        }

        let built = self.rebuild(&old_id, request)?;
        self.store.remove(&old_id);
        self.store.put(new_id.clone(), built.schedule.clone());
        self.medicines.retain(|m| m != &old_id);
        self.medicines.push(new_id.clone());

        self.record(&old_id, HistoryAction::Deleted);
        self.record(&new_id, HistoryAction::Added);
        self.record(&old_id, HistoryAction::Renamed { to: new_id.clone() });
        info!("Renamed {} to {}", old_id, new_id);
        Ok(built)
    }

    /// Replace a medicine's schedule, releasing the slots it held.
    pub fn reschedule(
        &mut self,
        name: &str,
        request: &ScheduleRequest,
    ) -> Result<BuiltSchedule> {
        let id = medicine_id(name)?;
        if !self.contains(&id) {
            return Err(DoseError::NotFound(id));
        }

        let built = self.rebuild(&id, request)?;
        self.store.put(id.clone(), built.schedule.clone());
        self.record(&id, HistoryAction::Updated);
        info!("Rescheduled {}", id);
        Ok(built)
    }

    /// Delete a medicine together with its schedule and slots.
    pub fn remove(&mut self, name: &str) -> Result<()> {
        let id = medicine_id(name)?;
        if !self.contains(&id) {
            return Err(DoseError::NotFound(id));
        }

        if let Some(schedule) = self.store.remove(&id) {
            release(&mut self.registry, &schedule);
        }
        self.medicines.retain(|m| m != &id);
        self.record(&id, HistoryAction::Deleted);
        info!("Deleted {}", id);
        Ok(())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.medicines.iter().any(|m| m == id)
    }

    /// Current medicine identifiers in the order they were added.
    pub fn medicines(&self) -> &[String] {
        &self.medicines
    }

    pub fn schedule(&self, name: &str) -> Result<&Schedule> {
        self.store.get(&medicine_id(name)?)
    }

    pub fn store(&self) -> &ScheduleStore {
        &self.store
    }

    pub fn registry(&self) -> &SlotRegistry {
        &self.registry
    }

    pub fn history(&self) -> &[HistoryEvent] {
        self.history.events()
    }

    /// Build a replacement for `id`'s schedule with its current slots freed.
    ///
    /// On failure the old slots are claimed again and the error is returned.
    fn rebuild(&mut self, id: &str, request: &ScheduleRequest) -> Result<BuiltSchedule> {
        let previous = self.store.get(id).ok().cloned();
        if let Some(schedule) = &previous {
            release(&mut self.registry, schedule);
        }

        build_request(&mut self.registry, request).inspect_err(|_| {
            if let Some(schedule) = &previous {
                for slot in schedule.slots() {
                    self.registry.commit(slot.day, slot.time);
                }
            }
        })
    }

    fn record(&mut self, medicine: &str, action: HistoryAction) {
        let at = self.clock.now();
        self.history.record(medicine, action, at);
    }
}

fn release(registry: &mut SlotRegistry, schedule: &Schedule) {
    for slot in schedule.slots() {
        registry.release(slot.day, slot.time);
    }
}
