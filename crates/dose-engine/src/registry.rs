//! The set of claimed (day, time) slots.
//!
//! A slot belongs to at most one dose across every medicine in a cabinet. Keys are
//! built from the canonical [`Day`], so `monday` and `MONDAY` claim the same slot.

use std::collections::BTreeSet;
use std::fmt;

use crate::timeslot::{Day, TimeOfDay};

/// One claimed slot. Renders as `"<Day>-<HH:mm>"`, e.g. `Monday-09:00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotKey {
    pub day: Day,
    pub time: TimeOfDay,
}

impl SlotKey {
    pub fn new(day: Day, time: TimeOfDay) -> Self {
        Self { day, time }
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.day, self.time)
    }
}

/// Claimed slots, ordered by weekday then time.
#[derive(Debug, Clone, Default)]
pub struct SlotRegistry {
    slots: BTreeSet<SlotKey>,
}

impl SlotRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, day: Day, time: TimeOfDay) -> bool {
        self.slots.contains(&SlotKey::new(day, time))
    }

    /// Claim a slot. Committing an already-claimed key is a no-op.
    pub fn commit(&mut self, day: Day, time: TimeOfDay) {
        self.slots.insert(SlotKey::new(day, time));
    }

    /// Free a slot. Returns `false` if it was not claimed.
    pub fn release(&mut self, day: Day, time: TimeOfDay) -> bool {
        self.slots.remove(&SlotKey::new(day, time))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &SlotKey> {
        self.slots.iter()
    }
}
