//! Append-only log of medicine list changes.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum HistoryAction {
    Added,
    Deleted,
    /// The schedule was replaced.
    Updated,
    /// The medicine was replaced by one with a new name.
    Renamed { to: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEvent {
    pub medicine: String,
    #[serde(flatten)]
    pub action: HistoryAction,
    pub at: NaiveDateTime,
}

impl fmt::Display for HistoryEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let at = self.at.format("%Y-%m-%d %H:%M:%S");
        match &self.action {
            HistoryAction::Added => write!(f, "{} [Added on {}]", self.medicine, at),
            HistoryAction::Deleted => write!(f, "{} [Deleted on {}]", self.medicine, at),
            HistoryAction::Updated => write!(f, "{} [Updated on {}]", self.medicine, at),
            HistoryAction::Renamed { to } => {
                write!(f, "{} -> {} [Updated on {}]", self.medicine, to, at)
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct History {
    events: Vec<HistoryEvent>,
}

impl History {
    pub fn record(
        &mut self,
        medicine: impl Into<String>,
        action: HistoryAction,
        at: NaiveDateTime,
    ) {
        self.events.push(HistoryEvent {
            medicine: medicine.into(),
            action,
            at,
        });
    }

    pub fn events(&self) -> &[HistoryEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
