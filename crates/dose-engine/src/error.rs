//! Error types for dose-engine operations.

use thiserror::Error;

use crate::timeslot::{Day, TimeOfDay};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DoseError {
    /// A time string that is not `H:mm` / `HH:mm` within 00:00-23:59.
    #[error("Invalid time format: '{0}' (use HH:mm)")]
    InvalidFormat(String),

    #[error("Invalid day: '{0}' (use a weekday name such as Monday)")]
    InvalidDay(String),

    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),

    /// Every slot in a full day cycle is taken for this day.
    #[error("No free slot on {day} starting from {requested}")]
    ResourceExhausted { day: Day, requested: TimeOfDay },

    #[error("Invalid medicine name: {0}")]
    InvalidName(String),

    #[error("Medicine not found: {0}")]
    NotFound(String),

    #[error("Medicine already exists: {0}")]
    DuplicateMedicine(String),
}

pub type Result<T> = std::result::Result<T, DoseError>;
