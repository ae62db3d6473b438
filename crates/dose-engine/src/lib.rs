//! # dose-engine
//!
//! Conflict-free dose scheduling and periodic dose reminders.
//!
//! Every dose of every medicine claims one (weekday, time) slot. When a requested slot is
//! already taken, the dose time moves forward in 10-minute steps until it finds a free one.
//! A background scanner compares the local clock against every schedule once per tick and
//! emits a reminder for each dose that is due.
//!
//! ## Quick start
//!
//! ```rust
//! use dose_engine::{build, SlotRegistry};
//!
//! let mut registry = SlotRegistry::new();
//! let built = build(&mut registry, 2, &["Friday"], &["08:00", "08:00"]).unwrap();
//!
//! let times: Vec<String> = built.schedule.dose_times.iter().map(|t| t.to_string()).collect();
//! assert_eq!(times, ["08:00", "08:10"]);
//! assert_eq!(registry.len(), 2);
//! ```
//!
//! ## Modules
//!
//! - [`timeslot`] — `HH:mm` parsing, wrapping minute arithmetic, weekday names
//! - [`registry`] — Set of claimed (day, time) slots
//! - [`builder`] — Conflict-resolving schedule construction
//! - [`store`] — Medicine → schedule mapping
//! - [`scanner`] — Due-dose matching and the periodic reminder loop
//! - [`cabinet`] — Medicine list, schedules, slots and history behind one lock
//! - [`history`] — Append-only change log
//! - [`clock`] — System and manually driven clocks
//! - [`error`] — Error types

pub mod builder;
pub mod cabinet;
pub mod clock;
pub mod error;
pub mod history;
pub mod registry;
pub mod scanner;
pub mod store;
pub mod timeslot;

pub use builder::{build, build_request, Adjustment, BuiltSchedule, Schedule, ScheduleRequest};
pub use cabinet::{medicine_id, MedicineCabinet, SharedCabinet};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::DoseError;
pub use history::{HistoryAction, HistoryEvent};
pub use registry::{SlotKey, SlotRegistry};
pub use scanner::{scan, Reminder, ReminderScanner, ScannerConfig};
pub use store::ScheduleStore;
pub use timeslot::{add_minutes, parse_time, Day, TimeOfDay};
