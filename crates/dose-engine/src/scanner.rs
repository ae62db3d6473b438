//! Periodic matching of stored schedules against the clock.
//!
//! [`scan`] is the pure matching step: given the current weekday and minute, it returns a
//! [`Reminder`] for every dose that is due. [`ReminderScanner`] runs that scan on a fixed
//! interval against a [`SharedCabinet`] and delivers reminders over a channel. It never
//! delivers the same (medicine, dose time) twice within one minute, so any tick period works.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;

use crate::cabinet::SharedCabinet;
use crate::clock::{slot_of, Clock};
use crate::store::ScheduleStore;
use crate::timeslot::{Day, TimeOfDay};

/// Default period between scans.
pub const DEFAULT_TICK: Duration = Duration::from_secs(60);

/// Shortest period the scanner accepts.
pub const MIN_TICK: Duration = Duration::from_millis(1);

/// A dose that is due now.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reminder {
    pub medicine: String,
    pub day: Day,
    pub dose_time: TimeOfDay,
}

impl fmt::Display for Reminder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Reminder: It's time to take your medicine: {} at {}",
            self.medicine, self.dose_time
        )
    }
}

/// Find every dose due at `time` on `day`.
///
/// A schedule matches when it includes `day`; each of its dose times equal to `time`
/// yields one reminder. Results follow the store's iteration order.
pub fn scan(store: &ScheduleStore, day: Day, time: TimeOfDay) -> Vec<Reminder> {
    store
        .all()
        .filter(|(_, schedule)| schedule.applies_on(day))
        .flat_map(|(medicine, schedule)| {
            schedule
                .dose_times
                .iter()
                .filter(move |&&t| t == time)
                .map(move |&t| Reminder {
                    medicine: medicine.to_string(),
                    day,
                    dose_time: t,
                })
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScannerConfig {
    /// Time between scans.
    pub tick: Duration,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self { tick: DEFAULT_TICK }
    }
}

/// Background reminder loop over a shared cabinet.
pub struct ReminderScanner {
    cabinet: SharedCabinet,
    clock: Arc<dyn Clock>,
    sink: mpsc::UnboundedSender<Reminder>,
    config: ScannerConfig,
    /// The minute the `fired` set belongs to.
    current_minute: Option<(NaiveDate, TimeOfDay)>,
    fired: HashSet<(String, TimeOfDay)>,
}

impl ReminderScanner {
    /// A `config.tick` shorter than [`MIN_TICK`] is raised to it.
    pub fn new(
        cabinet: SharedCabinet,
        clock: Arc<dyn Clock>,
        sink: mpsc::UnboundedSender<Reminder>,
        mut config: ScannerConfig,
    ) -> Self {
        if config.tick < MIN_TICK {
            warn!(
                "Scanner tick {:?} is below the minimum, using {:?}",
                config.tick, MIN_TICK
            );
            config.tick = MIN_TICK;
        }
        Self {
            cabinet,
            clock,
            sink,
            config,
            current_minute: None,
            fired: HashSet::new(),
        }
    }

    pub fn config(&self) -> ScannerConfig {
        self.config
    }

    /// Run one full scan and deliver new reminders. Returns how many were delivered.
    pub async fn tick(&mut self) -> usize {
        let now = self.clock.now();
        let (day, time) = slot_of(now);

        let minute = (now.date(), time);
        if self.current_minute != Some(minute) {
            self.current_minute = Some(minute);
            self.fired.clear();
        }

        let due = {
            let cabinet = self.cabinet.read().await;
            debug!(
                "Scanning {} schedules at {} {}",
                cabinet.store().len(),
                day,
                time
            );
            scan(cabinet.store(), day, time)
        };

        let mut delivered = 0;
        for reminder in due {
            if !self.fired.insert((reminder.medicine.clone(), reminder.dose_time)) {
                continue;
            }
            info!("Dose due: {} at {}", reminder.medicine, reminder.dose_time);
            if let Err(e) = self.sink.send(reminder) {
                warn!("Failed to deliver reminder: {e}");
                continue;
            }
            delivered += 1;
        }
        delivered
    }

    /// Scan every `config.tick` until `shutdown` turns true or its sender is dropped.
    ///
    /// Shutdown is only observed between ticks; a started scan always finishes. The loop
    /// also ends as soon as the reminder receiver is gone.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = tokio::time::interval(self.config.tick);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            "Reminder scanner started (interval: {:?})",
            self.config.tick
        );

        loop {
            if *shutdown.borrow() || self.sink.is_closed() {
                break;
            }
            tokio::select! {
                _ = interval.tick() => {
                    self.tick().await;
                }
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                _ = self.sink.closed() => break,
            }
        }

        info!("Reminder scanner stopped");
    }
}
