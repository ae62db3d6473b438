//! Line commands for the interactive shell.
//!
//! Each input line is split on whitespace and parsed by clap as one subcommand. Engine
//! errors (bad times, unknown medicines, ...) are printed and the shell carries on.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use dose_engine::{BuiltSchedule, MedicineCabinet, Schedule, ScheduleRequest, SharedCabinet};

/// What the shell should do after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

#[derive(Parser)]
#[command(name = "medtrack", no_binary_name = true, disable_version_flag = true)]
struct Line {
    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct ScheduleArgs {
    /// Comma-separated weekdays, e.g. Monday,Friday
    #[arg(long, value_delimiter = ',', required = true)]
    days: Vec<String>,
    /// Comma-separated dose times (HH:mm); one dose per time
    #[arg(long, value_delimiter = ',', required = true)]
    times: Vec<String>,
}

impl ScheduleArgs {
    fn request(&self) -> ScheduleRequest {
        ScheduleRequest::new(self.days.iter().cloned(), self.times.iter().cloned())
    }
}

#[derive(Subcommand)]
enum Command {
    /// Add a medicine with its dosing schedule
    Add {
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
        #[command(flatten)]
        schedule: ScheduleArgs,
    },
    /// List current medicines
    List,
    /// Replace a medicine with a newly named one and a new schedule
    Rename {
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
        /// New medicine name
        #[arg(long, required = true, num_args = 1..)]
        to: Vec<String>,
        #[command(flatten)]
        schedule: ScheduleArgs,
    },
    /// Delete a medicine and free its slots
    Delete {
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },
    /// Replace the schedule of an existing medicine
    Reschedule {
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
        #[command(flatten)]
        schedule: ScheduleArgs,
    },
    /// Show the schedule of a medicine
    Show {
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show every add, update and delete so far
    History {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show every claimed day-time slot
    Slots,
    /// Leave the shell
    #[command(alias = "quit")]
    Exit,
}

/// Parse and execute one input line.
pub async fn run_line(cabinet: &SharedCabinet, line: &str) -> Result<Flow> {
    let words: Vec<&str> = line.split_whitespace().collect();
    if words.is_empty() {
        return Ok(Flow::Continue);
    }

    let parsed = match Line::try_parse_from(words) {
        Ok(parsed) => parsed,
        Err(e) => {
            // Covers `help` and `<cmd> --help` as well as genuine usage errors.
            e.print().context("Failed to print usage")?;
            return Ok(Flow::Continue);
        }
    };

    match parsed.command {
        Command::Add { name, schedule } => {
            let name = name.join(" ");
            let result = cabinet.write().await.add(&name, &schedule.request());
            match result {
                Ok(built) => {
                    print_adjustments(&built);
                    println!("Medicine {} added successfully.", name.trim().to_lowercase());
                    println!("{}", schedule_line(&built.schedule));
                }
                Err(e) => println!("Error: {e}"),
            }
        }
        Command::List => {
            let cabinet = cabinet.read().await;
            print_medicines(&cabinet, "No medicines available to view.");
        }
        Command::Rename { name, to, schedule } => {
            let (old, new) = (name.join(" "), to.join(" "));
            let result = cabinet.write().await.rename(&old, &new, &schedule.request());
            match result {
                Ok(built) => {
                    print_adjustments(&built);
                    println!(
                        "Medicine updated successfully from {} to {}.",
                        old.trim().to_lowercase(),
                        new.trim().to_lowercase()
                    );
                    println!("{}", schedule_line(&built.schedule));
                }
                Err(e) => println!("Error: {e}"),
            }
        }
        Command::Delete { name } => {
            let name = name.join(" ");
            match cabinet.write().await.remove(&name) {
                Ok(()) => println!(
                    "Medicine {} deleted successfully.",
                    name.trim().to_lowercase()
                ),
                Err(e) => println!("Error: {e}"),
            }
        }
        Command::Reschedule { name, schedule } => {
            let name = name.join(" ");
            let result = cabinet.write().await.reschedule(&name, &schedule.request());
            match result {
                Ok(built) => {
                    print_adjustments(&built);
                    println!(
                        "Schedule for {} updated successfully.",
                        name.trim().to_lowercase()
                    );
                    println!("{}", schedule_line(&built.schedule));
                }
                Err(e) => println!("Error: {e}"),
            }
        }
        Command::Show { name, json } => {
            let name = name.join(" ");
            let cabinet = cabinet.read().await;
            match cabinet.schedule(&name) {
                Ok(schedule) if json => {
                    let value = serde_json::json!({
                        "medicine": name.trim().to_lowercase(),
                        "schedule": schedule,
                    });
                    println!("{}", serde_json::to_string_pretty(&value)?);
                }
                Ok(schedule) => print_schedule(&name.trim().to_lowercase(), schedule),
                Err(_) => println!("No schedule found for {}.", name.trim().to_lowercase()),
            }
        }
        Command::History { json } => {
            let cabinet = cabinet.read().await;
            if json {
                println!("{}", serde_json::to_string_pretty(cabinet.history())?);
            } else if cabinet.history().is_empty() {
                println!("No medicine history available.");
            } else {
                println!("Medicine History:");
                for event in cabinet.history() {
                    println!("- {}", event);
                }
                println!("Current Medicines:");
                print_medicines(&cabinet, "No current medicines.");
            }
        }
        Command::Slots => {
            let cabinet = cabinet.read().await;
            if cabinet.registry().is_empty() {
                println!("No slots claimed.");
            } else {
                println!("Claimed slots:");
                for key in cabinet.registry().keys() {
                    println!("- {}", key);
                }
            }
        }
        Command::Exit => return Ok(Flow::Exit),
    }

    Ok(Flow::Continue)
}

fn print_adjustments(built: &BuiltSchedule) {
    for adj in &built.adjustments {
        println!("Conflict on {} at {}, adjusted to {}", adj.day, adj.from, adj.to);
    }
}

fn print_medicines(cabinet: &MedicineCabinet, empty: &str) {
    if cabinet.medicines().is_empty() {
        println!("{}", empty);
        return;
    }
    for medicine in cabinet.medicines() {
        println!("- {}", medicine);
    }
}

fn print_schedule(medicine: &str, schedule: &Schedule) {
    println!("Schedule for {}:", medicine);
    println!("  Doses per day: {}", schedule.dose_count);
    println!("  Dose times: {}", join(&schedule.dose_times));
    println!("  Days: {}", join(&schedule.days));
    let slots: Vec<String> = schedule.slots().map(|s| s.to_string()).collect();
    println!("  Slots: {}", slots.join(", "));
}

fn schedule_line(schedule: &Schedule) -> String {
    format!(
        "Doses at {} on {}",
        join(&schedule.dose_times),
        join(&schedule.days)
    )
}

fn join<T: std::fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
