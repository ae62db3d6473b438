//! `medtrack` — track medicines and get reminded when a dose is due.
//!
//! ## Usage
//!
//! ```sh
//! # Start the interactive shell (reminders are checked every 60 seconds)
//! medtrack
//!
//! # Check more often and show scheduling decisions on stderr
//! medtrack --tick-secs 15 --log-level info
//! ```
//!
//! Inside the shell:
//!
//! ```text
//! add aspirin --days Monday,Friday --times 08:00,20:00
//! show aspirin --json
//! reschedule aspirin --days Tuesday --times 09:00
//! rename aspirin --to paracetamol --days Monday --times 08:00
//! delete paracetamol
//! history
//! exit
//! ```

mod shell;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use dose_engine::{MedicineCabinet, ReminderScanner, ScannerConfig, SystemClock};
use log::{error, info};
use tokio::io::AsyncWriteExt;
use tokio::sync::{mpsc, watch};

use crate::shell::Flow;

#[derive(Parser)]
#[command(
    name = "medtrack",
    version,
    about = "Medicine tracker with conflict-free dose slots and reminders"
)]
struct Cli {
    /// Seconds between reminder scans
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u64).range(1..))]
    tick_secs: u64,

    /// Log filter used when RUST_LOG is unset (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&cli.log_level))
        .init();

    let cabinet = MedicineCabinet::new().into_shared();

    // Reminder scanner runs alongside the shell and prints due doses as they come in.
    let (reminder_tx, mut reminder_rx) = mpsc::unbounded_channel();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let scanner = ReminderScanner::new(
        cabinet.clone(),
        Arc::new(SystemClock),
        reminder_tx,
        ScannerConfig {
            tick: Duration::from_secs(cli.tick_secs),
        },
    );
    let scanner_handle = tokio::spawn(scanner.run(shutdown_rx));
    let printer_handle = tokio::spawn(async move {
        while let Some(reminder) = reminder_rx.recv().await {
            println!("{}", reminder);
        }
    });

    println!("Welcome to medtrack. Type 'help' for commands, 'exit' to quit.");

    let mut lines = spawn_stdin_reader();
    let mut stdout = tokio::io::stdout();
    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let line = tokio::select! {
            line = lines.recv() => line.transpose().context("Failed to read from stdin")?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            break;
        };

        match shell::run_line(&cabinet, &line).await {
            Ok(Flow::Continue) => {}
            Ok(Flow::Exit) => break,
            Err(e) => error!("{e:#}"),
        }
    }

    info!("Shutting down reminder scanner");
    // The scanner may already be gone if it stopped on its own; nothing to signal then.
    let _ = shutdown_tx.send(true);
    scanner_handle
        .await
        .context("Reminder scanner task failed")?;
    printer_handle
        .await
        .context("Reminder printer task failed")?;

    println!("Goodbye!");
    Ok(())
}

/// Read stdin lines on a plain thread and forward them to the shell.
///
/// A blocking stdin read cannot be cancelled, so it stays off the runtime; the thread is
/// left behind on Ctrl-C and ends with the process.
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<std::io::Result<String>> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}
