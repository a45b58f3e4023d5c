//! Watch command handler.
//!
//! Runs the background sampling runtime and prints one status line per
//! completed tick until interrupted.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use clap::ArgMatches;
use log::warn;

use crate::core::config::MonitorConfig;
use crate::core::history::HistoryStore;
use crate::core::pressure::{PressureRuntime, PressureUpdate};
use crate::ui::{format_bytes, format_percent, tier_label};

/// How often the foreground loop wakes up to check the interrupt flag
const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Execute the watch command
pub fn execute(matches: &ArgMatches) -> Result<()> {
    let mut config = MonitorConfig::load()?;
    if let Some(interval) = matches.get_one::<u64>("interval") {
        config.sampling_interval_secs = (*interval).max(1);
    }
    let json_output = matches.get_flag("json");

    let history = if matches.get_flag("no-history") {
        None
    } else {
        match HistoryStore::open_default() {
            Ok(store) => Some(store),
            Err(e) => {
                warn!("History store unavailable, samples will not be recorded: {e}");
                None
            }
        }
    };

    let mut runtime =
        PressureRuntime::new(config, history).context("Failed to start sampling runtime")?;

    let running = Arc::new(AtomicBool::new(true));
    let flag = running.clone();
    ctrlc::set_handler(move || flag.store(false, Ordering::SeqCst))
        .context("Failed to install Ctrl-C handler")?;

    while running.load(Ordering::SeqCst) {
        if let Some(update) = runtime.next_update(POLL_INTERVAL) {
            if json_output {
                println!("{}", serde_json::to_string(update.as_ref())?);
            } else {
                print_status_line(&update);
            }
        }
    }

    runtime.shutdown();
    Ok(())
}

fn print_status_line(update: &PressureUpdate) {
    let snapshot = &update.snapshot;

    println!(
        "[{}] {} {} (raw {}) | faults {:.1}/s | avail {} ({}) | commit {}",
        Local::now().format("%H:%M:%S"),
        tier_label(update.tier),
        format_percent(update.smoothed_score),
        format_percent(update.raw_score),
        snapshot.hard_faults_per_sec,
        format_bytes(snapshot.available_bytes),
        format_percent(snapshot.available_percent),
        format_percent(snapshot.committed_ratio_percent),
    );
}
