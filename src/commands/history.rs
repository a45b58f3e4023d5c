//! History command handler.
//!
//! Queries the recorded samples and runs retention cleanup.

use anyhow::{Context, Result};
use chrono::{Local, TimeZone, Utc};
use clap::ArgMatches;

use crate::core::config::MonitorConfig;
use crate::core::history::HistoryStore;
use crate::ui::format_percent;

/// Execute the history command
pub fn execute(matches: &ArgMatches) -> Result<()> {
    let config = MonitorConfig::load()?;
    let store = HistoryStore::open_default().context("Failed to open history store")?;

    if matches.get_flag("cleanup") {
        let removed = store.cleanup_older_than(config.data_retention_days)?;
        println!(
            "Removed {} samples older than {} days",
            removed, config.data_retention_days
        );
        return Ok(());
    }

    let hours = matches.get_one::<u64>("hours").copied().unwrap_or(24);
    let since = Utc::now().timestamp_millis() as f64 / 1000.0 - (hours as f64) * 3600.0;

    let mut rows = store.samples_since(since)?;

    if let Some(limit) = matches.get_one::<usize>("limit").copied() {
        // Keep the most recent entries
        if rows.len() > limit {
            rows.drain(..rows.len() - limit);
        }
    }

    if matches.get_flag("json") {
        for row in &rows {
            println!("{}", serde_json::to_string(row)?);
        }
        return Ok(());
    }

    if rows.is_empty() {
        println!("No samples recorded in the last {hours}h");
        return Ok(());
    }

    for row in &rows {
        let when = Utc
            .timestamp_millis_opt((row.timestamp * 1000.0) as i64)
            .single()
            .map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| format!("{:.0}", row.timestamp));

        println!(
            "{}  smoothed {}  raw {}  faults {:.1}/s  avail {}  commit {}",
            when,
            format_percent(row.pressure_smoothed),
            format_percent(row.pressure_raw),
            row.page_faults,
            format_percent(row.available_ram_percent),
            format_percent(row.committed_ratio),
        );
    }
    println!("{} samples", rows.len());

    Ok(())
}
