//! Sample command handler.
//!
//! One synchronous collection plus its raw pressure score, without
//! starting the background runtime.

use anyhow::{bail, Result};
use clap::ArgMatches;
use serde::Serialize;

use crate::core::config::MonitorConfig;
use crate::core::pressure::{MemorySnapshot, MetricsCollector, PressureCalculator, PressureTier};
use crate::ui::{format_bytes, format_percent, tier_label};

#[derive(Serialize)]
struct SampleOutput {
    raw_score: f64,
    tier: PressureTier,
    snapshot: MemorySnapshot,
}

/// Execute the sample command
pub fn execute(matches: &ArgMatches) -> Result<()> {
    let config = MonitorConfig::load()?;
    let calculator = PressureCalculator::new(&config);
    let mut collector = MetricsCollector::new();

    let Some(snapshot) = collector.collect() else {
        bail!("Metric collection returned nothing for this tick; try again");
    };

    let raw_score = calculator.calculate_raw_pressure(&snapshot);
    let tier = calculator.classify(raw_score);

    if matches.get_flag("json") {
        let output = SampleOutput {
            raw_score,
            tier,
            snapshot,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Pressure:       {} ({})", format_percent(raw_score), tier_label(tier));
    println!(
        "Hard faults:    {:.1}/s",
        snapshot.hard_faults_per_sec
    );
    println!(
        "Available RAM:  {} of {} ({})",
        format_bytes(snapshot.available_bytes),
        format_bytes(snapshot.total_bytes),
        format_percent(snapshot.available_percent),
    );
    println!(
        "Committed:      {} of {} ({})",
        format_bytes(snapshot.committed_bytes),
        format_bytes(snapshot.commit_limit_bytes),
        format_percent(snapshot.committed_ratio_percent),
    );
    println!(
        "Paging I/O:     {}/s ({} of disk I/O)",
        format_bytes(snapshot.page_io_bytes_per_sec as u64),
        format_percent(snapshot.page_io_percent()),
    );
    println!(
        "Disk:           read {}/s, write {}/s, busy {}",
        format_bytes(snapshot.disk_read_bytes_per_sec as u64),
        format_bytes(snapshot.disk_write_bytes_per_sec as u64),
        format_percent(snapshot.disk_busy_percent),
    );

    Ok(())
}
