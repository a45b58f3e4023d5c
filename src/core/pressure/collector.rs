//! Memory metrics collection.
//!
//! Orchestrates the primary counter source and the swap-based fallback
//! estimator into one immutable snapshot per sampling tick. The core
//! reliability policy lives here: accurate source first, proxy second,
//! and auxiliary disk metrics degrade to zero instead of failing the
//! snapshot.

use std::time::Instant;

use chrono::Utc;
use log::{debug, warn};
use sysinfo::{MemoryRefreshKind, RefreshKind, System};

use super::counters::PerfCounterSource;
use super::fallback::SwapFaultEstimator;
use super::snapshot::MemorySnapshot;

const PAGE_SIZE_BYTES: f64 = 4096.0;

/// Collects memory metrics from the OS.
pub struct MetricsCollector {
    system: System,
    counters: PerfCounterSource,
    estimator: SwapFaultEstimator,
}

impl MetricsCollector {
    pub fn new() -> Self {
        let refresh_kind = RefreshKind::nothing().with_memory(MemoryRefreshKind::everything());

        Self {
            system: System::new_with_specifics(refresh_kind),
            counters: PerfCounterSource::new(),
            estimator: SwapFaultEstimator::new(),
        }
    }

    /// Collect current memory metrics.
    ///
    /// Returns None when the basic virtual-memory query fails; that is
    /// fatal for this tick only, and the caller is expected to keep
    /// sampling. Counter-source failures are not fatal: the fault rate
    /// falls back to the swap estimator and disk metrics zero out.
    pub fn collect(&mut self) -> Option<MemorySnapshot> {
        let timestamp = Utc::now().timestamp_millis() as f64 / 1000.0;

        self.system.refresh_memory();

        let total = self.system.total_memory();
        let available = self.system.available_memory();
        if total == 0 {
            warn!("Virtual-memory totals unavailable; skipping this tick");
            return None;
        }
        let available_percent = (available as f64 / total as f64) * 100.0;

        // "used" memory stands in for committed; the exact commit charge
        // is not exposed through the portable interface
        let committed = total.saturating_sub(available);

        // Commit limit from the counter source, degrading to total RAM so
        // the ratio stays defined
        let commit_limit = self.counters.read_commit_limit_bytes().unwrap_or(total);
        let committed_ratio = if commit_limit > 0 {
            (committed as f64 / commit_limit as f64) * 100.0
        } else {
            0.0
        };

        let memory_counters = self.counters.read_memory_counters();

        let hard_faults_per_sec = match memory_counters {
            Some(c) => c.hard_faults_per_sec,
            None => {
                // The portable interface only reports swap occupancy, so
                // occupancy growth stands in for cumulative swap traffic
                let swap_used = self.system.used_swap();
                let estimated = self.estimator.estimate(swap_used, 0, Instant::now());
                debug!("Counter source down, estimated {estimated:.1} faults/sec from swap");
                estimated
            }
        };

        let page_io_bytes_per_sec = memory_counters
            .map(|c| (c.pages_in_per_sec + c.pages_out_per_sec) * PAGE_SIZE_BYTES)
            .unwrap_or(0.0);

        // Disk metrics are auxiliary breakdown, not scoring input; a dead
        // source zeroes them rather than dropping the snapshot
        let (disk_read, disk_write, disk_busy_raw) = match self.counters.read_disk_counters() {
            Some(d) => (d.read_bytes_per_sec, d.write_bytes_per_sec, d.percent_busy_raw),
            None => (0.0, 0.0, 0.0),
        };

        Some(MemorySnapshot {
            timestamp,
            hard_faults_per_sec,
            available_bytes: available,
            available_percent,
            committed_bytes: committed,
            commit_limit_bytes: commit_limit,
            committed_ratio_percent: committed_ratio,
            total_bytes: total,
            page_io_bytes_per_sec,
            disk_read_bytes_per_sec: disk_read,
            disk_write_bytes_per_sec: disk_write,
            disk_busy_percent: disk_busy_raw.clamp(0.0, 100.0),
        })
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}
