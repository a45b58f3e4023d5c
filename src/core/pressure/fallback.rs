//! Degraded-mode hard-fault estimation.
//!
//! When the performance counter interface is down, the collector derives
//! an approximate fault rate from swap traffic deltas instead. This is a
//! proxy (swap I/O, not genuine hard faults) and reads noticeably lower
//! fidelity than the primary source.

use std::time::Instant;

const PAGE_SIZE_BYTES: f64 = 4096.0;

/// Estimates hard faults per second from cumulative swap byte counters.
#[derive(Debug, Default)]
pub struct SwapFaultEstimator {
    last_total_swap_bytes: Option<u64>,
    last_sample_at: Option<Instant>,
}

impl SwapFaultEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the current cumulative swap-in/out byte counters and get an
    /// estimated fault rate.
    ///
    /// The first call only establishes a baseline and returns 0. A
    /// non-positive elapsed time (clock adjustment, duplicate tick) also
    /// returns 0 without advancing state, so one bad reading cannot
    /// poison the next rate.
    pub fn estimate(&mut self, swap_in_bytes: u64, swap_out_bytes: u64, now: Instant) -> f64 {
        let current_total = swap_in_bytes.saturating_add(swap_out_bytes);

        if let (Some(last_total), Some(last_at)) = (self.last_total_swap_bytes, self.last_sample_at)
        {
            let elapsed = now.saturating_duration_since(last_at).as_secs_f64();
            if elapsed <= 0.0 {
                return 0.0;
            }

            let delta_bytes = current_total.saturating_sub(last_total) as f64;
            let delta_pages = delta_bytes / PAGE_SIZE_BYTES;
            let faults_per_sec = (delta_pages / elapsed).max(0.0);

            self.last_total_swap_bytes = Some(current_total);
            self.last_sample_at = Some(now);

            return faults_per_sec;
        }

        // First sample - store baseline for the next calculation
        self.last_total_swap_bytes = Some(current_total);
        self.last_sample_at = Some(now);
        0.0
    }
}
