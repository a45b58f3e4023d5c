//! Adapter over the OS's formatted performance counters.
//!
//! The underlying interface is thread-affine: a handle initialized on one
//! thread cannot be queried from another. The adapter tracks its owning
//! thread and transparently reinitializes when the caller changes, so both
//! the one-shot synchronous read and the sampling loop can share it.
//! Every failure is reported as an empty read, never an error to the
//! caller; the next tick retries initialization independently.

use std::thread::{self, ThreadId};

use log::{debug, warn};
use parking_lot::Mutex;

/// Per-second memory counters from the primary source.
#[derive(Debug, Clone, Copy)]
pub struct MemoryCounters {
    /// Page reads resolved from disk (hard faults)
    pub hard_faults_per_sec: f64,
    /// Pages read in from disk per second
    pub pages_in_per_sec: f64,
    /// Pages written out to disk per second
    pub pages_out_per_sec: f64,
}

/// Aggregate physical-disk counters from the primary source.
#[derive(Debug, Clone, Copy)]
pub struct DiskCounters {
    pub read_bytes_per_sec: f64,
    pub write_bytes_per_sec: f64,
    /// Busy time of the `_Total` disk instance. Can exceed 100 on
    /// multi-disk systems; clamping is the collector's job, not ours.
    pub percent_busy_raw: f64,
}

struct SourceState {
    owner: Option<ThreadId>,
    available: bool,
}

/// Lazily-initialized, internally-synchronized counter source.
pub struct PerfCounterSource {
    state: Mutex<SourceState>,
}

impl PerfCounterSource {
    pub fn new() -> Self {
        debug!("PerfCounterSource created (interface initialized lazily)");
        Self {
            state: Mutex::new(SourceState {
                owner: None,
                available: false,
            }),
        }
    }

    /// Ensure the counter interface is usable from the current thread.
    ///
    /// Returns false when the interface is missing or initialization
    /// failed; the owner is left unset in that case so the next call
    /// retries from scratch.
    fn ensure_ready(&self) -> bool {
        let mut state = self.state.lock();
        let current = thread::current().id();

        if state.owner != Some(current) {
            if state.owner.is_some() {
                debug!(
                    "Reinitializing counter source for {:?} (was {:?})",
                    current, state.owner
                );
            }

            match platform::initialize() {
                Ok(()) => {
                    state.owner = Some(current);
                    state.available = true;
                    debug!("Counter source initialized on {:?}", current);
                }
                Err(e) => {
                    state.owner = None;
                    state.available = false;
                    warn!("Performance counter interface unavailable: {}", e);
                }
            }
        }

        state.available
    }

    /// Read memory performance counters, or None if the source is down.
    pub fn read_memory_counters(&self) -> Option<MemoryCounters> {
        if !self.ensure_ready() {
            return None;
        }

        match platform::query_memory_counters() {
            Ok(counters) => Some(counters),
            Err(e) => {
                debug!("Memory counter query failed: {}", e);
                None
            }
        }
    }

    /// Read aggregate physical-disk counters, or None if the source is down.
    pub fn read_disk_counters(&self) -> Option<DiskCounters> {
        if !self.ensure_ready() {
            return None;
        }

        match platform::query_disk_counters() {
            Ok(counters) => Some(counters),
            Err(e) => {
                debug!("Disk counter query failed: {}", e);
                None
            }
        }
    }

    /// Read the system commit limit (RAM + page file capacity) in bytes.
    pub fn read_commit_limit_bytes(&self) -> Option<u64> {
        if !self.ensure_ready() {
            return None;
        }

        match platform::query_commit_limit_bytes() {
            Ok(limit) => Some(limit),
            Err(e) => {
                debug!("Commit limit query failed: {}", e);
                None
            }
        }
    }
}

impl Default for PerfCounterSource {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(windows)]
mod platform {
    use serde::de::DeserializeOwned;
    use serde::Deserialize;

    use crate::error::{PressError, Result};

    use super::{DiskCounters, MemoryCounters};

    #[derive(Debug, Deserialize)]
    struct PerfOsMemoryPs {
        #[serde(rename = "PageReadsPersec")]
        page_reads_per_sec: Option<f64>,
        #[serde(rename = "PagesInputPersec")]
        pages_input_per_sec: Option<f64>,
        #[serde(rename = "PagesOutputPersec")]
        pages_output_per_sec: Option<f64>,
    }

    #[derive(Debug, Deserialize)]
    struct PerfDiskPhysicalPs {
        #[serde(rename = "DiskReadBytesPersec")]
        disk_read_bytes_per_sec: Option<f64>,
        #[serde(rename = "DiskWriteBytesPersec")]
        disk_write_bytes_per_sec: Option<f64>,
        #[serde(rename = "PercentDiskTime")]
        percent_disk_time: Option<f64>,
    }

    #[derive(Debug, Deserialize)]
    struct OperatingSystemPs {
        #[serde(rename = "TotalVirtualMemorySize")]
        total_virtual_memory_kb: Option<u64>,
    }

    fn run_powershell_json<T: DeserializeOwned>(command: &str) -> Result<T> {
        use std::process::Command;
        let output = Command::new("powershell")
            .args(["-NoProfile", "-Command", command])
            .output()
            .map_err(|e| PressError::counter_source(format!("PowerShell execution failed: {e}")))?;

        let stdout = String::from_utf8_lossy(&output.stdout);

        // ConvertTo-Json emits an array for multiple instances and a bare
        // object for one; normalize to the first instance.
        let value: serde_json::Value = serde_json::from_str(&stdout).map_err(|e| {
            PressError::counter_source(format!("JSON parsing failed: {e}. Output: {stdout}"))
        })?;
        let instance = match value {
            serde_json::Value::Array(mut arr) if !arr.is_empty() => arr.remove(0),
            serde_json::Value::Array(_) => {
                return Err(PressError::counter_source("query returned no instances"))
            }
            other => other,
        };

        serde_json::from_value(instance)
            .map_err(|e| PressError::counter_source(format!("Unexpected counter shape: {e}")))
    }

    pub fn initialize() -> Result<()> {
        // Probe with the cheapest query; failure here means missing
        // interface, permissions, or a transient provider error.
        let _: OperatingSystemPs = run_powershell_json(
            "Get-CimInstance Win32_OperatingSystem \
             | Select TotalVirtualMemorySize | ConvertTo-Json",
        )?;
        Ok(())
    }

    pub fn query_memory_counters() -> Result<MemoryCounters> {
        let perf: PerfOsMemoryPs = run_powershell_json(
            "Get-CimInstance Win32_PerfFormattedData_PerfOS_Memory \
             | Select PageReadsPersec, PagesInputPersec, PagesOutputPersec \
             | ConvertTo-Json",
        )?;

        Ok(MemoryCounters {
            hard_faults_per_sec: perf.page_reads_per_sec.unwrap_or(0.0),
            pages_in_per_sec: perf.pages_input_per_sec.unwrap_or(0.0),
            pages_out_per_sec: perf.pages_output_per_sec.unwrap_or(0.0),
        })
    }

    pub fn query_disk_counters() -> Result<DiskCounters> {
        let perf: PerfDiskPhysicalPs = run_powershell_json(
            "Get-CimInstance Win32_PerfFormattedData_PerfDisk_PhysicalDisk \
             -Filter \"Name='_Total'\" \
             | Select DiskReadBytesPersec, DiskWriteBytesPersec, PercentDiskTime \
             | ConvertTo-Json",
        )?;

        Ok(DiskCounters {
            read_bytes_per_sec: perf.disk_read_bytes_per_sec.unwrap_or(0.0),
            write_bytes_per_sec: perf.disk_write_bytes_per_sec.unwrap_or(0.0),
            percent_busy_raw: perf.percent_disk_time.unwrap_or(0.0),
        })
    }

    pub fn query_commit_limit_bytes() -> Result<u64> {
        let os: OperatingSystemPs = run_powershell_json(
            "Get-CimInstance Win32_OperatingSystem \
             | Select TotalVirtualMemorySize | ConvertTo-Json",
        )?;

        os.total_virtual_memory_kb
            .map(|kb| kb * 1024)
            .ok_or_else(|| PressError::counter_source("TotalVirtualMemorySize missing"))
    }
}

#[cfg(not(windows))]
mod platform {
    use crate::error::{PressError, Result};

    use super::{DiskCounters, MemoryCounters};

    pub fn initialize() -> Result<()> {
        Err(PressError::counter_source(
            "formatted performance counters are only available on Windows",
        ))
    }

    pub fn query_memory_counters() -> Result<MemoryCounters> {
        Err(PressError::counter_source("not available on this platform"))
    }

    pub fn query_disk_counters() -> Result<DiskCounters> {
        Err(PressError::counter_source("not available on this platform"))
    }

    pub fn query_commit_limit_bytes() -> Result<u64> {
        Err(PressError::counter_source("not available on this platform"))
    }
}
