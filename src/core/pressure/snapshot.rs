use serde::{Deserialize, Serialize};

/// Immutable memory metrics snapshot, produced once per sampling tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemorySnapshot {
    /// Wall-clock capture time (Unix epoch seconds)
    pub timestamp: f64,
    /// Page reads caused by faults that had to hit disk. Soft faults
    /// resolved in memory are excluded.
    pub hard_faults_per_sec: f64,
    pub available_bytes: u64,
    pub available_percent: f64,
    pub committed_bytes: u64,
    pub commit_limit_bytes: u64,
    /// committed / limit * 100; may exceed 100 if the limit estimate is stale
    pub committed_ratio_percent: f64,
    pub total_bytes: u64,
    /// Disk I/O directly attributable to paging
    pub page_io_bytes_per_sec: f64,
    pub disk_read_bytes_per_sec: f64,
    pub disk_write_bytes_per_sec: f64,
    /// Aggregate physical-disk busy time, clamped to [0,100]
    pub disk_busy_percent: f64,
}

impl MemorySnapshot {
    /// Total disk I/O (reads + writes) in bytes per second.
    pub fn total_disk_io_bytes_per_sec(&self) -> f64 {
        self.disk_read_bytes_per_sec + self.disk_write_bytes_per_sec
    }

    /// Non-paging disk I/O (total - page I/O) in bytes per second.
    pub fn regular_io_bytes_per_sec(&self) -> f64 {
        (self.total_disk_io_bytes_per_sec() - self.page_io_bytes_per_sec).max(0.0)
    }

    /// Percentage of disk I/O that is paging-related.
    pub fn page_io_percent(&self) -> f64 {
        let total = self.total_disk_io_bytes_per_sec();
        if total <= 0.0 {
            return 0.0;
        }
        ((self.page_io_bytes_per_sec / total) * 100.0).min(100.0)
    }

    /// Percentage of disk I/O that is regular (non-paging).
    pub fn regular_io_percent(&self) -> f64 {
        100.0 - self.page_io_percent()
    }
}
