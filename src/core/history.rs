//! SQLite-backed storage of historical pressure samples.
//!
//! The sampling runtime appends one row per completed tick; the query
//! surface exists for the CLI and maintenance, not for the scoring
//! engine itself.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use log::{debug, info};
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;

use crate::core::pressure::MemorySnapshot;
use crate::error::{PressError, Result};

const SCHEMA_VERSION: i64 = 2;

const CREATE_SAMPLES_TABLE: &str = "
CREATE TABLE IF NOT EXISTS samples (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    timestamp REAL NOT NULL,
    pressure_smoothed REAL NOT NULL,
    pressure_raw REAL NOT NULL,
    page_faults REAL NOT NULL,
    available_ram_bytes INTEGER NOT NULL,
    available_ram_percent REAL NOT NULL,
    committed_bytes INTEGER NOT NULL,
    committed_ratio REAL NOT NULL,
    page_io_bytes_per_sec REAL DEFAULT 0,
    disk_read_bytes_per_sec REAL DEFAULT 0,
    disk_write_bytes_per_sec REAL DEFAULT 0,
    disk_percent_busy REAL DEFAULT 0
)";

const CREATE_TIMESTAMP_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_samples_timestamp ON samples(timestamp)";

const CREATE_META_TABLE: &str = "
CREATE TABLE IF NOT EXISTS meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)";

// Schema v1 predates the disk I/O columns
const MIGRATE_V1_TO_V2: [&str; 4] = [
    "ALTER TABLE samples ADD COLUMN page_io_bytes_per_sec REAL DEFAULT 0",
    "ALTER TABLE samples ADD COLUMN disk_read_bytes_per_sec REAL DEFAULT 0",
    "ALTER TABLE samples ADD COLUMN disk_write_bytes_per_sec REAL DEFAULT 0",
    "ALTER TABLE samples ADD COLUMN disk_percent_busy REAL DEFAULT 0",
];

/// One recorded sample as stored in the database.
#[derive(Debug, Clone, Serialize)]
pub struct SampleRow {
    pub timestamp: f64,
    pub pressure_smoothed: f64,
    pub pressure_raw: f64,
    pub page_faults: f64,
    pub available_ram_bytes: u64,
    pub available_ram_percent: f64,
    pub committed_bytes: u64,
    pub committed_ratio: f64,
    pub page_io_bytes_per_sec: f64,
    pub disk_read_bytes_per_sec: f64,
    pub disk_write_bytes_per_sec: f64,
    pub disk_percent_busy: f64,
}

/// Manages the SQLite database for historical data.
pub struct HistoryStore {
    conn: Connection,
}

impl HistoryStore {
    /// Default database location under the platform data directory.
    pub fn default_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| PressError::other("Could not determine data directory"))?;
        Ok(data_dir.join("presswatch").join("history.db"))
    }

    pub fn open_default() -> Result<Self> {
        Self::open(&Self::default_path()?)
    }

    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(db_path)?;
        let store = Self { conn };
        store.init_schema()?;

        info!("HistoryStore opened: {}", db_path.display());
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute(CREATE_SAMPLES_TABLE, [])?;
        self.conn.execute(CREATE_TIMESTAMP_INDEX, [])?;
        self.conn.execute(CREATE_META_TABLE, [])?;

        self.conn.execute(
            "INSERT OR IGNORE INTO meta (key, value) VALUES ('schema_version', '1')",
            [],
        )?;
        let current_version: i64 = self
            .conn
            .query_row(
                "SELECT value FROM meta WHERE key = 'schema_version'",
                [],
                |row| row.get::<_, String>(0),
            )?
            .parse()
            .unwrap_or(1);

        if current_version < SCHEMA_VERSION {
            self.run_migrations(current_version)?;
        }

        Ok(())
    }

    fn run_migrations(&self, from_version: i64) -> Result<()> {
        if from_version < 2 {
            info!("Migrating history schema from v1 to v2 (adding disk I/O columns)");
            for sql in MIGRATE_V1_TO_V2 {
                if let Err(e) = self.conn.execute(sql, []) {
                    // A partially-applied migration leaves some columns in
                    // place already
                    if !e.to_string().to_lowercase().contains("duplicate column") {
                        return Err(e.into());
                    }
                    debug!("Column already exists, skipping: {e}");
                }
            }
        }

        self.conn.execute(
            "UPDATE meta SET value = ?1 WHERE key = 'schema_version'",
            params![SCHEMA_VERSION.to_string()],
        )?;
        info!("History schema migrated to version {SCHEMA_VERSION}");
        Ok(())
    }

    /// Append one completed tick.
    pub fn insert_sample(
        &self,
        pressure_raw: f64,
        pressure_smoothed: f64,
        snapshot: &MemorySnapshot,
    ) -> Result<()> {
        self.conn.execute(
            "INSERT INTO samples (
                timestamp, pressure_smoothed, pressure_raw, page_faults,
                available_ram_bytes, available_ram_percent, committed_bytes,
                committed_ratio, page_io_bytes_per_sec, disk_read_bytes_per_sec,
                disk_write_bytes_per_sec, disk_percent_busy
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                snapshot.timestamp,
                pressure_smoothed,
                pressure_raw,
                snapshot.hard_faults_per_sec,
                snapshot.available_bytes as i64,
                snapshot.available_percent,
                snapshot.committed_bytes as i64,
                snapshot.committed_ratio_percent,
                snapshot.page_io_bytes_per_sec,
                snapshot.disk_read_bytes_per_sec,
                snapshot.disk_write_bytes_per_sec,
                snapshot.disk_busy_percent,
            ],
        )?;
        Ok(())
    }

    /// Samples at or after the given Unix timestamp, oldest first.
    pub fn samples_since(&self, since_timestamp: f64) -> Result<Vec<SampleRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT timestamp, pressure_smoothed, pressure_raw, page_faults,
                    available_ram_bytes, available_ram_percent, committed_bytes,
                    committed_ratio, page_io_bytes_per_sec, disk_read_bytes_per_sec,
                    disk_write_bytes_per_sec, disk_percent_busy
             FROM samples WHERE timestamp >= ?1 ORDER BY timestamp ASC",
        )?;

        let rows = stmt
            .query_map(params![since_timestamp], row_to_sample)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    /// Most recent sample, if any.
    pub fn latest_sample(&self) -> Result<Option<SampleRow>> {
        let row = self
            .conn
            .query_row(
                "SELECT timestamp, pressure_smoothed, pressure_raw, page_faults,
                        available_ram_bytes, available_ram_percent, committed_bytes,
                        committed_ratio, page_io_bytes_per_sec, disk_read_bytes_per_sec,
                        disk_write_bytes_per_sec, disk_percent_busy
                 FROM samples ORDER BY timestamp DESC LIMIT 1",
                [],
                row_to_sample,
            )
            .optional()?;

        Ok(row)
    }

    pub fn sample_count(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM samples", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Delete samples older than the retention window. Returns the number
    /// of rows removed.
    pub fn cleanup_older_than(&self, retention_days: u32) -> Result<usize> {
        let cutoff = Utc::now().timestamp_millis() as f64 / 1000.0
            - (retention_days as f64) * 86_400.0;

        let removed = self
            .conn
            .execute("DELETE FROM samples WHERE timestamp < ?1", params![cutoff])?;

        if removed > 0 {
            info!("Removed {removed} samples older than {retention_days} days");
        }
        Ok(removed)
    }
}

fn row_to_sample(row: &rusqlite::Row<'_>) -> rusqlite::Result<SampleRow> {
    Ok(SampleRow {
        timestamp: row.get(0)?,
        pressure_smoothed: row.get(1)?,
        pressure_raw: row.get(2)?,
        page_faults: row.get(3)?,
        available_ram_bytes: row.get::<_, i64>(4)? as u64,
        available_ram_percent: row.get(5)?,
        committed_bytes: row.get::<_, i64>(6)? as u64,
        committed_ratio: row.get(7)?,
        page_io_bytes_per_sec: row.get(8)?,
        disk_read_bytes_per_sec: row.get(9)?,
        disk_write_bytes_per_sec: row.get(10)?,
        disk_percent_busy: row.get(11)?,
    })
}
