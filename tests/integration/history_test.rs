use presswatch::core::history::HistoryStore;
use presswatch::core::pressure::MemorySnapshot;
use tempfile::TempDir;

fn snapshot_at(timestamp: f64) -> MemorySnapshot {
    MemorySnapshot {
        timestamp,
        hard_faults_per_sec: 12.5,
        available_bytes: 4 * 1024 * 1024 * 1024,
        available_percent: 25.0,
        committed_bytes: 12 * 1024 * 1024 * 1024,
        committed_ratio_percent: 75.0,
        total_bytes: 16 * 1024 * 1024 * 1024,
        commit_limit_bytes: 16 * 1024 * 1024 * 1024,
        page_io_bytes_per_sec: 51_200.0,
        disk_read_bytes_per_sec: 1_000_000.0,
        disk_write_bytes_per_sec: 500_000.0,
        disk_busy_percent: 40.0,
        ..Default::default()
    }
}

#[test]
fn test_open_creates_database_and_parent_dirs() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("nested").join("history.db");

    let store = HistoryStore::open(&db_path).unwrap();
    assert!(db_path.exists());
    assert_eq!(store.sample_count().unwrap(), 0);
}

#[test]
fn test_insert_and_read_back_sample() {
    let temp_dir = TempDir::new().unwrap();
    let store = HistoryStore::open(&temp_dir.path().join("history.db")).unwrap();

    store
        .insert_sample(72.0, 65.5, &snapshot_at(1_700_000_000.0))
        .unwrap();

    assert_eq!(store.sample_count().unwrap(), 1);

    let row = store.latest_sample().unwrap().expect("row should exist");
    assert_eq!(row.timestamp, 1_700_000_000.0);
    assert_eq!(row.pressure_raw, 72.0);
    assert_eq!(row.pressure_smoothed, 65.5);
    assert_eq!(row.page_faults, 12.5);
    assert_eq!(row.available_ram_bytes, 4 * 1024 * 1024 * 1024);
    assert_eq!(row.available_ram_percent, 25.0);
    assert_eq!(row.committed_ratio, 75.0);
    assert_eq!(row.disk_percent_busy, 40.0);
}

#[test]
fn test_samples_since_filters_and_orders_ascending() {
    let temp_dir = TempDir::new().unwrap();
    let store = HistoryStore::open(&temp_dir.path().join("history.db")).unwrap();

    // Insert out of order; queries must come back oldest first
    for ts in [300.0, 100.0, 200.0] {
        store.insert_sample(10.0, 10.0, &snapshot_at(ts)).unwrap();
    }

    let rows = store.samples_since(150.0).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].timestamp, 200.0);
    assert_eq!(rows[1].timestamp, 300.0);

    let all = store.samples_since(0.0).unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].timestamp, 100.0);
}

#[test]
fn test_latest_sample_none_when_empty() {
    let temp_dir = TempDir::new().unwrap();
    let store = HistoryStore::open(&temp_dir.path().join("history.db")).unwrap();

    assert!(store.latest_sample().unwrap().is_none());
}

#[test]
fn test_cleanup_removes_only_expired_rows() {
    let temp_dir = TempDir::new().unwrap();
    let store = HistoryStore::open(&temp_dir.path().join("history.db")).unwrap();

    let now = chrono::Utc::now().timestamp_millis() as f64 / 1000.0;
    let forty_days_ago = now - 40.0 * 86_400.0;

    store.insert_sample(5.0, 5.0, &snapshot_at(forty_days_ago)).unwrap();
    store.insert_sample(6.0, 6.0, &snapshot_at(now)).unwrap();

    let removed = store.cleanup_older_than(30).unwrap();
    assert_eq!(removed, 1);
    assert_eq!(store.sample_count().unwrap(), 1);

    let remaining = store.latest_sample().unwrap().unwrap();
    assert_eq!(remaining.pressure_raw, 6.0);
}

#[test]
fn test_data_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("history.db");

    {
        let store = HistoryStore::open(&db_path).unwrap();
        store.insert_sample(33.0, 30.0, &snapshot_at(500.0)).unwrap();
    }

    let store = HistoryStore::open(&db_path).unwrap();
    assert_eq!(store.sample_count().unwrap(), 1);
    assert_eq!(store.latest_sample().unwrap().unwrap().pressure_raw, 33.0);
}
