use std::time::Duration;

use presswatch::core::config::MonitorConfig;
use presswatch::core::history::HistoryStore;
use presswatch::core::pressure::PressureRuntime;
use tempfile::TempDir;

fn fast_config() -> MonitorConfig {
    MonitorConfig {
        sampling_interval_secs: 1,
        smoothing_window_minutes: 1,
        ..Default::default()
    }
}

#[test]
fn test_runtime_publishes_updates() {
    let mut runtime = PressureRuntime::new(fast_config(), None).unwrap();

    let update = runtime
        .next_update(Duration::from_secs(10))
        .expect("a tick should complete within the timeout");

    assert!(update.raw_score >= 0.0 && update.raw_score <= 100.0);
    assert!(update.smoothed_score >= 0.0 && update.smoothed_score <= 100.0);
    assert!(update.snapshot.total_bytes > 0);
    assert!(update.snapshot.timestamp > 0.0);

    // The last published value stays readable after consumption
    assert!(runtime.latest().is_some());

    runtime.shutdown();
}

#[test]
fn test_runtime_shutdown_is_prompt() {
    let runtime = PressureRuntime::new(fast_config(), None).unwrap();

    let started = std::time::Instant::now();
    runtime.shutdown();
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[test]
fn test_runtime_records_to_history_store() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("history.db");
    let store = HistoryStore::open(&db_path).unwrap();

    let mut runtime = PressureRuntime::new(fast_config(), Some(store)).unwrap();
    let update = runtime.next_update(Duration::from_secs(10));
    runtime.shutdown();

    // The store moved into the runtime; reopen to inspect what it wrote
    let store = HistoryStore::open(&db_path).unwrap();
    if update.is_some() {
        assert!(store.sample_count().unwrap() >= 1);
        let row = store.latest_sample().unwrap().unwrap();
        assert!(row.pressure_raw >= 0.0 && row.pressure_raw <= 100.0);
    }
}
