use presswatch::core::config::MonitorConfig;
use tempfile::TempDir;

#[test]
fn test_config_default_values() {
    let config = MonitorConfig::default();

    assert_eq!(config.sampling_interval_secs, 5);
    assert_eq!(config.smoothing_window_minutes, 5);
    assert_eq!(config.thresholds.yellow, 60.0);
    assert_eq!(config.thresholds.red, 80.0);
    assert_eq!(config.metric_weights.page_faults, 0.5);
    assert_eq!(config.metric_weights.available_ram, 0.3);
    assert_eq!(config.metric_weights.committed_ratio, 0.2);
    assert_eq!(config.data_retention_days, 30);
    assert!(!config.verbose_logging);
}

#[test]
fn test_smoothing_samples_from_window_and_interval() {
    let config = MonitorConfig {
        sampling_interval_secs: 5,
        smoothing_window_minutes: 5,
        ..Default::default()
    };
    assert_eq!(config.smoothing_samples(), 60);

    let config = MonitorConfig {
        sampling_interval_secs: 60,
        smoothing_window_minutes: 3,
        ..Default::default()
    };
    assert_eq!(config.smoothing_samples(), 3);
}

#[test]
fn test_smoothing_samples_never_below_one() {
    let config = MonitorConfig {
        sampling_interval_secs: 600,
        smoothing_window_minutes: 1,
        ..Default::default()
    };
    assert_eq!(config.smoothing_samples(), 1);

    // A zero interval must not divide by zero
    let config = MonitorConfig {
        sampling_interval_secs: 0,
        smoothing_window_minutes: 5,
        ..Default::default()
    };
    assert!(config.smoothing_samples() >= 1);
}

#[test]
fn test_config_save_and_load_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");

    let config = MonitorConfig {
        sampling_interval_secs: 10,
        smoothing_window_minutes: 2,
        data_retention_days: 7,
        verbose_logging: true,
        ..Default::default()
    };
    config.save_to(&path).unwrap();

    let loaded = MonitorConfig::load_from(&path).unwrap();
    assert_eq!(loaded.sampling_interval_secs, 10);
    assert_eq!(loaded.smoothing_window_minutes, 2);
    assert_eq!(loaded.data_retention_days, 7);
    assert!(loaded.verbose_logging);
}

#[test]
fn test_missing_file_yields_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("does-not-exist.json");

    let config = MonitorConfig::load_from(&path).unwrap();
    assert_eq!(config.sampling_interval_secs, 5);
}

#[test]
fn test_corrupted_file_yields_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");
    std::fs::write(&path, "{ not json at all").unwrap();

    let config = MonitorConfig::load_from(&path).unwrap();
    assert_eq!(config.thresholds.yellow, 60.0);
}

#[test]
fn test_empty_file_yields_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");
    std::fs::write(&path, "   \n").unwrap();

    let config = MonitorConfig::load_from(&path).unwrap();
    assert_eq!(config.data_retention_days, 30);
}

#[test]
fn test_partial_file_merges_with_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{"sampling_interval_secs": 2, "thresholds": {"yellow": 55.0}}"#,
    )
    .unwrap();

    let config = MonitorConfig::load_from(&path).unwrap();
    assert_eq!(config.sampling_interval_secs, 2);
    assert_eq!(config.thresholds.yellow, 55.0);
    // Keys absent from the file keep their defaults
    assert_eq!(config.thresholds.red, 80.0);
    assert_eq!(config.metric_weights.page_faults, 0.5);
}

#[test]
fn test_unknown_keys_are_ignored() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{"sampling_interval_secs": 3, "some_future_option": true}"#,
    )
    .unwrap();

    let config = MonitorConfig::load_from(&path).unwrap();
    assert_eq!(config.sampling_interval_secs, 3);
}
