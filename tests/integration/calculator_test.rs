use presswatch::core::config::MonitorConfig;
use presswatch::core::pressure::{MemorySnapshot, PressureCalculator};

/// Config whose smoothing buffer holds exactly `samples` entries.
fn config_with_buffer(samples: u64) -> MonitorConfig {
    MonitorConfig {
        sampling_interval_secs: 60,
        smoothing_window_minutes: samples,
        ..Default::default()
    }
}

#[test]
fn test_smoothed_pressure_is_zero_without_samples() {
    let calculator = PressureCalculator::new(&MonitorConfig::default());
    assert_eq!(calculator.smoothed_pressure(), 0.0);
}

#[test]
fn test_smoothing_is_arithmetic_mean() {
    let config = config_with_buffer(10);
    let mut calculator = PressureCalculator::new(&config);

    calculator.add_sample(10.0);
    calculator.add_sample(20.0);
    let smoothed = calculator.add_sample(30.0);

    assert!((smoothed - 20.0).abs() < 1e-9);
}

#[test]
fn test_buffer_evicts_oldest_beyond_capacity() {
    let config = config_with_buffer(3);
    assert_eq!(config.smoothing_samples(), 3);

    let mut calculator = PressureCalculator::new(&config);

    // Fill past capacity; only the last three samples may count
    for score in [0.0, 0.0, 0.0, 30.0, 60.0] {
        calculator.add_sample(score);
    }
    let smoothed = calculator.add_sample(90.0);

    assert!((smoothed - 60.0).abs() < 1e-9);
}

#[test]
fn test_event_opens_on_crossing_and_closes_below_yellow() {
    // Buffer of one sample makes the smoothed score track raw directly
    let config = config_with_buffer(1);
    let mut calculator = PressureCalculator::new(&config);

    calculator.add_sample(50.0);
    assert!(calculator.current_event().is_none());

    // Crossing the yellow threshold (default 60) opens exactly one event
    calculator.add_sample(70.0);
    let event = calculator.current_event().expect("event should be open");
    assert!(event.ended_at.is_none());
    assert_eq!(event.peak_score, 70.0);
    assert_eq!(event.average_score, 70.0);

    calculator.add_sample(90.0);
    let event = calculator.current_event().unwrap();
    assert_eq!(event.peak_score, 90.0);
    assert!((event.average_score - 80.0).abs() < 1e-9);

    // Peak never decreases while the event stays open
    calculator.add_sample(65.0);
    let event = calculator.current_event().unwrap();
    assert_eq!(event.peak_score, 90.0);
    assert!((event.average_score - 75.0).abs() < 1e-9);

    // First sample below yellow closes and discards the event
    calculator.add_sample(50.0);
    assert!(calculator.current_event().is_none());
}

#[test]
fn test_event_average_uses_running_stats_over_long_events() {
    let config = config_with_buffer(1);
    let mut calculator = PressureCalculator::new(&config);

    let mut sum = 0.0;
    for i in 0..10_000u32 {
        let score = 60.0 + (i % 40) as f64;
        calculator.add_sample(score);
        sum += score;
    }

    let event = calculator.current_event().expect("event should be open");
    let expected = sum / 10_000.0;
    assert!((event.average_score - expected).abs() < 1e-6);
    assert_eq!(event.peak_score, 99.0);
}

#[test]
fn test_reset_clears_buffer_and_open_event() {
    let config = config_with_buffer(5);
    let mut calculator = PressureCalculator::new(&config);

    for _ in 0..5 {
        calculator.add_sample(95.0);
    }
    assert!(calculator.current_event().is_some());

    calculator.reset();

    assert_eq!(calculator.smoothed_pressure(), 0.0);
    assert!(calculator.current_event().is_none());

    // The ring keeps its configured capacity after a reset
    for score in [0.0, 0.0, 0.0, 0.0, 0.0, 100.0] {
        calculator.add_sample(score);
    }
    assert!((calculator.smoothed_pressure() - 20.0).abs() < 1e-9);
}

#[test]
fn test_end_to_end_scoring_extremes() {
    let config = MonitorConfig::default();
    let mut calculator = PressureCalculator::new(&config);

    let idle = MemorySnapshot {
        hard_faults_per_sec: 0.0,
        available_percent: 100.0,
        committed_ratio_percent: 0.0,
        ..Default::default()
    };
    let raw = calculator.calculate_raw_pressure(&idle);
    assert_eq!(raw, 0.0);
    assert_eq!(calculator.add_sample(raw), 0.0);

    let mut calculator = PressureCalculator::new(&config);
    let saturated = MemorySnapshot {
        hard_faults_per_sec: 1000.0,
        available_percent: 0.0,
        committed_ratio_percent: 100.0,
        ..Default::default()
    };
    let raw = calculator.calculate_raw_pressure(&saturated);
    assert!((raw - 100.0).abs() < 1e-9);
    assert!((calculator.add_sample(raw) - 100.0).abs() < 1e-9);
}
