//! Pressure scoring.
//!
//! Normalizes the collected metrics onto a 0-100 scale, combines them
//! with configured weights, smooths the result over a rolling window,
//! and tracks sustained high-pressure periods with running statistics.

use std::collections::VecDeque;

use chrono::Utc;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::core::config::{MetricWeights, MonitorConfig, Thresholds};

use super::snapshot::MemorySnapshot;

/// Extra pressure per point of available RAM below the 50% mark.
/// Kept at 1.0 so the curve continues linearly through the breakpoint.
const LOW_RAM_STEEPENING: f64 = 1.0;

/// Pressure tier for display and alert-style classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PressureTier {
    Green,
    Yellow,
    Red,
}

/// A sustained period of smoothed pressure at or above the yellow
/// threshold. At most one event is open at a time; closed events are
/// logged and discarded, persistence is a collaborator's concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PressureEvent {
    /// Unix epoch seconds
    pub started_at: f64,
    /// None while the event is still open
    pub ended_at: Option<f64>,
    pub peak_score: f64,
    pub average_score: f64,
}

/// Normalize hard page faults to 0-100 using logarithmic compression.
///
/// 0/sec scores 0, 10/sec about 35, 100/sec about 67, and 1000+/sec
/// saturates at 100. Healthy systems sit near 0-5/sec; genuine pressure
/// spikes into the hundreds.
pub fn normalize_page_faults(faults_per_sec: f64) -> f64 {
    if faults_per_sec <= 0.0 {
        return 0.0;
    }

    let normalized = ((faults_per_sec + 1.0).log10() / 1001.0_f64.log10()) * 100.0;
    normalized.clamp(0.0, 100.0)
}

/// Normalize available RAM percentage to pressure (inverse: low RAM means
/// high pressure). Linear down to the 50% mark, then steepened by
/// [`LOW_RAM_STEEPENING`] toward 100.
pub fn normalize_available_ram(available_percent: f64) -> f64 {
    if available_percent >= 50.0 {
        100.0 - available_percent
    } else {
        let additional = (50.0 - available_percent) * LOW_RAM_STEEPENING;
        (50.0 + additional).min(100.0)
    }
}

/// Normalize the committed-memory ratio to pressure.
///
/// Linear up to 80% (scoring 60 there), then a steeper slope approaching
/// the commit limit: 100% committed scores 100.
pub fn normalize_committed_ratio(committed_ratio: f64) -> f64 {
    if committed_ratio <= 0.0 {
        return 0.0;
    }

    if committed_ratio < 80.0 {
        committed_ratio * 0.75
    } else {
        let additional = ((committed_ratio - 80.0) / 20.0) * 40.0;
        (60.0 + additional).min(100.0)
    }
}

/// Calculates memory pressure scores from collected snapshots.
///
/// Owns the smoothing ring buffer and the (at most one) open pressure
/// event. Not internally synchronized; the sampling task is expected to
/// be the sole writer.
pub struct PressureCalculator {
    weights: MetricWeights,
    thresholds: Thresholds,
    buffer: VecDeque<f64>,
    buffer_capacity: usize,
    current_event: Option<PressureEvent>,
    event_sample_count: u64,
    event_sample_sum: f64,
}

impl PressureCalculator {
    pub fn new(config: &MonitorConfig) -> Self {
        let buffer_capacity = config.smoothing_samples();
        debug!("PressureCalculator initialized with buffer size {buffer_capacity}");

        Self {
            weights: config.metric_weights,
            thresholds: config.thresholds,
            buffer: VecDeque::with_capacity(buffer_capacity),
            buffer_capacity,
            current_event: None,
            event_sample_count: 0,
            event_sample_sum: 0.0,
        }
    }

    /// Instantaneous pressure score for one snapshot, clamped to [0,100].
    pub fn calculate_raw_pressure(&self, snapshot: &MemorySnapshot) -> f64 {
        let fault_pressure = normalize_page_faults(snapshot.hard_faults_per_sec);
        let ram_pressure = normalize_available_ram(snapshot.available_percent);
        let committed_pressure = normalize_committed_ratio(snapshot.committed_ratio_percent);

        debug!(
            "Normalized pressures: page_faults={fault_pressure:.1}, \
             available_ram={ram_pressure:.1}, committed={committed_pressure:.1}"
        );

        let weighted = fault_pressure * self.weights.page_faults
            + ram_pressure * self.weights.available_ram
            + committed_pressure * self.weights.committed_ratio;

        weighted.clamp(0.0, 100.0)
    }

    /// Add a raw score to the smoothing buffer and return the updated
    /// moving average. Also advances the pressure-event state machine.
    pub fn add_sample(&mut self, raw_score: f64) -> f64 {
        if self.buffer.len() >= self.buffer_capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(raw_score);

        let smoothed = self.smoothed_pressure();
        self.update_pressure_event(smoothed);
        smoothed
    }

    /// Current smoothed score, or 0 when no samples have arrived yet.
    pub fn smoothed_pressure(&self) -> f64 {
        if self.buffer.is_empty() {
            return 0.0;
        }
        self.buffer.iter().sum::<f64>() / self.buffer.len() as f64
    }

    /// Map a score to a tier using the configured thresholds.
    ///
    /// Red wins when `yellow >= red` is (mis)configured; the engine does
    /// not validate threshold ordering.
    pub fn classify(&self, score: f64) -> PressureTier {
        if score >= self.thresholds.red {
            PressureTier::Red
        } else if score >= self.thresholds.yellow {
            PressureTier::Yellow
        } else {
            PressureTier::Green
        }
    }

    /// Tier for the current smoothed score.
    pub fn current_tier(&self) -> PressureTier {
        self.classify(self.smoothed_pressure())
    }

    /// The open pressure event, if one is in progress.
    pub fn current_event(&self) -> Option<&PressureEvent> {
        self.current_event.as_ref()
    }

    /// Track sustained high-pressure periods.
    ///
    /// Uses a running count + sum instead of storing samples so that an
    /// arbitrarily long event never grows memory.
    fn update_pressure_event(&mut self, smoothed: f64) {
        let is_high_pressure = smoothed >= self.thresholds.yellow;

        if is_high_pressure {
            match self.current_event.as_mut() {
                None => {
                    self.current_event = Some(PressureEvent {
                        started_at: Utc::now().timestamp_millis() as f64 / 1000.0,
                        ended_at: None,
                        peak_score: smoothed,
                        average_score: smoothed,
                    });
                    self.event_sample_count = 1;
                    self.event_sample_sum = smoothed;
                    info!("Pressure event started at {smoothed:.1}%");
                }
                Some(event) => {
                    self.event_sample_count += 1;
                    self.event_sample_sum += smoothed;
                    event.peak_score = event.peak_score.max(smoothed);
                    event.average_score = self.event_sample_sum / self.event_sample_count as f64;
                }
            }
        } else if let Some(mut event) = self.current_event.take() {
            let ended_at = Utc::now().timestamp_millis() as f64 / 1000.0;
            event.ended_at = Some(ended_at);

            info!(
                "Pressure event ended: duration={:.1}s, peak={:.1}%, avg={:.1}%",
                ended_at - event.started_at,
                event.peak_score,
                event.average_score
            );

            self.event_sample_count = 0;
            self.event_sample_sum = 0.0;
        }
    }

    /// Hard reset: empty buffer sized per the construction-time config,
    /// any open event discarded without a close being recorded.
    pub fn reset(&mut self) {
        self.buffer = VecDeque::with_capacity(self.buffer_capacity);
        self.current_event = None;
        self.event_sample_count = 0;
        self.event_sample_sum = 0.0;
        debug!("PressureCalculator reset");
    }
}
