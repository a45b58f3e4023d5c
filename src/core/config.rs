use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Pressure tier thresholds on the 0-100 score scale.
///
/// The engine never checks that `yellow < red`; callers that persist an
/// inverted pair get whatever the comparison order in
/// [`crate::core::pressure::PressureCalculator::classify`] produces.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Thresholds {
    #[serde(default = "default_yellow")]
    pub yellow: f64,
    #[serde(default = "default_red")]
    pub red: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            yellow: default_yellow(),
            red: default_red(),
        }
    }
}

/// Weights applied to the three normalized pressure components.
///
/// Not required to sum to 1.0; the weighted score is clamped to [0,100]
/// so over-weighting saturates instead of erroring.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MetricWeights {
    #[serde(default = "default_fault_weight")]
    pub page_faults: f64,
    #[serde(default = "default_ram_weight")]
    pub available_ram: f64,
    #[serde(default = "default_commit_weight")]
    pub committed_ratio: f64,
}

impl Default for MetricWeights {
    fn default() -> Self {
        Self {
            page_faults: default_fault_weight(),
            available_ram: default_ram_weight(),
            committed_ratio: default_commit_weight(),
        }
    }
}

/// Monitor configuration with JSON persistence.
///
/// Unknown keys in the file are ignored and missing keys fall back to
/// defaults, so configs written by older versions keep loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    #[serde(default = "default_sampling_interval")]
    pub sampling_interval_secs: u64,
    #[serde(default = "default_smoothing_window")]
    pub smoothing_window_minutes: u64,
    #[serde(default)]
    pub thresholds: Thresholds,
    #[serde(default)]
    pub metric_weights: MetricWeights,
    #[serde(default = "default_retention_days")]
    pub data_retention_days: u32,
    #[serde(default)]
    pub verbose_logging: bool,
}

fn default_sampling_interval() -> u64 {
    5
}
fn default_smoothing_window() -> u64 {
    5
}
fn default_yellow() -> f64 {
    60.0
}
fn default_red() -> f64 {
    80.0
}
fn default_fault_weight() -> f64 {
    0.5
}
fn default_ram_weight() -> f64 {
    0.3
}
fn default_commit_weight() -> f64 {
    0.2
}
fn default_retention_days() -> u32 {
    30
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            sampling_interval_secs: default_sampling_interval(),
            smoothing_window_minutes: default_smoothing_window(),
            thresholds: Thresholds::default(),
            metric_weights: MetricWeights::default(),
            data_retention_days: default_retention_days(),
            verbose_logging: false,
        }
    }
}

impl MonitorConfig {
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &PathBuf) -> Result<Self> {
        if !config_path.exists() {
            return Ok(MonitorConfig::default());
        }

        let data = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        // If the file is empty or corrupted, return default config
        if data.trim().is_empty() {
            return Ok(MonitorConfig::default());
        }

        Ok(serde_json::from_str(&data).unwrap_or_else(|_| MonitorConfig::default()))
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, config_path: &PathBuf) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let data =
            serde_json::to_string_pretty(self).with_context(|| "Failed to serialize config")?;

        fs::write(config_path, data)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        Ok(())
    }

    fn get_config_path() -> Result<PathBuf> {
        let config_dir =
            dirs::config_dir().with_context(|| "Could not determine config directory")?;

        Ok(config_dir.join("presswatch").join("config.json"))
    }

    /// Number of raw samples covered by the smoothing window.
    ///
    /// `window_minutes * 60 / interval_secs`, never less than 1.
    pub fn smoothing_samples(&self) -> usize {
        let interval = self.sampling_interval_secs.max(1);
        let samples = (self.smoothing_window_minutes * 60) / interval;
        (samples as usize).max(1)
    }
}
