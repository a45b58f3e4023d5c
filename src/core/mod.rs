// Core business logic module

pub mod config;
pub mod history;
pub mod pressure;

// Re-export commonly used items
pub use config::MonitorConfig;
pub use history::{HistoryStore, SampleRow};
pub use pressure::{MemorySnapshot, MetricsCollector, PressureCalculator, PressureRuntime};
