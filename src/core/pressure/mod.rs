//! Memory pressure sensing and scoring engine.
//!
//! Raw counters flow one way: counter source / fallback estimator into
//! the collector, snapshots into the calculator, scores out to consumers
//! through the runtime's watch channel.

pub mod calculator;
mod collector;
mod counters;
mod fallback;
mod runtime;
mod snapshot;

pub use calculator::{
    normalize_available_ram, normalize_committed_ratio, normalize_page_faults, PressureCalculator,
    PressureEvent, PressureTier,
};
pub use collector::MetricsCollector;
pub use counters::{DiskCounters, MemoryCounters, PerfCounterSource};
pub use fallback::SwapFaultEstimator;
pub use runtime::{PressureRuntime, PressureUpdate};
pub use snapshot::MemorySnapshot;
