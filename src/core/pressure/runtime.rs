//! Tokio runtime and sampling loop for pressure monitoring.
//!
//! A single background task owns the collector and calculator, samples on
//! a fixed interval, and publishes each completed tick through a watch
//! channel. Consumers read the latest update without ever blocking the
//! sampler; a slow consumer just sees fewer intermediate values.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use serde::Serialize;
use tokio::sync::{broadcast, watch};
use tokio::time::{interval, MissedTickBehavior};

use crate::core::config::MonitorConfig;
use crate::core::history::HistoryStore;

use super::calculator::{PressureCalculator, PressureTier};
use super::collector::MetricsCollector;
use super::snapshot::MemorySnapshot;

const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// One completed sampling tick, as published to consumers.
#[derive(Debug, Clone, Serialize)]
pub struct PressureUpdate {
    pub raw_score: f64,
    pub smoothed_score: f64,
    pub tier: PressureTier,
    pub snapshot: MemorySnapshot,
}

/// Wrapper around the Tokio runtime driving the sampling task.
///
/// Presents a synchronous interface so CLI code can consume updates
/// without being async itself.
pub struct PressureRuntime {
    update_rx: watch::Receiver<Option<Arc<PressureUpdate>>>,
    shutdown_tx: broadcast::Sender<()>,
    task: tokio::task::JoinHandle<()>,
    runtime: tokio::runtime::Runtime,
}

impl PressureRuntime {
    /// Create the runtime and start sampling immediately.
    ///
    /// When a history store is supplied, every completed tick is appended
    /// to it; store failures are logged and never interrupt sampling.
    pub fn new(config: MonitorConfig, history: Option<HistoryStore>) -> anyhow::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_time()
            .thread_name("pressure-worker")
            .build()?;

        let (update_tx, update_rx) = watch::channel(None);
        let (shutdown_tx, shutdown_rx) = broadcast::channel::<()>(1);

        let task = runtime.spawn(sampling_task(config, history, update_tx, shutdown_rx));

        Ok(Self {
            update_rx,
            shutdown_tx,
            task,
            runtime,
        })
    }

    /// Latest published update, if any tick has completed yet.
    pub fn latest(&self) -> Option<Arc<PressureUpdate>> {
        self.update_rx.borrow().clone()
    }

    /// Block until a new update arrives or the timeout elapses.
    pub fn next_update(&mut self, timeout: Duration) -> Option<Arc<PressureUpdate>> {
        let Self {
            runtime, update_rx, ..
        } = self;

        let changed =
            runtime.block_on(async { tokio::time::timeout(timeout, update_rx.changed()).await });

        match changed {
            Ok(Ok(())) => update_rx.borrow_and_update().clone(),
            // Sender dropped: the sampling task is gone
            Ok(Err(_)) => None,
            // Timeout: no new tick in this window
            Err(_) => None,
        }
    }

    /// Signal the sampling task to stop and wait a bounded grace period.
    ///
    /// A task that overruns the grace period (for example, stuck in a
    /// hung OS counter read) is reported and abandoned, not treated as
    /// fatal.
    pub fn shutdown(self) {
        let _ = self.shutdown_tx.send(());

        let result = self
            .runtime
            .block_on(async { tokio::time::timeout(SHUTDOWN_GRACE, self.task).await });

        match result {
            Ok(_) => info!("Sampling task stopped"),
            Err(_) => warn!("Sampling task did not stop within the grace period"),
        }
    }
}

/// The sampling loop: sole writer of collector and calculator state.
///
/// Not reentrant by construction; a tick blocking on a slow OS call
/// delays the next tick (missed ticks are skipped) instead of
/// overlapping with it. The shutdown signal is only observed between
/// ticks, never mid-read.
async fn sampling_task(
    config: MonitorConfig,
    history: Option<HistoryStore>,
    update_tx: watch::Sender<Option<Arc<PressureUpdate>>>,
    mut shutdown: broadcast::Receiver<()>,
) {
    let interval_secs = config.sampling_interval_secs.max(1);
    info!("Sampling task started (interval {interval_secs}s)");

    let mut collector = MetricsCollector::new();
    let mut calculator = PressureCalculator::new(&config);

    // Initial sample before the first interval elapses, so consumers
    // start with a real reading instead of nothing
    run_tick(&mut collector, &mut calculator, history.as_ref(), &update_tx);

    let mut ticker = interval(Duration::from_secs(interval_secs));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick of an interval fires immediately; we just sampled
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                run_tick(&mut collector, &mut calculator, history.as_ref(), &update_tx);
            }
            _ = shutdown.recv() => {
                info!("Sampling task shutting down");
                break;
            }
        }
    }
}

fn run_tick(
    collector: &mut MetricsCollector,
    calculator: &mut PressureCalculator,
    history: Option<&HistoryStore>,
    update_tx: &watch::Sender<Option<Arc<PressureUpdate>>>,
) {
    let Some(snapshot) = collector.collect() else {
        // Tick-fatal collection failure; the loop simply tries again at
        // the next interval
        warn!("Failed to collect metrics for this tick");
        return;
    };

    let raw_score = calculator.calculate_raw_pressure(&snapshot);
    let smoothed_score = calculator.add_sample(raw_score);
    let tier = calculator.classify(smoothed_score);

    debug!("Pressure: raw={raw_score:.1}%, smoothed={smoothed_score:.1}%");

    if let Some(store) = history {
        if let Err(e) = store.insert_sample(raw_score, smoothed_score, &snapshot) {
            warn!("Failed to record sample: {e}");
        }
    }

    // watch::send only fails when every receiver is gone, which is fine
    let _ = update_tx.send(Some(Arc::new(PressureUpdate {
        raw_score,
        smoothed_score,
        tier,
        snapshot,
    })));
}
