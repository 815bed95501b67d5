//! Single-flight periodic tick scheduling.

use anyhow::Result;
use island_world::{Simulation, TickReport};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, info, instrument};

/// Receives every completed tick report. Called after the grid lock is
/// released.
pub type ReportSink = Arc<dyn Fn(&TickReport) + Send + Sync>;

pub struct Scheduler {
    simulation: Arc<Mutex<Simulation>>,
    sink: ReportSink,
    metrics_every: u64,
    max_ticks: Option<u64>,
    completed: AtomicU64,
    dropped: AtomicU64,
}

impl Scheduler {
    pub fn new(
        simulation: Simulation,
        sink: ReportSink,
        metrics_every: u64,
        max_ticks: Option<u64>,
    ) -> Self {
        Self {
            simulation: Arc::new(Mutex::new(simulation)),
            sink,
            metrics_every: metrics_every.max(1),
            max_ticks,
            completed: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
        }
    }

    #[cfg(test)]
    pub fn simulation(&self) -> Arc<Mutex<Simulation>> {
        self.simulation.clone()
    }

    pub fn completed(&self) -> u64 {
        self.completed.load(Ordering::SeqCst)
    }

    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::SeqCst)
    }

    fn limit_reached(&self, tick: u64) -> bool {
        self.max_ticks.map_or(false, |max| tick >= max)
    }

    /// Run one sweep unless another one holds the grid, in which case the
    /// trigger is dropped and `None` is returned.
    pub fn trigger(&self) -> Result<Option<TickReport>> {
        let mut sim = match self.simulation.try_lock() {
            Some(sim) => sim,
            None => {
                self.dropped.fetch_add(1, Ordering::SeqCst);
                debug!("Sweep still running, trigger dropped");
                return Ok(None);
            }
        };

        if self.limit_reached(sim.tick()) {
            return Ok(None);
        }

        let report = sim.step()?;
        if report.tick % self.metrics_every == 0 {
            sim.emit_population_metrics();
        }
        drop(sim);

        self.completed.fetch_add(1, Ordering::SeqCst);
        (self.sink)(&report);
        Ok(Some(report))
    }

    /// Trigger a sweep every `period` until `max_ticks` sweeps have run, or
    /// forever when there is no limit.
    #[instrument(skip(self))]
    pub async fn start(self: Arc<Self>, period: Duration) -> Result<()> {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut sweeps = JoinSet::new();

        info!(max_ticks = ?self.max_ticks, "Scheduler started");

        loop {
            // A held lock means a sweep is in flight; check again once it lands
            if let Some(sim) = self.simulation.try_lock() {
                if self.limit_reached(sim.tick()) {
                    break;
                }
            }

            tokio::select! {
                _ = ticker.tick() => {
                    let scheduler = self.clone();
                    sweeps.spawn_blocking(move || scheduler.trigger());
                }
                Some(joined) = sweeps.join_next() => {
                    joined??;
                }
            }
        }

        while let Some(joined) = sweeps.join_next().await {
            joined??;
        }

        info!(completed = self.completed(), "Scheduler finished");
        Ok(())
    }
}
