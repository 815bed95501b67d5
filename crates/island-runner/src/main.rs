//! Runs the island simulation on a fixed tick interval.

mod scheduler;
mod telemetry;

use anyhow::{Context, Result};
use island_core::RunnerConfig;
use island_world::{Simulation, TickReport};
use scheduler::Scheduler;
use std::sync::Arc;
use tokio::signal;
use tokio::time::Duration;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = match std::env::var("ISLAND_CONFIG") {
        Ok(path) => RunnerConfig::from_file(&path)
            .with_context(|| format!("failed to load config from {}", path))?,
        Err(_) => RunnerConfig::default(),
    };

    telemetry::init_telemetry(&config.log_filter)?;

    info!(
        width = config.simulation.world.width,
        height = config.simulation.world.height,
        seed = config.simulation.seed,
        interval_ms = config.tick_interval_ms,
        "Starting island simulation"
    );

    let simulation = Simulation::new(config.simulation.clone())?;
    let scheduler = Arc::new(Scheduler::new(
        simulation,
        Arc::new(|report: &TickReport| println!("\n{}", report)),
        config.metrics_every,
        config.max_ticks,
    ));

    let run = scheduler
        .clone()
        .start(Duration::from_millis(config.tick_interval_ms));

    tokio::select! {
        result = run => result?,
        _ = shutdown_signal() => {}
    }

    info!(
        ticks = scheduler.completed(),
        dropped_triggers = scheduler.dropped(),
        "Simulation stopped"
    );
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
