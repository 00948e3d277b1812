mod runtime;
mod settings;

use std::sync::atomic::Ordering;
use std::time::Duration;

use anyhow::Context;
use tracing::{error, info};

use barista_foundation::{RuntimeState, StateManager};

use crate::runtime::Runtime;

fn init_logging() {
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt().with_env_filter(log_level).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    info!("Starting AutoBarista kiosk");

    let state_manager = StateManager::new();
    let cfg = settings::load().context("Failed to load configuration")?;

    let mut rt = Runtime::start(cfg)?;
    state_manager.transition(RuntimeState::Running)?;

    // Drain order envelopes to the log; the HTTP/WebSocket transport that
    // would forward them to observers plugs in here.
    let drain = rt.take_orders().map(|orders| {
        tokio::task::spawn_blocking(move || {
            for envelope in orders.iter() {
                info!(target: "orders", "{}", envelope);
            }
        })
    });

    let mut stats_interval = tokio::time::interval(Duration::from_secs(30));
    stats_interval.tick().await; // the first tick completes immediately
    loop {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                match result {
                    Ok(()) => info!("Shutdown signal received"),
                    Err(e) => error!("Failed to listen for shutdown signal: {}", e),
                }
                break;
            }
            _ = stats_interval.tick() => {
                info!(
                    "Pipeline: {} blocks captured, {} gated, {} dropped",
                    rt.stats.blocks_captured.load(Ordering::Relaxed),
                    rt.stats.blocks_gated.load(Ordering::Relaxed),
                    rt.stats.blocks_dropped.load(Ordering::Relaxed),
                );
            }
        }
    }

    state_manager.transition(RuntimeState::Stopping)?;
    rt.shutdown();
    // The notifier sender dropped with the machine, so the drain task ends
    // on its own.
    if let Some(drain) = drain {
        let _ = drain.await;
    }
    state_manager.transition(RuntimeState::Stopped)?;
    Ok(())
}
