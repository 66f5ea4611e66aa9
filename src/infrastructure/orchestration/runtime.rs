//! Orchestrator runtime lifecycle.

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use super::orchestrator::Orchestrator;
use crate::error::Result;

/// Runtime loop entrypoint used by [`Orchestrator`].
///
/// The first cycle runs immediately. A cycle interrupted by shutdown is
/// dropped before it publishes, so the board only ever holds finished
/// reports. Source failures are logged and the loop carries on.
pub async fn run_with_shutdown(
    orchestrator: &Orchestrator,
    mut shutdown: watch::Receiver<bool>,
) -> Result<()> {
    info!(
        source = orchestrator.source_name(),
        interval_secs = orchestrator.interval().as_secs(),
        "Starting surebet"
    );

    let mut interval = tokio::time::interval(orchestrator.interval());
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut attempted: u64 = 0;

    loop {
        tokio::select! {
            biased;

            () = shutdown_requested(&mut shutdown) => {
                info!("Shutdown signal received");
                break;
            }
            _ = interval.tick() => {
                tokio::select! {
                    result = orchestrator.run_once() => match result {
                        Ok(report) => info!(
                            opportunities = report.opportunities.len(),
                            best_profit_pct = ?report.best().map(|o| o.profit_percentage()),
                            "Published cycle"
                        ),
                        Err(error) => warn!(
                            source = orchestrator.source_name(),
                            %error,
                            "Cycle failed; keeping previous results"
                        ),
                    },
                    () = shutdown_requested(&mut shutdown) => {
                        info!("Shutdown during cycle; discarding partial results");
                        break;
                    }
                }

                attempted += 1;
                if orchestrator.max_cycles().is_some_and(|max| attempted >= max) {
                    info!(cycles = attempted, "Cycle limit reached");
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Resolves once the flag is set or the sender is gone.
async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    loop {
        if *shutdown.borrow_and_update() {
            return;
        }
        if shutdown.changed().await.is_err() {
            return;
        }
    }
}
