//! Cycle owner: fetch, detect, publish.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::application::{ArbitrageEngine, CycleReport, OpportunityBoard};
use crate::error::Result;
use crate::infrastructure::bootstrap::{build_engine, build_source};
use crate::infrastructure::config::settings::Config;
use crate::port::OddsSource;

/// Runs detection cycles against one source and publishes each finished
/// report to its board.
pub struct Orchestrator {
    engine: ArbitrageEngine,
    source: Box<dyn OddsSource>,
    board: Arc<OpportunityBoard>,
    interval: Duration,
    max_cycles: Option<u64>,
}

impl Orchestrator {
    pub fn new(engine: ArbitrageEngine, source: Box<dyn OddsSource>, interval: Duration) -> Self {
        Self {
            engine,
            source,
            board: Arc::new(OpportunityBoard::new()),
            interval,
            max_cycles: None,
        }
    }

    /// Wire engine and source from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let engine = build_engine(config)?;
        let source = build_source(&config.source);
        Ok(Self::new(engine, source, config.runtime.cycle_interval()))
    }

    /// Stop after `cycles` attempted cycles.
    #[must_use]
    pub fn with_max_cycles(mut self, cycles: u64) -> Self {
        self.max_cycles = Some(cycles);
        self
    }

    /// Shared handle to the published results.
    pub fn board(&self) -> Arc<OpportunityBoard> {
        Arc::clone(&self.board)
    }

    pub fn engine(&self) -> &ArbitrageEngine {
        &self.engine
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn max_cycles(&self) -> Option<u64> {
        self.max_cycles
    }

    /// Fetch one batch, run a cycle over it and publish the report.
    ///
    /// Nothing is published if the fetch fails.
    pub async fn run_once(&self) -> Result<Arc<CycleReport>> {
        let records = self.source.fetch().await?;
        debug!(source = self.source.name(), records = records.len(), "Fetched odds");

        let report = self.engine.run_cycle(records, Utc::now());
        Ok(self.board.publish(report))
    }

    /// Run the cycle loop until shutdown is signalled.
    pub async fn run_with_shutdown(&self, shutdown: watch::Receiver<bool>) -> Result<()> {
        super::runtime::run_with_shutdown(self, shutdown).await
    }

    /// Run the cycle loop until Ctrl+C.
    pub async fn run_until_ctrl_c(&self) -> Result<()> {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("Received Ctrl+C"),
                Err(error) => warn!(%error, "Failed to listen for Ctrl+C"),
            }
            let _ = shutdown_tx.send(true);
        });

        self.run_with_shutdown(shutdown_rx).await
    }
}
