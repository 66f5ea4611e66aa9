//! Periodic loop behaviour with stub sources.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use surebet::infrastructure::bootstrap::build_engine;
use surebet::infrastructure::config::settings::Config;
use surebet::infrastructure::orchestration::Orchestrator;
use surebet::testkit::domain::scenario_a;
use surebet::testkit::source::StaticSource;

#[tokio::test]
async fn board_holds_latest_finished_cycle() {
    let engine = build_engine(&Config::default()).unwrap();
    let orchestrator = Orchestrator::new(
        engine,
        Box::new(StaticSource::new(scenario_a())),
        Duration::from_millis(5),
    )
    .with_max_cycles(4);
    let board = orchestrator.board();

    let (_shutdown_tx, shutdown_rx) = watch::channel(false);
    orchestrator.run_with_shutdown(shutdown_rx).await.unwrap();

    assert_eq!(board.cycles(), 4);
    let latest = board.latest().unwrap();
    assert_eq!(latest.opportunities.len(), 1);
    assert_eq!(latest.diagnostics.records_received, 9);
}

#[tokio::test]
async fn readers_keep_their_snapshot_across_cycles() {
    let engine = build_engine(&Config::default()).unwrap();
    let orchestrator = Orchestrator::new(
        engine,
        Box::new(StaticSource::new(scenario_a())),
        Duration::from_millis(5),
    );

    let first = orchestrator.run_once().await.unwrap();
    let second = orchestrator.run_once().await.unwrap();

    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(first.opportunities.len(), second.opportunities.len());
    assert!(Arc::ptr_eq(&orchestrator.board().latest().unwrap(), &second));
    assert_eq!(orchestrator.board().cycles(), 2);
}

#[tokio::test]
async fn synthetic_source_runs_from_default_config() {
    let mut config = Config::default();
    config.runtime.cycle_interval_secs = 1;

    let orchestrator = Orchestrator::from_config(&config).unwrap().with_max_cycles(1);
    let (_shutdown_tx, shutdown_rx) = watch::channel(false);
    orchestrator.run_with_shutdown(shutdown_rx).await.unwrap();

    let latest = orchestrator.board().latest().unwrap();
    assert!(latest.diagnostics.records_received > 0);
    assert_eq!(latest.diagnostics.records_invalid, 0);
}
