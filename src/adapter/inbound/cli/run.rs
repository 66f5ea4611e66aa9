//! Handler for the `run` command.

use super::command::RunArgs;
use super::{output, report, setup};
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::orchestration::Orchestrator;

/// Execute the run command.
pub async fn execute(args: &RunArgs) -> Result<()> {
    let mut config = setup::engine_config(&args.engine)?;
    if let Some(interval) = args.interval {
        config.runtime.cycle_interval_secs = interval;
    }
    if args.json_logs {
        config.logging.format = "json".into();
    }
    config.validate()?;
    setup::init_logging(&config);

    let mut orchestrator = Orchestrator::from_config(&config)?;
    if let Some(cycles) = args.cycles {
        orchestrator = orchestrator.with_max_cycles(cycles);
    }

    if !output::mode().json {
        print_startup_config(&config, &orchestrator);
    }

    orchestrator.run_until_ctrl_c().await?;

    let board = orchestrator.board();
    match board.latest() {
        Some(latest) => {
            if !output::mode().json {
                output::section(&format!("Last cycle ({} published)", board.cycles()));
            }
            report::print_cycle("run", &latest, None)?;
        }
        None => output::warning("No cycle completed"),
    }
    Ok(())
}

fn print_startup_config(config: &Config, orchestrator: &Orchestrator) {
    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Source", orchestrator.source_name());
    output::field("Interval", format!("{}s", orchestrator.interval().as_secs()));
    if let Some(cycles) = orchestrator.max_cycles() {
        output::field("Cycles", cycles);
    }
    if output::mode().verbose > 0 {
        output::field("Threshold", config.matching.fuzzy_threshold);
        output::field(
            "Tolerance",
            format!("{}m", config.matching.time_tolerance_minutes),
        );
        output::field("Aliases", config.aliases.len());
    }
    output::hint("press Ctrl+C to stop");
}
