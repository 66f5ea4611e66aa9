//! Handler for the `detect` command.

use chrono::Utc;
use tracing::info;

use super::command::DetectArgs;
use super::{output, report, setup};
use crate::application::DetectionFilters;
use crate::domain::BookmakerId;
use crate::error::Result;
use crate::infrastructure::bootstrap::{build_engine, build_source};

/// Execute the detect command: one fetch, one cycle, one report.
pub async fn execute(args: &DetectArgs) -> Result<()> {
    let config = setup::engine_config(&args.engine)?;
    setup::init_logging(&config);

    let filters = build_filters(args);
    let engine = build_engine(&config)?;
    let source = build_source(&config.source);

    if !output::mode().json {
        output::header(env!("CARGO_PKG_VERSION"));
        output::field("Source", source.name());
        output::field("Threshold", config.matching.fuzzy_threshold);
        output::field(
            "Bankroll",
            filters.bankroll.unwrap_or(config.detection.default_bankroll),
        );
    }

    let records = source.fetch().await?;
    info!(source = source.name(), records = records.len(), "Fetched odds");

    let report = engine.run_cycle_filtered(records, &filters, Utc::now())?;
    report::print_cycle("detect", &report, args.limit)
}

fn build_filters(args: &DetectArgs) -> DetectionFilters {
    DetectionFilters {
        sports: (!args.sports.is_empty()).then(|| args.sports.iter().copied().collect()),
        market_types: (!args.markets.is_empty()).then(|| args.markets.iter().copied().collect()),
        max_start_hours: args.max_start_hours,
        bookmakers: (!args.bookmakers.is_empty()).then(|| {
            args.bookmakers
                .iter()
                .map(|name| BookmakerId::new(name.trim()))
                .collect()
        }),
        bankroll: args.bankroll,
        min_arb_percentage: args.min_profit_pct,
        min_profit_amount: args.min_profit,
    }
}
