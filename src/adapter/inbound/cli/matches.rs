//! Handler for the `match` command.

use serde_json::json;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::command::MatchArgs;
use super::{output, report, setup};
use crate::domain::MatchedEvent;
use crate::error::Result;
use crate::infrastructure::bootstrap::{build_engine, build_source};

#[derive(Tabled)]
struct EventRow {
    #[tabled(rename = "Event")]
    event: String,
    #[tabled(rename = "Sport")]
    sport: String,
    #[tabled(rename = "Market")]
    market: String,
    #[tabled(rename = "Starts")]
    start: String,
    #[tabled(rename = "Outcomes")]
    outcomes: usize,
    #[tabled(rename = "Books")]
    bookmakers: usize,
    #[tabled(rename = "Complete")]
    complete: &'static str,
}

fn event_row(event: &MatchedEvent) -> EventRow {
    let market = match event.line {
        Some(line) => format!("{} {}", event.market_type, line),
        None => event.market_type.to_string(),
    };
    EventRow {
        event: event.canonical_name.clone(),
        sport: event.sport.to_string(),
        market,
        start: event
            .representative_start_time
            .format("%Y-%m-%d %H:%M")
            .to_string(),
        outcomes: event.outcome_count(),
        bookmakers: event.bookmakers().len(),
        complete: if event.is_complete() { "yes" } else { "no" },
    }
}

/// Execute the match command: fetch once and list the clustered events.
pub async fn execute(args: &MatchArgs) -> Result<()> {
    let config = setup::engine_config(&args.engine)?;
    setup::init_logging(&config);

    let engine = build_engine(&config)?;
    let source = build_source(&config.source);
    let records = source.fetch().await?;
    let outcome = engine.match_records(records);

    let events: Vec<&MatchedEvent> = outcome
        .events
        .iter()
        .filter(|event| event.bookmakers().len() >= args.min_bookmakers)
        .collect();

    if output::mode().json {
        output::json_output(json!({
            "command": "match",
            "events": serde_json::to_value(&events)?,
            "diagnostics": serde_json::to_value(outcome.diagnostics)?,
        }));
        return Ok(());
    }
    if output::mode().quiet {
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Source", source.name());
    output::section(&format!("Matched events ({})", events.len()));
    if events.is_empty() {
        output::note("(none)");
    } else {
        let rows: Vec<EventRow> = events.iter().map(|event| event_row(event)).collect();
        output::lines(&Table::new(rows).with(Style::rounded()).to_string());
    }

    if output::mode().verbose > 0 {
        for event in &events {
            output::section(&event.canonical_name);
            for (outcome, quotes) in &event.outcomes {
                let prices: Vec<String> = quotes
                    .iter()
                    .map(|quote| format!("{}@{}", quote.bookmaker_id, quote.odd_value))
                    .collect();
                output::field(outcome, prices.join(", "));
            }
        }
    }

    report::print_diagnostics(&outcome.diagnostics);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::domain::{matched_event, quote};
    use rust_decimal_macros::dec;

    #[test]
    fn row_flags_incomplete_events() {
        let mut event = matched_event("Arsenal vs Chelsea");
        event.add_quote("arsenal", quote("leon", dec!(2.1), "Arsenal"));
        event.add_quote("chelsea", quote("stake", dec!(3.4), "Chelsea"));

        let row = event_row(&event);
        assert_eq!(row.outcomes, 2);
        assert_eq!(row.bookmakers, 2);
        assert_eq!(row.complete, "no");
        assert_eq!(row.market, "1x2");
    }
}
