//! Rendering of cycle reports as tables or JSON.

use serde_json::json;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::output::{self, Tone};
use crate::application::CycleReport;
use crate::domain::{ArbitrageOpportunity, Diagnostics};
use crate::error::Result;

#[derive(Tabled)]
struct OpportunityRow {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "Event")]
    event: String,
    #[tabled(rename = "Sport")]
    sport: String,
    #[tabled(rename = "Market")]
    market: String,
    #[tabled(rename = "Profit %")]
    profit_pct: String,
    #[tabled(rename = "Profit")]
    profit: String,
    #[tabled(rename = "Fresh")]
    freshness: String,
    #[tabled(rename = "Starts")]
    start: String,
}

#[derive(Tabled)]
struct LegRow {
    #[tabled(rename = "Outcome")]
    outcome: String,
    #[tabled(rename = "Bookmaker")]
    bookmaker: String,
    #[tabled(rename = "Odds")]
    odds: String,
    #[tabled(rename = "Stake")]
    stake: String,
    #[tabled(rename = "Payout")]
    payout: String,
}

fn market_label(opportunity: &ArbitrageOpportunity) -> String {
    match opportunity.line() {
        Some(line) => format!("{} {}", opportunity.market_type(), line),
        None => opportunity.market_type().to_string(),
    }
}

fn opportunity_row(rank: usize, opportunity: &ArbitrageOpportunity) -> OpportunityRow {
    OpportunityRow {
        rank,
        event: opportunity.event_name().to_string(),
        sport: opportunity.sport().to_string(),
        market: market_label(opportunity),
        profit_pct: format!("{:.2}%", opportunity.profit_percentage().round_dp(2)),
        profit: format!("{:.2}", opportunity.guaranteed_profit()),
        freshness: format!("{:.2}", opportunity.freshness_score()),
        start: opportunity.start_time().format("%Y-%m-%d %H:%M").to_string(),
    }
}

fn leg_rows(opportunity: &ArbitrageOpportunity) -> Vec<LegRow> {
    opportunity
        .legs()
        .iter()
        .map(|leg| LegRow {
            outcome: leg.outcome_name().to_string(),
            bookmaker: leg.bookmaker_id().to_string(),
            odds: leg.odd_value().to_string(),
            stake: format!("{:.2}", leg.stake()),
            payout: format!("{:.2}", leg.payout()),
        })
        .collect()
}

/// Print opportunities, their stake splits and the diagnostics.
///
/// `limit` caps how many opportunities are shown; the diagnostics always
/// describe the whole cycle.
pub fn print_cycle(command: &str, report: &CycleReport, limit: Option<usize>) -> Result<()> {
    let shown: &[ArbitrageOpportunity] = match limit {
        Some(limit) => &report.opportunities[..limit.min(report.opportunities.len())],
        None => &report.opportunities,
    };

    if output::mode().json {
        output::json_output(json!({
            "command": command,
            "generated_at": report.generated_at,
            "opportunities": serde_json::to_value(shown)?,
            "diagnostics": serde_json::to_value(report.diagnostics)?,
        }));
        return Ok(());
    }
    if output::mode().quiet {
        return Ok(());
    }

    output::section("Opportunities");
    if shown.is_empty() {
        output::note("(none found)");
    } else {
        let rows: Vec<OpportunityRow> = shown
            .iter()
            .enumerate()
            .map(|(idx, opportunity)| opportunity_row(idx + 1, opportunity))
            .collect();
        output::lines(&Table::new(rows).with(Style::rounded()).to_string());

        for (idx, opportunity) in shown.iter().enumerate() {
            output::section(&format!(
                "#{} {} ({})",
                idx + 1,
                opportunity.event_name(),
                market_label(opportunity)
            ));
            output::lines(
                &Table::new(leg_rows(opportunity))
                    .with(Style::rounded())
                    .to_string(),
            );
            output::field(
                "Bankroll",
                format!(
                    "{:.2} -> {}",
                    opportunity.bankroll(),
                    output::paint(format!("+{:.2}", opportunity.guaranteed_profit()), Tone::Gain)
                ),
            );
        }
    }

    if shown.len() < report.opportunities.len() {
        output::hint(&format!(
            "{} more not shown (raise --limit)",
            report.opportunities.len() - shown.len()
        ));
    }

    print_diagnostics(&report.diagnostics);
    Ok(())
}

/// Print the diagnostic counters; zero counters only in verbose mode.
pub fn print_diagnostics(diagnostics: &Diagnostics) {
    output::section("Diagnostics");
    let counters = [
        ("Records", diagnostics.records_received),
        ("Invalid", diagnostics.records_invalid),
        ("No start time", diagnostics.missing_start_time),
        ("Events", diagnostics.clusters_formed),
        ("Ambiguous", diagnostics.ambiguous_matches),
        ("Incomplete", diagnostics.incomplete_markets),
        ("Bad quotes", diagnostics.rejected_quotes),
        ("Stale quotes", diagnostics.stale_quotes),
        ("No arbitrage", diagnostics.no_arbitrage),
        ("Unpriced", diagnostics.unpriced_markets),
        ("Below minimum", diagnostics.below_thresholds),
        ("Opportunities", diagnostics.opportunities),
    ];
    for (label, count) in counters {
        if count > 0 || output::mode().verbose > 0 {
            output::field(label, count);
        }
    }
}
