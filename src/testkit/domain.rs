//! Builders for domain primitives used across tests.
//!
//! Every record defaults to a football 1x2 market kicking off at
//! [`kickoff`] and observed at [`observed`], so tests only spell out the
//! fields they care about.

use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::domain::{BookmakerId, MarketType, MatchedEvent, OddsEntry, Quote, RawOddsRecord, Sport};

/// Fixed kickoff time shared by the canned scenarios.
pub fn kickoff() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 1, 18, 0, 0)
        .single()
        .expect("valid timestamp")
}

/// Fixed observation time, six hours before [`kickoff`].
pub fn observed() -> DateTime<Utc> {
    kickoff() - Duration::hours(6)
}

/// Fluent builder for [`RawOddsRecord`].
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    record: RawOddsRecord,
}

impl RecordBuilder {
    pub fn new(bookmaker: &str, event: &str, outcome: &str, odds: Decimal) -> Self {
        Self {
            record: RawOddsRecord {
                sport: Sport::Football.to_string(),
                market_type: MarketType::OneXTwo.to_string(),
                line: None,
                event_name: event.to_string(),
                outcome_name: outcome.to_string(),
                odd_value: odds,
                bookmaker_id: bookmaker.to_string(),
                start_time: Some(kickoff()),
                url: format!("https://{bookmaker}.example/event"),
                observed_at: observed(),
            },
        }
    }

    pub fn sport(mut self, sport: &str) -> Self {
        self.record.sport = sport.to_string();
        self
    }

    pub fn market(mut self, market: &str) -> Self {
        self.record.market_type = market.to_string();
        self
    }

    pub fn line(mut self, line: Decimal) -> Self {
        self.record.line = Some(line);
        self
    }

    pub fn start(mut self, start: DateTime<Utc>) -> Self {
        self.record.start_time = Some(start);
        self
    }

    pub fn no_start(mut self) -> Self {
        self.record.start_time = None;
        self
    }

    pub fn observed_at(mut self, at: DateTime<Utc>) -> Self {
        self.record.observed_at = at;
        self
    }

    pub fn build(self) -> RawOddsRecord {
        self.record
    }

    /// Build and validate into an [`OddsEntry`].
    ///
    /// # Panics
    ///
    /// Panics if the record fails validation.
    pub fn entry(self) -> OddsEntry {
        OddsEntry::try_from(self.record).expect("valid odds record")
    }
}

/// Football 1x2 record at the default kickoff.
pub fn record(bookmaker: &str, event: &str, outcome: &str, odds: Decimal) -> RawOddsRecord {
    RecordBuilder::new(bookmaker, event, outcome, odds).build()
}

/// Football 1x2 entry at the default kickoff.
pub fn entry(bookmaker: &str, event: &str, outcome: &str, odds: Decimal) -> OddsEntry {
    RecordBuilder::new(bookmaker, event, outcome, odds).entry()
}

/// A complete three-way market: one record per `(outcome, odds)` pair.
pub fn market(bookmaker: &str, event: &str, prices: &[(&str, Decimal)]) -> Vec<RawOddsRecord> {
    prices
        .iter()
        .map(|(outcome, odds)| record(bookmaker, event, outcome, *odds))
        .collect()
}

/// Create a [`Quote`] observed at [`observed`].
pub fn quote(bookmaker: &str, odds: Decimal, label: &str) -> Quote {
    Quote {
        bookmaker_id: BookmakerId::new(bookmaker),
        odd_value: odds,
        url: String::new(),
        observed_at: observed(),
        outcome_label: label.to_string(),
    }
}

/// Create an empty football 1x2 [`MatchedEvent`] at [`kickoff`].
pub fn matched_event(name: &str) -> MatchedEvent {
    MatchedEvent::new(name, Sport::Football, MarketType::OneXTwo, None, kickoff())
}

/// Three bookmakers on "Manchester United vs Liverpool" whose best prices
/// are 2.10 (x), 3.80 (y) and 4.00 (z): implied sum 0.98935.
pub fn scenario_a() -> Vec<RawOddsRecord> {
    let event = "Manchester United vs Liverpool";
    let mut records = market(
        "x",
        event,
        &[("Manchester United", dec!(2.10)), ("Draw", dec!(3.30)), ("Liverpool", dec!(3.50))],
    );
    records.extend(market(
        "y",
        event,
        &[("Manchester United", dec!(1.90)), ("Draw", dec!(3.80)), ("Liverpool", dec!(3.60))],
    ));
    records.extend(market(
        "z",
        event,
        &[("Manchester United", dec!(1.95)), ("Draw", dec!(3.40)), ("Liverpool", dec!(4.00))],
    ));
    records
}

/// Two moneyline bookmakers spelling the same match differently, with
/// crossing prices that form an arbitrage once merged.
pub fn scenario_b() -> Vec<RawOddsRecord> {
    vec![
        RecordBuilder::new("x", "Man Utd vs Liverpool", "Man Utd", dec!(2.20))
            .market("Moneyline")
            .build(),
        RecordBuilder::new("x", "Man Utd vs Liverpool", "Liverpool", dec!(1.70))
            .market("Moneyline")
            .build(),
        RecordBuilder::new("y", "Manchester United vs Liverpool", "Man Utd", dec!(1.80))
            .market("Moneyline")
            .build(),
        RecordBuilder::new("y", "Manchester United vs Liverpool", "Liverpool", dec!(2.10))
            .market("Moneyline")
            .build(),
    ]
}
