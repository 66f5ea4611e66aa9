//! Clusters of odds believed to describe the same real match.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::id::BookmakerId;
use super::money::Odds;
use super::sport::{MarketType, Sport};

/// One bookmaker's price for one outcome inside a [`MatchedEvent`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub bookmaker_id: BookmakerId,
    pub odd_value: Odds,
    pub url: String,
    pub observed_at: DateTime<Utc>,
    /// Outcome name as the bookmaker wrote it.
    pub outcome_label: String,
}

/// A cluster of odds entries for one match and one market.
///
/// Outcomes are keyed by their normalized name so that "Man Utd" and
/// "Manchester United" quotes land on the same outcome when an alias exists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchedEvent {
    pub canonical_name: String,
    pub sport: Sport,
    pub market_type: MarketType,
    pub line: Option<Decimal>,
    pub representative_start_time: DateTime<Utc>,
    pub outcomes: BTreeMap<String, Vec<Quote>>,
}

impl MatchedEvent {
    /// Create an event with no quotes yet.
    pub fn new(
        canonical_name: impl Into<String>,
        sport: Sport,
        market_type: MarketType,
        line: Option<Decimal>,
        representative_start_time: DateTime<Utc>,
    ) -> Self {
        Self {
            canonical_name: canonical_name.into(),
            sport,
            market_type,
            line,
            representative_start_time,
            outcomes: BTreeMap::new(),
        }
    }

    /// Record a quote under the given outcome key.
    pub fn add_quote(&mut self, outcome_key: impl Into<String>, quote: Quote) {
        self.outcomes.entry(outcome_key.into()).or_default().push(quote);
    }

    /// Number of distinct outcomes quoted.
    pub fn outcome_count(&self) -> usize {
        self.outcomes.len()
    }

    /// Total number of quotes across all outcomes.
    pub fn quote_count(&self) -> usize {
        self.outcomes.values().map(Vec::len).sum()
    }

    /// Every bookmaker that contributed at least one quote.
    pub fn bookmakers(&self) -> BTreeSet<&BookmakerId> {
        self.outcomes
            .values()
            .flatten()
            .map(|q| &q.bookmaker_id)
            .collect()
    }

    /// Whether every contributing bookmaker quotes the identical outcome set
    /// and the set has the size the market type requires.
    pub fn is_complete(&self) -> bool {
        let expected = self.market_type.expected_outcomes();
        if self.outcomes.len() != expected {
            return false;
        }
        if self.outcomes.values().any(Vec::is_empty) {
            return false;
        }

        self.bookmakers().into_iter().all(|bookmaker| {
            self.outcomes
                .values()
                .all(|quotes| quotes.iter().any(|q| &q.bookmaker_id == bookmaker))
        })
    }
}
