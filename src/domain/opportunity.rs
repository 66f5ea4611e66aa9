//! Opportunity types for arbitrage detection.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::id::BookmakerId;
use super::money::{Odds, Stake};
use super::sport::{MarketType, Sport};

/// A single leg of an opportunity: one outcome backed at one bookmaker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpportunityLeg {
    outcome_name: String,
    bookmaker_id: BookmakerId,
    odd_value: Odds,
    stake: Stake,
    url: String,
    payout: Decimal,
}

impl OpportunityLeg {
    /// Create a new opportunity leg. `payout` is `stake * odd_value`,
    /// computed by the caller with overflow checks.
    #[must_use]
    pub fn new(
        outcome_name: impl Into<String>,
        bookmaker_id: BookmakerId,
        odd_value: Odds,
        stake: Stake,
        url: impl Into<String>,
        payout: Decimal,
    ) -> Self {
        Self {
            outcome_name: outcome_name.into(),
            bookmaker_id,
            odd_value,
            stake,
            url: url.into(),
            payout,
        }
    }

    #[must_use]
    pub fn outcome_name(&self) -> &str {
        &self.outcome_name
    }

    #[must_use]
    pub fn bookmaker_id(&self) -> &BookmakerId {
        &self.bookmaker_id
    }

    #[must_use]
    pub fn odd_value(&self) -> Odds {
        self.odd_value
    }

    #[must_use]
    pub fn stake(&self) -> Stake {
        self.stake
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Total return if this leg wins (`stake * odds`).
    #[must_use]
    pub fn payout(&self) -> Decimal {
        self.payout
    }
}

/// A detected cross-bookmaker arbitrage on one event and market.
///
/// Monetary fields are already rounded for display: stakes and profit to
/// cents, `profit_percentage` to four places. Stakes sum to `bankroll`
/// exactly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArbitrageOpportunity {
    event_name: String,
    sport: Sport,
    market_type: MarketType,
    line: Option<Decimal>,
    start_time: DateTime<Utc>,
    legs: Vec<OpportunityLeg>,
    implied_probability_sum: Decimal,
    profit_percentage: Decimal,
    guaranteed_profit: Decimal,
    bankroll: Decimal,
    freshness_score: f64,
}

impl ArbitrageOpportunity {
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn new(
        event_name: impl Into<String>,
        sport: Sport,
        market_type: MarketType,
        line: Option<Decimal>,
        start_time: DateTime<Utc>,
        legs: Vec<OpportunityLeg>,
        implied_probability_sum: Decimal,
        profit_percentage: Decimal,
        guaranteed_profit: Decimal,
        bankroll: Decimal,
        freshness_score: f64,
    ) -> Self {
        Self {
            event_name: event_name.into(),
            sport,
            market_type,
            line,
            start_time,
            legs,
            implied_probability_sum,
            profit_percentage,
            guaranteed_profit,
            bankroll,
            freshness_score,
        }
    }

    #[must_use]
    pub fn event_name(&self) -> &str {
        &self.event_name
    }

    #[must_use]
    pub fn sport(&self) -> Sport {
        self.sport
    }

    #[must_use]
    pub fn market_type(&self) -> MarketType {
        self.market_type
    }

    #[must_use]
    pub fn line(&self) -> Option<Decimal> {
        self.line
    }

    #[must_use]
    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    #[must_use]
    pub fn legs(&self) -> &[OpportunityLeg] {
        &self.legs
    }

    /// Sum of implied probabilities of the chosen prices.
    #[must_use]
    pub fn implied_probability_sum(&self) -> Decimal {
        self.implied_probability_sum
    }

    #[must_use]
    pub fn profit_percentage(&self) -> Decimal {
        self.profit_percentage
    }

    #[must_use]
    pub fn guaranteed_profit(&self) -> Decimal {
        self.guaranteed_profit
    }

    #[must_use]
    pub fn bankroll(&self) -> Decimal {
        self.bankroll
    }

    /// 1.0 for brand-new quotes, decaying towards 0.0 as they age.
    #[must_use]
    pub fn freshness_score(&self) -> f64 {
        self.freshness_score
    }

    /// Sum of all leg stakes.
    #[must_use]
    pub fn total_stake(&self) -> Decimal {
        self.legs.iter().map(OpportunityLeg::stake).sum()
    }

    /// Distinct bookmakers involved in the legs.
    #[must_use]
    pub fn bookmaker_count(&self) -> usize {
        let mut ids: Vec<&BookmakerId> = self.legs.iter().map(OpportunityLeg::bookmaker_id).collect();
        ids.sort();
        ids.dedup();
        ids.len()
    }
}
