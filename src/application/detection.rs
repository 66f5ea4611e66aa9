//! Cross-bookmaker arbitrage detection.
//!
//! For each complete matched event the best price per outcome is taken
//! across bookmakers. If the implied probabilities of those prices sum to
//! less than one, backing every outcome in proportion to its implied
//! probability returns the same amount whichever outcome wins.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::domain::{
    ArbitrageOpportunity, BookmakerId, Diagnostics, MarketType, MatchedEvent, Odds,
    OpportunityLeg, Quote, Sport, Stake,
};
use crate::error::ConfigError;

/// An implied-probability sum must be below `1 - ARBITRAGE_EPSILON`.
pub const ARBITRAGE_EPSILON: Decimal = Decimal::from_parts(1, 0, 0, false, 9);

/// Configuration for arbitrage detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Amount split across the legs when no override is given.
    #[serde(default = "default_bankroll")]
    pub default_bankroll: Decimal,

    /// Minimum profit percentage to report.
    #[serde(default)]
    pub min_arb_percentage: Decimal,

    /// Minimum guaranteed profit, in bankroll currency, to report.
    #[serde(default)]
    pub min_profit_amount: Decimal,

    /// Age at which the freshness score halves.
    #[serde(default = "default_freshness_half_life_secs")]
    pub freshness_half_life_secs: u64,

    /// Quotes older than this are ignored. Unset keeps every quote.
    #[serde(default)]
    pub max_quote_age_secs: Option<u64>,
}

fn default_bankroll() -> Decimal {
    Decimal::from(1000)
}

const fn default_freshness_half_life_secs() -> u64 {
    300
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            default_bankroll: default_bankroll(),
            min_arb_percentage: Decimal::ZERO,
            min_profit_amount: Decimal::ZERO,
            freshness_half_life_secs: default_freshness_half_life_secs(),
            max_quote_age_secs: None,
        }
    }
}

impl DetectionConfig {
    /// Check ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for a non-positive bankroll or
    /// half-life, negative minimums, or a zero maximum quote age.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_bankroll("default_bankroll", self.default_bankroll)?;
        validate_minimum("min_arb_percentage", self.min_arb_percentage)?;
        validate_minimum("min_profit_amount", self.min_profit_amount)?;
        if self.freshness_half_life_secs == 0 {
            return Err(ConfigError::invalid(
                "freshness_half_life_secs",
                "must be greater than 0",
            ));
        }
        if self.max_quote_age_secs == Some(0) {
            return Err(ConfigError::invalid(
                "max_quote_age_secs",
                "must be greater than 0",
            ));
        }
        Ok(())
    }
}

fn validate_bankroll(field: &'static str, value: Decimal) -> Result<(), ConfigError> {
    if value <= Decimal::ZERO {
        return Err(ConfigError::invalid(field, "must be greater than 0"));
    }
    Ok(())
}

fn validate_minimum(field: &'static str, value: Decimal) -> Result<(), ConfigError> {
    if value < Decimal::ZERO {
        return Err(ConfigError::invalid(field, "must be 0 or greater"));
    }
    Ok(())
}

/// Longest look-ahead accepted for [`DetectionFilters::max_start_hours`].
pub const MAX_START_HOURS_LIMIT: u32 = 168;

/// Per-request narrowing and overrides applied on top of [`DetectionConfig`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetectionFilters {
    /// Only consider events of these sports.
    pub sports: Option<BTreeSet<Sport>>,
    /// Only consider events of these market types.
    pub market_types: Option<BTreeSet<MarketType>>,
    /// Skip events starting more than this many hours after `now`. Events
    /// already under way still pass.
    pub max_start_hours: Option<u32>,
    /// Only consider quotes from these bookmakers.
    pub bookmakers: Option<BTreeSet<BookmakerId>>,
    pub bankroll: Option<Decimal>,
    pub min_arb_percentage: Option<Decimal>,
    pub min_profit_amount: Option<Decimal>,
}

impl DetectionFilters {
    /// Check override ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for a non-positive bankroll,
    /// negative minimums or a start window beyond a week.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_start_hours.is_some_and(|h| h > MAX_START_HOURS_LIMIT) {
            return Err(ConfigError::invalid(
                "max_start_hours",
                format!("must be at most {MAX_START_HOURS_LIMIT}"),
            ));
        }
        if let Some(bankroll) = self.bankroll {
            validate_bankroll("bankroll", bankroll)?;
        }
        if let Some(min) = self.min_arb_percentage {
            validate_minimum("min_arb_percentage", min)?;
        }
        if let Some(min) = self.min_profit_amount {
            validate_minimum("min_profit_amount", min)?;
        }
        Ok(())
    }
}

/// Result of one detection pass.
#[derive(Debug, Clone, Default)]
pub struct DetectionReport {
    /// Sorted by profit percentage, then guaranteed profit, descending.
    pub opportunities: Vec<ArbitrageOpportunity>,
    pub diagnostics: Diagnostics,
}

/// Effective thresholds for one pass.
struct Thresholds {
    bankroll: Decimal,
    min_arb_percentage: Decimal,
    min_profit_amount: Decimal,
}

/// Stateless arbitrage detector.
#[derive(Debug, Clone)]
pub struct ArbitrageDetector {
    config: DetectionConfig,
}

impl ArbitrageDetector {
    /// Create a detector from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configuration is out of range.
    pub fn new(config: DetectionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Detect arbitrages with the configured thresholds.
    pub fn detect(&self, events: &[MatchedEvent], now: DateTime<Utc>) -> DetectionReport {
        self.run(events, &DetectionFilters::default(), now)
    }

    /// Detect arbitrages with per-request filters and overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if an override is out of range; nothing is
    /// evaluated in that case.
    pub fn detect_filtered(
        &self,
        events: &[MatchedEvent],
        filters: &DetectionFilters,
        now: DateTime<Utc>,
    ) -> Result<DetectionReport, ConfigError> {
        filters.validate()?;
        Ok(self.run(events, filters, now))
    }

    /// Detection pass with filters the caller has already validated.
    pub(crate) fn run(
        &self,
        events: &[MatchedEvent],
        filters: &DetectionFilters,
        now: DateTime<Utc>,
    ) -> DetectionReport {
        let thresholds = Thresholds {
            bankroll: filters.bankroll.unwrap_or(self.config.default_bankroll),
            min_arb_percentage: filters
                .min_arb_percentage
                .unwrap_or(self.config.min_arb_percentage),
            min_profit_amount: filters
                .min_profit_amount
                .unwrap_or(self.config.min_profit_amount),
        };
        let latest_start = filters
            .max_start_hours
            .map(|hours| now + Duration::hours(i64::from(hours)));
        let mut diagnostics = Diagnostics::default();
        let mut opportunities = Vec::new();

        for event in events {
            if let Some(sports) = &filters.sports {
                if !sports.contains(&event.sport) {
                    continue;
                }
            }
            if let Some(markets) = &filters.market_types {
                if !markets.contains(&event.market_type) {
                    continue;
                }
            }
            if latest_start.is_some_and(|latest| event.representative_start_time > latest) {
                trace!(event = %event.canonical_name, "Starts outside the requested window");
                continue;
            }
            if let Some(opp) = self.evaluate(event, filters, &thresholds, now, &mut diagnostics) {
                opportunities.push(opp);
            }
        }

        opportunities.sort_by(compare_opportunities);
        diagnostics.opportunities = opportunities.len();

        debug!(
            events = events.len(),
            opportunities = opportunities.len(),
            incomplete = diagnostics.incomplete_markets,
            rejected_quotes = diagnostics.rejected_quotes,
            "Detection pass complete"
        );

        DetectionReport {
            opportunities,
            diagnostics,
        }
    }

    fn evaluate(
        &self,
        event: &MatchedEvent,
        filters: &DetectionFilters,
        thresholds: &Thresholds,
        now: DateTime<Utc>,
        diagnostics: &mut Diagnostics,
    ) -> Option<ArbitrageOpportunity> {
        let usable = self.usable_quotes(event, filters, now, diagnostics);

        if !event.market_type.is_mutually_exclusive() || !usable.is_complete() {
            diagnostics.incomplete_markets += 1;
            trace!(event = %event.canonical_name, market = %event.market_type, "Incomplete market");
            return None;
        }

        // Outcome order is the map's key order, so the last leg is stable.
        let best: Vec<&Quote> = usable
            .outcomes
            .values()
            .filter_map(|quotes| best_quote(quotes))
            .collect();

        let odds: Vec<Odds> = best.iter().map(|q| q.odd_value).collect();
        let Some(sum) = implied_sum(&odds) else {
            diagnostics.unpriced_markets += 1;
            warn!(event = %event.canonical_name, "Implied probability sum not representable");
            return None;
        };

        if sum >= Decimal::ONE - ARBITRAGE_EPSILON {
            diagnostics.no_arbitrage += 1;
            return None;
        }

        let bankroll = thresholds.bankroll;
        let Some(Pricing {
            profit_percentage,
            guaranteed_profit,
            stakes,
            payouts,
        }) = price(&odds, sum, bankroll)
        else {
            diagnostics.unpriced_markets += 1;
            warn!(
                event = %event.canonical_name,
                bankroll = %bankroll,
                "Arbitrage overflows decimal arithmetic"
            );
            return None;
        };

        if profit_percentage < thresholds.min_arb_percentage
            || guaranteed_profit < thresholds.min_profit_amount
        {
            diagnostics.below_thresholds += 1;
            debug!(
                event = %event.canonical_name,
                profit_pct = %profit_percentage.round_dp(4),
                "Arbitrage below thresholds"
            );
            return None;
        }

        let legs: Vec<OpportunityLeg> = best
            .iter()
            .zip(stakes)
            .zip(payouts)
            .map(|((quote, stake), payout)| {
                OpportunityLeg::new(
                    quote.outcome_label.clone(),
                    quote.bookmaker_id.clone(),
                    quote.odd_value,
                    stake,
                    quote.url.clone(),
                    payout,
                )
            })
            .collect();

        let oldest = best.iter().map(|q| q.observed_at).min().unwrap_or(now);
        let freshness = freshness_score(now - oldest, self.config.freshness_half_life_secs);

        debug!(
            event = %event.canonical_name,
            sport = %event.sport,
            market = %event.market_type,
            profit_pct = %profit_percentage.round_dp(4),
            "Arbitrage found"
        );

        Some(ArbitrageOpportunity::new(
            event.canonical_name.clone(),
            event.sport,
            event.market_type,
            event.line,
            event.representative_start_time,
            legs,
            sum,
            profit_percentage.round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero),
            guaranteed_profit.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
            bankroll,
            freshness,
        ))
    }

    /// Copy of `event` without quotes the detector must ignore.
    fn usable_quotes(
        &self,
        event: &MatchedEvent,
        filters: &DetectionFilters,
        now: DateTime<Utc>,
        diagnostics: &mut Diagnostics,
    ) -> MatchedEvent {
        let max_age = self
            .config
            .max_quote_age_secs
            .and_then(|secs| i64::try_from(secs).ok())
            .map(Duration::seconds);

        let mut usable = MatchedEvent::new(
            event.canonical_name.clone(),
            event.sport,
            event.market_type,
            event.line,
            event.representative_start_time,
        );

        for (outcome, quotes) in &event.outcomes {
            for quote in quotes {
                if let Some(allowed) = &filters.bookmakers {
                    if !allowed.contains(&quote.bookmaker_id) {
                        continue;
                    }
                }
                if quote.odd_value <= Decimal::ONE {
                    diagnostics.rejected_quotes += 1;
                    continue;
                }
                if max_age.is_some_and(|max| now - quote.observed_at > max) {
                    diagnostics.stale_quotes += 1;
                    continue;
                }
                usable.add_quote(outcome.clone(), quote.clone());
            }
        }

        usable
    }
}

/// Highest price; equal prices go to the smallest bookmaker id.
fn best_quote(quotes: &[Quote]) -> Option<&Quote> {
    quotes.iter().min_by(|a, b| {
        b.odd_value
            .cmp(&a.odd_value)
            .then_with(|| a.bookmaker_id.cmp(&b.bookmaker_id))
            .then_with(|| b.observed_at.cmp(&a.observed_at))
            .then_with(|| a.url.cmp(&b.url))
    })
}

/// Profit figures and stake split for one arbitrage, unrounded except for
/// the stakes.
struct Pricing {
    profit_percentage: Decimal,
    guaranteed_profit: Decimal,
    stakes: Vec<Stake>,
    payouts: Vec<Decimal>,
}

/// `Σ 1/odds`, or `None` if it is not representable or is zero.
fn implied_sum(odds: &[Odds]) -> Option<Decimal> {
    let sum = odds.iter().try_fold(Decimal::ZERO, |acc, o| {
        acc.checked_add(Decimal::ONE.checked_div(*o)?)
    })?;
    (!sum.is_zero()).then_some(sum)
}

fn price(odds: &[Odds], sum: Decimal, bankroll: Decimal) -> Option<Pricing> {
    let total_return = bankroll.checked_div(sum)?;
    let profit_percentage = Decimal::ONE
        .checked_div(sum)?
        .checked_sub(Decimal::ONE)?
        .checked_mul(Decimal::ONE_HUNDRED)?;
    let guaranteed_profit = total_return.checked_sub(bankroll)?;

    let stakes = calculate_stakes(odds, bankroll)?;
    let payouts = stakes
        .iter()
        .zip(odds)
        .map(|(stake, odd)| stake.checked_mul(*odd))
        .collect::<Option<Vec<_>>>()?;

    Some(Pricing {
        profit_percentage,
        guaranteed_profit,
        stakes,
        payouts,
    })
}

const CENT: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Split `bankroll` across legs so every outcome pays the same.
///
/// Each stake is `bankroll * (1 / odds) / S`, rounded half-up to cents; the
/// last leg takes the rounding remainder so the stakes sum to `bankroll`
/// exactly. If rounding up the earlier legs would leave the last leg
/// negative, the legs that rounded up the most give back a cent each. No
/// stake is ever negative.
///
/// Returns `None` for an empty slice or when the split is not representable.
///
/// ```
/// use rust_decimal_macros::dec;
/// use surebet::application::detection::calculate_stakes;
///
/// let stakes = calculate_stakes(&[dec!(2.10), dec!(3.80), dec!(4.00)], dec!(1000));
/// assert_eq!(stakes, Some(vec![dec!(481.32), dec!(265.99), dec!(252.69)]));
/// ```
pub fn calculate_stakes(odds: &[Odds], bankroll: Decimal) -> Option<Vec<Stake>> {
    let (_, head) = odds.split_last()?;
    let sum = implied_sum(odds)?;

    let exact: Vec<Decimal> = head
        .iter()
        .map(|o| bankroll.checked_mul(Decimal::ONE.checked_div(*o)?)?.checked_div(sum))
        .collect::<Option<_>>()?;
    let mut stakes: Vec<Stake> = exact
        .iter()
        .map(|s| s.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
        .collect();
    let mut allocated = stakes
        .iter()
        .try_fold(Decimal::ZERO, |acc, s| acc.checked_add(*s))?;

    if allocated > bankroll {
        let mut by_round_up: Vec<usize> = (0..stakes.len()).collect();
        by_round_up.sort_by(|&a, &b| {
            (stakes[b] - exact[b])
                .cmp(&(stakes[a] - exact[a]))
                .then_with(|| a.cmp(&b))
        });
        for idx in by_round_up {
            if allocated <= bankroll {
                break;
            }
            if stakes[idx] > exact[idx] {
                stakes[idx] -= CENT;
                allocated -= CENT;
            }
        }
    }

    stakes.push(bankroll.checked_sub(allocated)?);
    Some(stakes)
}

/// `0.5^(age / half_life)` rounded to three places; 1.0 for quotes from the
/// future.
pub fn freshness_score(age: Duration, half_life_secs: u64) -> f64 {
    if half_life_secs == 0 {
        return 0.0;
    }
    let age_secs = (age.num_milliseconds() as f64 / 1000.0).max(0.0);
    let score = 0.5_f64.powf(age_secs / half_life_secs as f64);
    (score * 1000.0).round() / 1000.0
}

fn compare_opportunities(a: &ArbitrageOpportunity, b: &ArbitrageOpportunity) -> Ordering {
    b.profit_percentage()
        .cmp(&a.profit_percentage())
        .then_with(|| b.guaranteed_profit().cmp(&a.guaranteed_profit()))
        .then_with(|| a.event_name().cmp(b.event_name()))
        .then_with(|| a.sport().cmp(&b.sport()))
        .then_with(|| a.market_type().cmp(&b.market_type()))
        .then_with(|| a.line().cmp(&b.line()))
        .then_with(|| a.start_time().cmp(&b.start_time()))
        .then_with(|| {
            let left = a.legs().iter().map(OpportunityLeg::bookmaker_id);
            let right = b.legs().iter().map(OpportunityLeg::bookmaker_id);
            left.cmp(right)
        })
}
