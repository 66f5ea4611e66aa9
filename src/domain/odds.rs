//! Quoted prices as produced by ingestion.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::id::BookmakerId;
use super::money::Odds;
use super::sport::{MarketType, Sport};

/// One quoted price for one outcome of one event at one bookmaker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OddsEntry {
    pub sport: Sport,
    pub market_type: MarketType,
    /// Handicap or total line; `None` for line-less markets.
    #[serde(default)]
    pub line: Option<Decimal>,
    pub event_name: String,
    pub outcome_name: String,
    pub odd_value: Odds,
    pub bookmaker_id: BookmakerId,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub url: String,
    pub observed_at: DateTime<Utc>,
}

impl OddsEntry {
    /// Check the invariants every entry entering the core must satisfy.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.odd_value <= Decimal::ONE {
            return Err(DomainError::OddsNotAboveOne {
                odds: self.odd_value,
            });
        }
        if self.event_name.trim().is_empty() {
            return Err(DomainError::EmptyField { field: "event_name" });
        }
        if self.outcome_name.trim().is_empty() {
            return Err(DomainError::EmptyField {
                field: "outcome_name",
            });
        }
        if self.bookmaker_id.as_str().trim().is_empty() {
            return Err(DomainError::EmptyField {
                field: "bookmaker_id",
            });
        }
        Ok(())
    }

    /// Implied probability of this price (`1 / odds`).
    pub fn implied_probability(&self) -> Decimal {
        Decimal::ONE / self.odd_value
    }
}

/// Wire representation of an odds record before validation.
///
/// Sources deserialize into this type so that an unknown sport or market label
/// rejects a single record instead of the whole document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawOddsRecord {
    pub sport: String,
    #[serde(alias = "market_name", alias = "market")]
    pub market_type: String,
    #[serde(default)]
    pub line: Option<Decimal>,
    pub event_name: String,
    pub outcome_name: String,
    #[serde(alias = "odds")]
    pub odd_value: Decimal,
    #[serde(alias = "bookmaker")]
    pub bookmaker_id: String,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub url: String,
    #[serde(alias = "scraped_at")]
    pub observed_at: DateTime<Utc>,
}

impl TryFrom<RawOddsRecord> for OddsEntry {
    type Error = DomainError;

    fn try_from(raw: RawOddsRecord) -> Result<Self, Self::Error> {
        let sport: Sport = raw.sport.parse()?;
        let market_type: MarketType = raw.market_type.parse()?;

        let entry = OddsEntry {
            sport,
            market_type,
            line: raw.line.map(|l| l.normalize()),
            event_name: raw.event_name.trim().to_string(),
            outcome_name: raw.outcome_name.trim().to_string(),
            odd_value: raw.odd_value,
            bookmaker_id: BookmakerId::new(raw.bookmaker_id.trim()),
            start_time: raw.start_time,
            url: raw.url,
            observed_at: raw.observed_at,
        };
        entry.validate()?;
        Ok(entry)
    }
}

impl From<OddsEntry> for RawOddsRecord {
    fn from(entry: OddsEntry) -> Self {
        Self {
            sport: entry.sport.to_string(),
            market_type: entry.market_type.to_string(),
            line: entry.line,
            event_name: entry.event_name,
            outcome_name: entry.outcome_name,
            odd_value: entry.odd_value,
            bookmaker_id: entry.bookmaker_id.as_str().to_string(),
            start_time: entry.start_time,
            url: entry.url,
            observed_at: entry.observed_at,
        }
    }
}
