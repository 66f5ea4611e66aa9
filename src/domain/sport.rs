//! Sport and market-type enumerations.
//!
//! Both parse leniently from the labels bookmakers actually use ("soccer",
//! "Match Result", "Total Goals", ...) so sources can hand over raw text.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// Supported sports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sport {
    Football,
    Basketball,
    Esports,
    Tennis,
    Cricket,
}

impl Sport {
    /// All supported sports, in declaration order.
    pub const ALL: [Sport; 5] = [
        Sport::Football,
        Sport::Basketball,
        Sport::Esports,
        Sport::Tennis,
        Sport::Cricket,
    ];

    /// Canonical lowercase label.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Football => "football",
            Self::Basketball => "basketball",
            Self::Esports => "esports",
            Self::Tennis => "tennis",
            Self::Cricket => "cricket",
        }
    }
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sport {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match label_key(s).as_str() {
            "football" | "soccer" => Ok(Self::Football),
            "basketball" | "nba" => Ok(Self::Basketball),
            "esports" | "esport" | "csgo" | "cs2" | "dota2" | "lol" | "valorant" => {
                Ok(Self::Esports)
            }
            "tennis" => Ok(Self::Tennis),
            "cricket" => Ok(Self::Cricket),
            _ => Err(DomainError::UnknownSport(s.to_string())),
        }
    }
}

/// Betting market categories.
///
/// The market type fixes the outcome set of a match; see
/// [`MarketType::expected_outcomes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketType {
    /// Home / draw / away.
    #[serde(rename = "1x2")]
    OneXTwo,
    /// Two-way match winner.
    Moneyline,
    /// Over / under a total line.
    Totals,
    /// Handicap on a line.
    Handicap,
    /// Point spread on a line.
    Spread,
    /// 1X / 12 / X2.
    DoubleChance,
    /// Both teams to score: yes / no.
    Btts,
}

impl MarketType {
    /// Canonical label, matching the serde representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneXTwo => "1x2",
            Self::Moneyline => "moneyline",
            Self::Totals => "totals",
            Self::Handicap => "handicap",
            Self::Spread => "spread",
            Self::DoubleChance => "double_chance",
            Self::Btts => "btts",
        }
    }

    /// Number of outcomes a complete market of this type must carry.
    pub const fn expected_outcomes(self) -> usize {
        match self {
            Self::OneXTwo | Self::DoubleChance => 3,
            Self::Moneyline | Self::Totals | Self::Handicap | Self::Spread | Self::Btts => 2,
        }
    }

    /// Whether markets of this type are further identified by a line.
    pub const fn has_line(self) -> bool {
        matches!(self, Self::Totals | Self::Handicap | Self::Spread)
    }

    /// Whether exactly one outcome of a complete market settles as a win.
    ///
    /// Double chance outcomes overlap (1X and X2 both win on a draw), so the
    /// implied-probability sum says nothing about arbitrage there.
    pub const fn is_mutually_exclusive(self) -> bool {
        !matches!(self, Self::DoubleChance)
    }
}

impl fmt::Display for MarketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MarketType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match label_key(s).as_str() {
            "1x2" | "match_result" | "full_time_result" | "three_way" => Ok(Self::OneXTwo),
            "moneyline" | "money_line" | "match_winner" | "winner" | "two_way" => {
                Ok(Self::Moneyline)
            }
            "totals" | "total" | "over_under" | "total_goals" | "total_points" => Ok(Self::Totals),
            "handicap" | "asian_handicap" | "map_handicap" => Ok(Self::Handicap),
            "spread" | "point_spread" => Ok(Self::Spread),
            "double_chance" => Ok(Self::DoubleChance),
            "btts" | "both_teams_to_score" => Ok(Self::Btts),
            _ => Err(DomainError::UnknownMarketType(s.to_string())),
        }
    }
}

/// Lowercase a label and fold separators into underscores.
fn label_key(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '-' || c == '/' || c == '_' || c == ':')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sport_parses_bookmaker_labels() {
        assert_eq!("Soccer".parse::<Sport>().unwrap(), Sport::Football);
        assert_eq!("csgo".parse::<Sport>().unwrap(), Sport::Esports);
        assert_eq!(" Tennis ".parse::<Sport>().unwrap(), Sport::Tennis);
    }

    #[test]
    fn sport_rejects_unknown() {
        assert_eq!(
            "curling".parse::<Sport>(),
            Err(DomainError::UnknownSport("curling".into()))
        );
    }

    #[test]
    fn market_type_parses_bookmaker_labels() {
        assert_eq!("Match Result".parse::<MarketType>().unwrap(), MarketType::OneXTwo);
        assert_eq!("Total Goals".parse::<MarketType>().unwrap(), MarketType::Totals);
        assert_eq!("Over/Under".parse::<MarketType>().unwrap(), MarketType::Totals);
        assert_eq!("Map Handicap".parse::<MarketType>().unwrap(), MarketType::Handicap);
        assert_eq!("match-winner".parse::<MarketType>().unwrap(), MarketType::Moneyline);
    }

    #[test]
    fn market_type_serde_uses_canonical_labels() {
        let json = serde_json::to_string(&MarketType::OneXTwo).unwrap();
        assert_eq!(json, "\"1x2\"");
        let parsed: MarketType = serde_json::from_str("\"double_chance\"").unwrap();
        assert_eq!(parsed, MarketType::DoubleChance);
    }

    #[test]
    fn expected_outcomes_per_market() {
        assert_eq!(MarketType::OneXTwo.expected_outcomes(), 3);
        assert_eq!(MarketType::Moneyline.expected_outcomes(), 2);
        assert_eq!(MarketType::Totals.expected_outcomes(), 2);
        assert!(!MarketType::DoubleChance.is_mutually_exclusive());
        assert!(MarketType::Btts.is_mutually_exclusive());
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for sport in Sport::ALL {
            assert_eq!(sport.to_string().parse::<Sport>().unwrap(), sport);
        }
    }
}
