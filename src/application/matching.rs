//! Greedy fuzzy clustering of odds entries into matched events.
//!
//! Entries are partitioned by `(sport, market_type, line)` so that different
//! markets never merge. Inside a partition entries are visited in ascending
//! start time and either join the most similar open cluster whose
//! representative starts within the time tolerance, or open a new cluster.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::normalize::Normalizer;
use super::similarity::{ScorerKind, Similarity};
use crate::domain::{Diagnostics, MarketType, MatchedEvent, OddsEntry, Quote, Sport};
use crate::error::ConfigError;

/// Scores closer than this are treated as equal.
const SCORE_EPSILON: f64 = 1e-6;

/// Configuration for event matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Minimum similarity (0..=100) for an entry to join a cluster.
    #[serde(default = "default_fuzzy_threshold")]
    pub fuzzy_threshold: u32,

    /// Maximum start-time distance from a cluster representative.
    #[serde(default = "default_time_tolerance_minutes")]
    pub time_tolerance_minutes: i64,

    /// Similarity scorer.
    #[serde(default)]
    pub scorer: ScorerKind,
}

fn default_fuzzy_threshold() -> u32 {
    94
}

fn default_time_tolerance_minutes() -> i64 {
    15
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: default_fuzzy_threshold(),
            time_tolerance_minutes: default_time_tolerance_minutes(),
            scorer: ScorerKind::default(),
        }
    }
}

impl MatchingConfig {
    /// Check ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the threshold is above 100 or
    /// the tolerance is negative.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fuzzy_threshold > 100 {
            return Err(ConfigError::invalid(
                "fuzzy_threshold",
                "must be between 0 and 100",
            ));
        }
        if self.time_tolerance_minutes < 0 {
            return Err(ConfigError::invalid(
                "time_tolerance_minutes",
                "must be 0 or greater",
            ));
        }
        Ok(())
    }

    /// Tolerance as a duration.
    pub fn time_tolerance(&self) -> Duration {
        Duration::minutes(self.time_tolerance_minutes)
    }
}

/// Result of one matching pass.
#[derive(Debug, Clone, Default)]
pub struct MatchOutcome {
    /// Partitions in key order, clusters in creation order.
    pub events: Vec<MatchedEvent>,
    pub diagnostics: Diagnostics,
}

type PartitionKey = (Sport, MarketType, Option<Decimal>);

struct Cluster {
    normalized_name: String,
    event: MatchedEvent,
}

/// Groups odds entries that describe the same match and market.
pub struct EventMatcher {
    normalizer: Normalizer,
    scorer: Box<dyn Similarity>,
    threshold: f64,
    time_tolerance: Duration,
}

impl EventMatcher {
    /// Create a matcher from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configuration is out of range.
    pub fn new(config: &MatchingConfig, normalizer: Normalizer) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            normalizer,
            scorer: config.scorer.build(),
            threshold: f64::from(config.fuzzy_threshold),
            time_tolerance: config.time_tolerance(),
        })
    }

    /// Replace the similarity scorer.
    #[must_use]
    pub fn with_scorer(mut self, scorer: Box<dyn Similarity>) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Cluster `entries` into matched events.
    ///
    /// Output depends only on the multiset of entries, not their order.
    pub fn match_entries(&self, entries: &[OddsEntry]) -> MatchOutcome {
        let mut diagnostics = Diagnostics::default();
        let mut partitions: BTreeMap<PartitionKey, Vec<(&OddsEntry, DateTime<Utc>)>> =
            BTreeMap::new();

        for entry in entries {
            let Some(start_time) = entry.start_time else {
                diagnostics.missing_start_time += 1;
                debug!(
                    event = %entry.event_name,
                    bookmaker = %entry.bookmaker_id,
                    "Skipping entry without start time"
                );
                continue;
            };
            partitions
                .entry((entry.sport, entry.market_type, entry.line))
                .or_default()
                .push((entry, start_time));
        }

        let mut events = Vec::new();
        for (key, mut members) in partitions {
            members.sort_by(|(a, a_start), (b, b_start)| {
                a_start
                    .cmp(b_start)
                    .then_with(|| a.bookmaker_id.cmp(&b.bookmaker_id))
                    .then_with(|| a.event_name.cmp(&b.event_name))
                    .then_with(|| a.outcome_name.cmp(&b.outcome_name))
                    .then_with(|| a.odd_value.cmp(&b.odd_value))
                    .then_with(|| a.observed_at.cmp(&b.observed_at))
                    .then_with(|| a.url.cmp(&b.url))
            });

            let clusters = self.cluster_partition(&members, &mut diagnostics);
            debug!(
                sport = %key.0,
                market = %key.1,
                entries = members.len(),
                clusters = clusters.len(),
                "Partition clustered"
            );
            events.extend(clusters.into_iter().map(|c| c.event));
        }

        diagnostics.clusters_formed = events.len();
        MatchOutcome {
            events,
            diagnostics,
        }
    }

    fn cluster_partition(
        &self,
        members: &[(&OddsEntry, DateTime<Utc>)],
        diagnostics: &mut Diagnostics,
    ) -> Vec<Cluster> {
        let mut clusters: Vec<Cluster> = Vec::new();

        for &(entry, start_time) in members {
            let name = self.normalizer.normalize(&entry.event_name);

            let candidates: Vec<(usize, f64)> = clusters
                .iter()
                .enumerate()
                .filter(|(_, c)| {
                    (start_time - c.event.representative_start_time).abs() <= self.time_tolerance
                })
                .map(|(idx, c)| (idx, self.scorer.score(&name, &c.normalized_name)))
                .collect();

            // Strictly greater keeps the earliest-created cluster on ties.
            let mut best: Option<(usize, f64)> = None;
            for &(idx, score) in &candidates {
                if best.map_or(true, |(_, b)| score > b + SCORE_EPSILON) {
                    best = Some((idx, score));
                }
            }

            let target = match best {
                Some((idx, score)) if score + SCORE_EPSILON >= self.threshold => {
                    let tied = candidates
                        .iter()
                        .filter(|&&(other, s)| other != idx && (score - s).abs() <= SCORE_EPSILON)
                        .count();
                    if tied > 0 {
                        diagnostics.ambiguous_matches += 1;
                        warn!(
                            event = %entry.event_name,
                            chosen = %clusters[idx].event.canonical_name,
                            score,
                            tied,
                            "Ambiguous match resolved to earliest cluster"
                        );
                    }
                    idx
                }
                _ => {
                    clusters.push(Cluster {
                        normalized_name: name,
                        event: MatchedEvent::new(
                            entry.event_name.trim(),
                            entry.sport,
                            entry.market_type,
                            entry.line,
                            start_time,
                        ),
                    });
                    clusters.len() - 1
                }
            };

            clusters[target]
                .event
                .add_quote(self.outcome_key(&entry.outcome_name), quote_of(entry));
        }

        clusters
    }

    fn outcome_key(&self, outcome_name: &str) -> String {
        let key = self.normalizer.normalize(outcome_name);
        if key.is_empty() {
            outcome_name.trim().to_lowercase()
        } else {
            key
        }
    }
}

fn quote_of(entry: &OddsEntry) -> Quote {
    Quote {
        bookmaker_id: entry.bookmaker_id.clone(),
        odd_value: entry.odd_value,
        url: entry.url.clone(),
        observed_at: entry.observed_at,
        outcome_label: entry.outcome_name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BookmakerId;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn kickoff() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 2, 19, 0, 0).unwrap()
    }

    fn entry(event: &str, outcome: &str, bookmaker: &str, offset_minutes: i64) -> OddsEntry {
        OddsEntry {
            sport: Sport::Football,
            market_type: MarketType::OneXTwo,
            line: None,
            event_name: event.into(),
            outcome_name: outcome.into(),
            odd_value: dec!(2.0),
            bookmaker_id: BookmakerId::from(bookmaker),
            start_time: Some(kickoff() + Duration::minutes(offset_minutes)),
            url: String::new(),
            observed_at: Utc.with_ymd_and_hms(2026, 5, 2, 12, 0, 0).unwrap(),
        }
    }

    fn matcher(threshold: u32) -> EventMatcher {
        let config = MatchingConfig {
            fuzzy_threshold: threshold,
            ..Default::default()
        };
        EventMatcher::new(&config, Normalizer::default()).unwrap()
    }

    #[test]
    fn identical_names_merge_across_bookmakers() {
        let entries = vec![
            entry("Arsenal vs Chelsea", "Arsenal", "a", 0),
            entry("Arsenal vs Chelsea", "Arsenal", "b", 5),
            entry("arsenal - chelsea", "Chelsea", "c", -5),
        ];

        let outcome = matcher(94).match_entries(&entries);

        assert_eq!(outcome.events.len(), 1);
        assert_eq!(outcome.events[0].quote_count(), 3);
        assert_eq!(outcome.events[0].outcomes.len(), 2);
        assert_eq!(outcome.diagnostics.clusters_formed, 1);
    }

    #[test]
    fn start_time_outside_tolerance_splits_clusters() {
        let entries = vec![
            entry("Arsenal vs Chelsea", "Arsenal", "a", 0),
            entry("Arsenal vs Chelsea", "Arsenal", "b", 16),
        ];

        let outcome = matcher(94).match_entries(&entries);

        assert_eq!(outcome.events.len(), 2);
    }

    #[test]
    fn different_markets_never_merge() {
        let mut moneyline = entry("Arsenal vs Chelsea", "Arsenal", "b", 0);
        moneyline.market_type = MarketType::Moneyline;
        let mut over = entry("Arsenal vs Chelsea", "Over", "a", 0);
        over.market_type = MarketType::Totals;
        over.line = Some(dec!(2.5));
        let mut over_35 = over.clone();
        over_35.line = Some(dec!(3.5));

        let entries = vec![entry("Arsenal vs Chelsea", "Arsenal", "a", 0), moneyline, over, over_35];
        let outcome = matcher(0).match_entries(&entries);

        assert_eq!(outcome.events.len(), 4);
    }

    #[test]
    fn missing_start_time_is_counted_not_fatal() {
        let mut undated = entry("Arsenal vs Chelsea", "Arsenal", "a", 0);
        undated.start_time = None;

        let outcome = matcher(94).match_entries(&[undated, entry("Arsenal vs Chelsea", "Draw", "b", 0)]);

        assert_eq!(outcome.diagnostics.missing_start_time, 1);
        assert_eq!(outcome.events.len(), 1);
    }

    #[test]
    fn threshold_controls_abbreviation_merge() {
        let entries = vec![
            entry("Man Utd vs Liverpool", "Draw", "a", 0),
            entry("Manchester United vs Liverpool", "Draw", "b", 0),
        ];

        assert_eq!(matcher(80).match_entries(&entries).events.len(), 1);
        assert_eq!(matcher(99).match_entries(&entries).events.len(), 2);
    }

    #[test]
    fn input_order_does_not_change_output() {
        let entries = vec![
            entry("Arsenal vs Chelsea", "Arsenal", "a", 0),
            entry("Arsenal v Chelsea", "Chelsea", "b", 3),
            entry("Spurs vs Everton", "Draw", "a", 0),
            entry("Tottenham vs Everton", "Draw", "b", 2),
        ];
        let mut reversed = entries.clone();
        reversed.reverse();

        let m = matcher(80);
        assert_eq!(m.match_entries(&entries).events, m.match_entries(&reversed).events);
    }

    #[test]
    fn tie_goes_to_earliest_cluster_and_is_counted() {
        let entries = vec![
            entry("abc def", "x", "a", 0),
            entry("abc ghi", "x", "b", 1),
            entry("abc", "x", "c", 2),
        ];

        // The first two score 57.1 against each other; the third scores 60
        // against both.
        let outcome = matcher(58).match_entries(&entries);
        let events = &outcome.events;

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].canonical_name, "abc def");
        assert_eq!(events[0].quote_count(), 2);
        assert_eq!(events[1].quote_count(), 1);
        assert_eq!(outcome.diagnostics.ambiguous_matches, 1);
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        let config = MatchingConfig {
            fuzzy_threshold: 101,
            ..Default::default()
        };
        assert!(EventMatcher::new(&config, Normalizer::default()).is_err());
    }
}
