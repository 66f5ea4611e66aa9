//! One detection cycle: validate, match, detect.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use super::detection::{ArbitrageDetector, DetectionConfig, DetectionFilters};
use super::matching::{EventMatcher, MatchOutcome, MatchingConfig};
use super::normalize::{AliasTable, Normalizer};
use crate::domain::{ArbitrageOpportunity, Diagnostics, OddsEntry, RawOddsRecord};
use crate::error::ConfigError;

/// Outcome of one cycle over a batch of records.
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    pub generated_at: DateTime<Utc>,
    pub opportunities: Vec<ArbitrageOpportunity>,
    pub diagnostics: Diagnostics,
}

impl CycleReport {
    /// Best opportunity of the cycle, if any.
    pub fn best(&self) -> Option<&ArbitrageOpportunity> {
        self.opportunities.first()
    }
}

/// Matching and detection wired together.
pub struct ArbitrageEngine {
    matcher: EventMatcher,
    detector: ArbitrageDetector,
}

impl ArbitrageEngine {
    /// Build an engine, validating every parameter before any data is seen.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the matching or detection section is out
    /// of range.
    pub fn new(
        matching: &MatchingConfig,
        aliases: AliasTable,
        detection: DetectionConfig,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            matcher: EventMatcher::new(matching, Normalizer::new(aliases))?,
            detector: ArbitrageDetector::new(detection)?,
        })
    }

    /// Assemble an engine from prebuilt parts.
    pub fn from_parts(matcher: EventMatcher, detector: ArbitrageDetector) -> Self {
        Self { matcher, detector }
    }

    pub fn matcher(&self) -> &EventMatcher {
        &self.matcher
    }

    pub fn detector(&self) -> &ArbitrageDetector {
        &self.detector
    }

    /// Run a cycle with the configured thresholds.
    pub fn run_cycle(&self, records: Vec<RawOddsRecord>, now: DateTime<Utc>) -> CycleReport {
        self.cycle(records, &DetectionFilters::default(), now)
    }

    /// Run a cycle with per-request filters.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a filter override is out of range. The
    /// check happens before any record is processed.
    pub fn run_cycle_filtered(
        &self,
        records: Vec<RawOddsRecord>,
        filters: &DetectionFilters,
        now: DateTime<Utc>,
    ) -> Result<CycleReport, ConfigError> {
        filters.validate()?;
        Ok(self.cycle(records, filters, now))
    }

    /// Validate and cluster records without running detection.
    ///
    /// The returned diagnostics include the validation counters.
    pub fn match_records(&self, records: Vec<RawOddsRecord>) -> MatchOutcome {
        let (entries, mut diagnostics) = validate_records(records);

        let matched = self.matcher.match_entries(&entries);
        debug!(
            entries = entries.len(),
            events = matched.events.len(),
            "Entries matched"
        );
        diagnostics += matched.diagnostics;

        MatchOutcome {
            events: matched.events,
            diagnostics,
        }
    }

    fn cycle(
        &self,
        records: Vec<RawOddsRecord>,
        filters: &DetectionFilters,
        now: DateTime<Utc>,
    ) -> CycleReport {
        let matched = self.match_records(records);
        let mut diagnostics = matched.diagnostics;

        let detected = self.detector.run(&matched.events, filters, now);
        diagnostics += detected.diagnostics;

        self.finish(detected.opportunities, diagnostics, now)
    }

    fn finish(
        &self,
        opportunities: Vec<ArbitrageOpportunity>,
        diagnostics: Diagnostics,
        now: DateTime<Utc>,
    ) -> CycleReport {
        info!(
            records = diagnostics.records_received,
            invalid = diagnostics.records_invalid,
            events = diagnostics.clusters_formed,
            opportunities = opportunities.len(),
            skipped = diagnostics.skipped(),
            "Cycle complete"
        );

        CycleReport {
            generated_at: now,
            opportunities,
            diagnostics,
        }
    }
}

/// Convert raw records, dropping and counting the malformed ones.
pub fn validate_records(records: Vec<RawOddsRecord>) -> (Vec<OddsEntry>, Diagnostics) {
    let mut diagnostics = Diagnostics {
        records_received: records.len(),
        ..Default::default()
    };

    let mut entries = Vec::with_capacity(records.len());
    for record in records {
        let event = record.event_name.clone();
        let bookmaker = record.bookmaker_id.clone();
        match OddsEntry::try_from(record) {
            Ok(entry) => entries.push(entry),
            Err(error) => {
                diagnostics.records_invalid += 1;
                debug!(%event, %bookmaker, %error, "Dropping invalid record");
            }
        }
    }

    (entries, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 2, 12, 0, 0).unwrap()
    }

    fn record(outcome: &str, bookmaker: &str, odds: Decimal) -> RawOddsRecord {
        RawOddsRecord {
            sport: "tennis".into(),
            market_type: "moneyline".into(),
            line: None,
            event_name: "Sinner vs Alcaraz".into(),
            outcome_name: outcome.into(),
            odd_value: odds,
            bookmaker_id: bookmaker.into(),
            start_time: Some(Utc.with_ymd_and_hms(2026, 5, 2, 15, 0, 0).unwrap()),
            url: String::new(),
            observed_at: now(),
        }
    }

    fn engine() -> ArbitrageEngine {
        ArbitrageEngine::new(
            &MatchingConfig::default(),
            AliasTable::new(),
            DetectionConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn invalid_records_are_counted_and_dropped() {
        let mut bad_sport = record("Sinner", "a", dec!(2.1));
        bad_sport.sport = "curling".into();

        let (entries, diagnostics) =
            validate_records(vec![record("Sinner", "a", dec!(2.1)), bad_sport, record("Alcaraz", "a", dec!(0.9))]);

        assert_eq!(entries.len(), 1);
        assert_eq!(diagnostics.records_received, 3);
        assert_eq!(diagnostics.records_invalid, 2);
    }

    #[test]
    fn cycle_finds_two_way_arbitrage() {
        let records = vec![
            record("Sinner", "a", dec!(2.15)),
            record("Alcaraz", "a", dec!(1.80)),
            record("Sinner", "b", dec!(1.85)),
            record("Alcaraz", "b", dec!(2.10)),
        ];

        let report = engine().run_cycle(records, now());

        assert_eq!(report.opportunities.len(), 1);
        assert_eq!(report.diagnostics.clusters_formed, 1);
        assert_eq!(report.diagnostics.opportunities, 1);
        assert_eq!(report.best().unwrap().total_stake(), dec!(1000));
    }

    #[test]
    fn invalid_filter_aborts_before_processing() {
        let filters = DetectionFilters {
            min_profit_amount: Some(dec!(-1)),
            ..Default::default()
        };

        let result = engine().run_cycle_filtered(vec![record("Sinner", "a", dec!(2.1))], &filters, now());

        assert!(result.is_err());
    }
}
