//! End-to-end cycles over canned odds batches.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use surebet::adapter::outbound::source::{SyntheticSource, SyntheticSourceConfig};
use surebet::application::{
    AliasTable, ArbitrageEngine, DetectionConfig, DetectionFilters, MatchingConfig,
};
use surebet::domain::{BookmakerId, MatchedEvent, RawOddsRecord};
use surebet::testkit::domain::{observed, record, scenario_a, scenario_b, RecordBuilder};

fn engine_with(threshold: u32, aliases: AliasTable) -> ArbitrageEngine {
    let matching = MatchingConfig {
        fuzzy_threshold: threshold,
        ..MatchingConfig::default()
    };
    ArbitrageEngine::new(&matching, aliases, DetectionConfig::default()).unwrap()
}

fn engine(threshold: u32) -> ArbitrageEngine {
    engine_with(threshold, AliasTable::new())
}

fn synthetic_batch(seed: u64) -> Vec<RawOddsRecord> {
    let config = SyntheticSourceConfig {
        seed: Some(seed),
        ..SyntheticSourceConfig::default()
    };
    SyntheticSource::new(&config).generate(observed())
}

#[test]
fn scenario_a_reports_one_opportunity_with_exact_stakes() {
    let report = engine(94).run_cycle(scenario_a(), observed());

    assert_eq!(report.opportunities.len(), 1);
    let opportunity = &report.opportunities[0];
    assert_eq!(opportunity.event_name(), "Manchester United vs Liverpool");
    assert_eq!(opportunity.profit_percentage(), dec!(1.0766));
    assert_eq!(opportunity.guaranteed_profit(), dec!(10.77));
    assert_eq!(opportunity.total_stake(), dec!(1000));

    let legs: Vec<(&str, &str, Decimal, Decimal)> = opportunity
        .legs()
        .iter()
        .map(|leg| {
            (
                leg.outcome_name(),
                leg.bookmaker_id().as_str(),
                leg.odd_value(),
                leg.stake(),
            )
        })
        .collect();
    assert_eq!(
        legs,
        vec![
            ("Draw", "y", dec!(3.80), dec!(265.99)),
            ("Liverpool", "z", dec!(4.00), dec!(252.69)),
            ("Manchester United", "x", dec!(2.10), dec!(481.32)),
        ]
    );
}

#[test]
fn scenario_b_merges_only_at_low_threshold() {
    let merged = engine(80).run_cycle(scenario_b(), observed());
    assert_eq!(merged.diagnostics.clusters_formed, 1);
    assert_eq!(merged.opportunities.len(), 1);
    assert_eq!(merged.opportunities[0].bookmaker_count(), 2);

    let split = engine(99).run_cycle(scenario_b(), observed());
    assert_eq!(split.diagnostics.clusters_formed, 2);
    assert!(split.opportunities.is_empty());
}

#[test]
fn single_quote_clusters_are_incomplete_when_names_stay_apart() {
    let records = vec![
        record("x", "Man Utd vs Liverpool", "Liverpool", dec!(2.0)),
        record("y", "Manchester United vs Liverpool", "Liverpool", dec!(2.1)),
    ];

    let merged = engine(80).run_cycle(records.clone(), observed());
    assert_eq!(merged.diagnostics.clusters_formed, 1);

    let split = engine(99).run_cycle(records, observed());
    assert_eq!(split.diagnostics.clusters_formed, 2);
    assert_eq!(split.diagnostics.incomplete_markets, 2);
    assert!(split.opportunities.is_empty());
}

#[test]
fn aliases_merge_abbreviations_at_strict_threshold() {
    let aliases = AliasTable::from_pairs([("man utd", "manchester united")]).unwrap();
    let report = engine_with(99, aliases).run_cycle(scenario_b(), observed());

    assert_eq!(report.diagnostics.clusters_formed, 1);
    assert_eq!(report.opportunities.len(), 1);
}

#[test]
fn implied_sum_of_exactly_one_is_not_an_opportunity() {
    let mut records = Vec::new();
    for bookmaker in ["x", "y"] {
        for outcome in ["Home", "Draw", "Away"] {
            records.push(record(bookmaker, "Home vs Away", outcome, dec!(3.0)));
        }
    }

    let report = engine(94).run_cycle(records, observed());

    assert!(report.opportunities.is_empty());
    assert_eq!(report.diagnostics.no_arbitrage, 1);
}

#[test]
fn missing_start_time_is_skipped_not_fatal() {
    let mut records = scenario_a();
    records.push(
        RecordBuilder::new("w", "Manchester United vs Liverpool", "Draw", dec!(9.0))
            .no_start()
            .build(),
    );

    let report = engine(94).run_cycle(records, observed());

    assert_eq!(report.diagnostics.missing_start_time, 1);
    assert_eq!(report.opportunities.len(), 1);
    assert_eq!(report.opportunities[0].profit_percentage(), dec!(1.0766));
}

#[test]
fn invalid_records_are_counted() {
    let mut records = scenario_a();
    records.push(record("w", "Manchester United vs Liverpool", "Draw", dec!(0.9)));
    records.push(RecordBuilder::new("w", "A vs B", "A", dec!(2.0)).sport("quidditch").build());

    let report = engine(94).run_cycle(records, observed());

    assert_eq!(report.diagnostics.records_received, 11);
    assert_eq!(report.diagnostics.records_invalid, 2);
    assert_eq!(report.opportunities.len(), 1);
}

#[test]
fn identical_input_gives_identical_output_in_any_order() {
    let batch = synthetic_batch(11);
    let mut reversed = batch.clone();
    reversed.reverse();

    let engine = engine(80);
    let first = engine.run_cycle(batch.clone(), observed());
    let again = engine.run_cycle(batch, observed());
    let shuffled = engine.run_cycle(reversed, observed());

    assert_eq!(first.opportunities, again.opportunities);
    assert_eq!(first.opportunities, shuffled.opportunities);
    assert_eq!(first.diagnostics, shuffled.diagnostics);
}

const THRESHOLDS: [u32; 7] = [0, 40, 60, 80, 90, 95, 100];

/// Largest cluster (by quote count) and number of clusters at each threshold.
fn cluster_profile(batch: &[RawOddsRecord]) -> Vec<(usize, usize)> {
    THRESHOLDS
        .into_iter()
        .map(|threshold| {
            let outcome = engine(threshold).match_records(batch.to_vec());
            let largest = outcome
                .events
                .iter()
                .map(MatchedEvent::quote_count)
                .max()
                .unwrap_or(0);
            (largest, outcome.events.len())
        })
        .collect()
}

fn assert_monotonic(profile: &[(usize, usize)], label: &str) {
    for (pair, thresholds) in profile.windows(2).zip(THRESHOLDS.windows(2)) {
        let ((lower_largest, lower_count), (upper_largest, upper_count)) = (pair[0], pair[1]);
        assert!(
            upper_largest <= lower_largest,
            "{label}: largest cluster grew from {lower_largest} to {upper_largest} \
             between thresholds {} and {}",
            thresholds[0],
            thresholds[1]
        );
        assert!(
            upper_count >= lower_count,
            "{label}: cluster count fell from {lower_count} to {upper_count} \
             between thresholds {} and {}",
            thresholds[0],
            thresholds[1]
        );
    }
}

#[test]
fn clusters_only_split_as_threshold_rises() {
    let mut batch = scenario_a();
    batch.extend(scenario_b());
    batch.push(record("x", "Bayern Munich vs Dortmund", "Draw", dec!(3.5)));
    batch.push(record("y", "Bayern Munchen vs Dortmund", "Draw", dec!(3.6)));
    batch.push(record("z", "FC Bayern vs Borussia Dortmund", "Draw", dec!(3.4)));

    assert_monotonic(&cluster_profile(&batch), "canned");
}

#[test]
fn synthetic_clusters_only_split_as_threshold_rises() {
    for seed in [3, 11, 29, 404] {
        let profile = cluster_profile(&synthetic_batch(seed));

        assert_monotonic(&profile, &format!("seed {seed}"));
        assert!(
            profile[0].0 > profile[THRESHOLDS.len() - 1].0,
            "seed {seed}: spelling variants should split at 100: {profile:?}"
        );
    }
}

#[test]
fn stakes_always_sum_to_bankroll() {
    let filters = DetectionFilters {
        bankroll: Some(dec!(777.77)),
        ..DetectionFilters::default()
    };

    for seed in [1, 2, 3, 5, 8] {
        let report = engine(80)
            .run_cycle_filtered(synthetic_batch(seed), &filters, observed())
            .unwrap();
        for opportunity in &report.opportunities {
            assert_eq!(opportunity.total_stake(), dec!(777.77));
            assert!(opportunity.implied_probability_sum() < Decimal::ONE);
        }
    }
}

#[test]
fn bookmaker_filter_can_remove_the_arbitrage() {
    let filters = DetectionFilters {
        bookmakers: Some([BookmakerId::new("y"), BookmakerId::new("z")].into_iter().collect()),
        ..DetectionFilters::default()
    };

    let report = engine(94)
        .run_cycle_filtered(scenario_a(), &filters, observed())
        .unwrap();

    assert!(report.opportunities.is_empty());
    assert_eq!(report.diagnostics.no_arbitrage, 1);
}

#[test]
fn profit_floor_above_the_edge_filters_it_out() {
    let filters = DetectionFilters {
        min_arb_percentage: Some(dec!(1.1)),
        ..DetectionFilters::default()
    };

    let report = engine(94)
        .run_cycle_filtered(scenario_a(), &filters, observed())
        .unwrap();

    assert!(report.opportunities.is_empty());
    assert_eq!(report.diagnostics.below_thresholds, 1);
}
