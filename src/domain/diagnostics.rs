//! Per-cycle data-quality counters.
//!
//! Every skip or drop decision inside a cycle is counted here instead of
//! aborting the cycle, so callers can observe degradation over time.

use std::ops::AddAssign;

use serde::Serialize;

/// Counts by category for one detection cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    /// Raw records handed to the cycle.
    pub records_received: usize,
    /// Records dropped by validation (bad odds, unknown enum, blank fields).
    pub records_invalid: usize,
    /// Entries excluded from clustering because `start_time` was missing.
    pub missing_start_time: usize,
    /// Clusters emitted by the matcher.
    pub clusters_formed: usize,
    /// Entries whose best cluster was tied within tolerance with another.
    pub ambiguous_matches: usize,
    /// Events skipped because their outcome sets were not uniform.
    pub incomplete_markets: usize,
    /// Individual quotes excluded by the detector (odds at or below 1.0).
    pub rejected_quotes: usize,
    /// Quotes older than the configured maximum age.
    pub stale_quotes: usize,
    /// Complete events whose best prices did not form an arbitrage.
    pub no_arbitrage: usize,
    /// Events whose prices overflow decimal arithmetic (absurdly large odds
    /// or bankroll).
    pub unpriced_markets: usize,
    /// Arbitrages dropped by the minimum profit filters.
    pub below_thresholds: usize,
    /// Opportunities emitted.
    pub opportunities: usize,
}

impl Diagnostics {
    /// Total number of skip/drop decisions recorded.
    pub fn skipped(&self) -> usize {
        self.records_invalid
            + self.missing_start_time
            + self.incomplete_markets
            + self.rejected_quotes
            + self.stale_quotes
            + self.unpriced_markets
    }
}

impl AddAssign for Diagnostics {
    fn add_assign(&mut self, other: Self) {
        self.records_received += other.records_received;
        self.records_invalid += other.records_invalid;
        self.missing_start_time += other.missing_start_time;
        self.clusters_formed += other.clusters_formed;
        self.ambiguous_matches += other.ambiguous_matches;
        self.incomplete_markets += other.incomplete_markets;
        self.rejected_quotes += other.rejected_quotes;
        self.stale_quotes += other.stale_quotes;
        self.no_arbitrage += other.no_arbitrage;
        self.unpriced_markets += other.unpriced_markets;
        self.below_thresholds += other.below_thresholds;
        self.opportunities += other.opportunities;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_assign_merges_counts() {
        let mut total = Diagnostics {
            records_invalid: 1,
            clusters_formed: 2,
            ..Default::default()
        };
        total += Diagnostics {
            missing_start_time: 3,
            clusters_formed: 1,
            ..Default::default()
        };

        assert_eq!(total.clusters_formed, 3);
        assert_eq!(total.skipped(), 4);
    }
}
