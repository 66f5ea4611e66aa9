//! Latest published cycle result, shared between the cycle loop and readers.

use std::sync::Arc;

use parking_lot::RwLock;

use super::pipeline::CycleReport;
use crate::domain::{ArbitrageOpportunity, Diagnostics};

/// Holds the most recent finished [`CycleReport`].
///
/// Writers replace the whole report at once, so readers see either the
/// previous cycle or the new one, never a mix.
#[derive(Debug, Default)]
pub struct OpportunityBoard {
    inner: RwLock<Published>,
}

#[derive(Debug, Default)]
struct Published {
    latest: Option<Arc<CycleReport>>,
    cycles: u64,
}

impl OpportunityBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current report and return the shared handle to it.
    pub fn publish(&self, report: CycleReport) -> Arc<CycleReport> {
        let report = Arc::new(report);
        let mut inner = self.inner.write();
        inner.latest = Some(Arc::clone(&report));
        inner.cycles += 1;
        report
    }

    /// Latest report, if any cycle has finished.
    pub fn latest(&self) -> Option<Arc<CycleReport>> {
        self.inner.read().latest.clone()
    }

    /// Opportunities from the latest report.
    pub fn opportunities(&self) -> Vec<ArbitrageOpportunity> {
        self.latest()
            .map(|report| report.opportunities.clone())
            .unwrap_or_default()
    }

    /// Diagnostics from the latest report.
    pub fn diagnostics(&self) -> Option<Diagnostics> {
        self.latest().map(|report| report.diagnostics)
    }

    /// Number of reports published so far.
    pub fn cycles(&self) -> u64 {
        self.inner.read().cycles
    }
}
