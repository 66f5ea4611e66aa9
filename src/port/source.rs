//! Odds source port.
//!
//! A source produces one batch of raw records per call. Validation happens
//! in the pipeline, so a source may hand over records with unknown sports or
//! bad odds; those are counted and dropped there.

use async_trait::async_trait;

use crate::domain::RawOddsRecord;
use crate::error::Result;

/// Supplies batches of odds records.
#[async_trait]
pub trait OddsSource: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Fetch the current snapshot of odds.
    async fn fetch(&self) -> Result<Vec<RawOddsRecord>>;
}
