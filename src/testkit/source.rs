//! Stub odds sources.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::domain::RawOddsRecord;
use crate::error::{Result, SourceError};
use crate::port::OddsSource;

/// Returns the same batch on every fetch and counts the calls.
pub struct StaticSource {
    records: Vec<RawOddsRecord>,
    fetches: AtomicUsize,
}

impl StaticSource {
    pub fn new(records: Vec<RawOddsRecord>) -> Self {
        Self {
            records,
            fetches: AtomicUsize::new(0),
        }
    }

    /// Number of completed fetches.
    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OddsSource for StaticSource {
    fn name(&self) -> &str {
        "static"
    }

    async fn fetch(&self) -> Result<Vec<RawOddsRecord>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.records.clone())
    }
}

/// Fails every fetch with a 503.
pub struct FailingSource;

#[async_trait]
impl OddsSource for FailingSource {
    fn name(&self) -> &str {
        "failing"
    }

    async fn fetch(&self) -> Result<Vec<RawOddsRecord>> {
        Err(SourceError::Status {
            source_name: self.name().to_string(),
            status: 503,
        }
        .into())
    }
}
