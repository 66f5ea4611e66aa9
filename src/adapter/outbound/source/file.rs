//! Odds snapshot read from a JSON file.
//!
//! The file holds a JSON array of records. It is re-read on every fetch, so
//! an external scraper can overwrite it between cycles.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::RawOddsRecord;
use crate::error::{Result, SourceError};
use crate::port::OddsSource;

/// Configuration for the file source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSourceConfig {
    pub path: PathBuf,
}

/// Reads records from a JSON file.
pub struct FileSource {
    path: PathBuf,
    name: String,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = format!("file:{}", path.display());
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl OddsSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Result<Vec<RawOddsRecord>> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        if content.trim().is_empty() {
            return Err(SourceError::Empty {
                source_name: self.name.clone(),
            }
            .into());
        }

        let records: Vec<RawOddsRecord> = serde_json::from_str(&content)?;
        debug!(path = %self.path.display(), records = records.len(), "Loaded odds file");
        Ok(records)
    }
}
