//! Odds snapshot fetched from an HTTP endpoint returning a JSON array.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::RawOddsRecord;
use crate::error::{Result, SourceError};
use crate::port::OddsSource;

/// Configuration for the HTTP source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpSourceConfig {
    pub url: String,

    /// Whole-request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

const fn default_timeout_secs() -> u64 {
    10
}

/// Pulls records from a remote feed.
pub struct HttpSource {
    http: HttpClient,
    url: String,
}

impl HttpSource {
    #[must_use]
    pub fn from_config(config: &HttpSourceConfig) -> Self {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });

        Self {
            http,
            url: config.url.clone(),
        }
    }
}

#[async_trait]
impl OddsSource for HttpSource {
    fn name(&self) -> &str {
        &self.url
    }

    async fn fetch(&self) -> Result<Vec<RawOddsRecord>> {
        let response = self.http.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                source_name: self.url.clone(),
                status: status.as_u16(),
            }
            .into());
        }

        let records: Vec<RawOddsRecord> = response.json().await?;
        debug!(url = %self.url, records = records.len(), "Fetched odds feed");
        Ok(records)
    }
}
