//! Odds source selection.

use serde::{Deserialize, Serialize};

use crate::adapter::outbound::source::{FileSourceConfig, HttpSourceConfig, SyntheticSourceConfig};
use crate::error::ConfigError;

/// Which odds source feeds the engine.
///
/// The active variant is determined by the `type` field in the TOML config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SourceConfig {
    /// Randomly generated odds across simulated bookmakers.
    Synthetic(SyntheticSourceConfig),
    /// JSON array of records on disk.
    File(FileSourceConfig),
    /// JSON array of records from an HTTP endpoint.
    Http(HttpSourceConfig),
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self::Synthetic(SyntheticSourceConfig::default())
    }
}

impl SourceConfig {
    /// Short label for display.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Synthetic(_) => "synthetic",
            Self::File(_) => "file",
            Self::Http(_) => "http",
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Self::Synthetic(config) => {
                if config.bookmakers.is_empty() {
                    return Err(ConfigError::MissingField { field: "bookmakers" });
                }
                if config.bookmakers.iter().any(|b| b.trim().is_empty()) {
                    return Err(ConfigError::invalid("bookmakers", "names must not be blank"));
                }
            }
            Self::File(config) => {
                if config.path.as_os_str().is_empty() {
                    return Err(ConfigError::MissingField { field: "path" });
                }
            }
            Self::Http(config) => {
                if config.url.trim().is_empty() {
                    return Err(ConfigError::MissingField { field: "url" });
                }
                if config.timeout_secs == 0 {
                    return Err(ConfigError::invalid("timeout_secs", "must be greater than 0"));
                }
            }
        }
        Ok(())
    }
}
