//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application settings.
//! Configuration is loaded from a TOML file; `SUREBET_LOG_LEVEL` and
//! `SUREBET_LOG_FORMAT` from the environment (or `.env`) override the
//! `[logging]` section.
//!
//! # Example
//!
//! ```no_run
//! use surebet::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::logging::LoggingConfig;
use super::runtime::RuntimeConfig;
use super::source::SourceConfig;
use crate::application::{AliasTable, DetectionConfig, MatchingConfig};
use crate::error::{ConfigError, Result};

/// Main application configuration.
///
/// Load from a TOML file using [`Config::load`] or parse directly with
/// [`Config::parse_toml`]. Both validate before returning.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Logging and tracing configuration.
    pub logging: LoggingConfig,

    /// Fuzzy event matching.
    #[serde(default)]
    pub matching: MatchingConfig,

    /// Arbitrage thresholds and stake sizing.
    #[serde(default)]
    pub detection: DetectionConfig,

    /// Alias phrase to canonical phrase, applied during normalization.
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,

    /// Where odds come from.
    #[serde(default)]
    pub source: SourceConfig,

    /// Periodic loop settings.
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The TOML content is malformed
    /// - Validation fails (e.g., threshold above 100, non-positive bankroll)
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;

        if let Ok(level) = std::env::var("SUREBET_LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Ok(format) = std::env::var("SUREBET_LOG_FORMAT") {
            config.logging.format = format;
        }

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Validate configuration values.
    ///
    /// Checks that all required fields are present and values are within
    /// acceptable ranges.
    pub fn validate(&self) -> Result<()> {
        self.logging.validate()?;
        self.matching.validate()?;
        self.detection.validate()?;
        self.source.validate()?;
        self.alias_table()?;

        if self.runtime.cycle_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "cycle_interval_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Build the alias table from the `[aliases]` section.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for blank or conflicting aliases.
    pub fn alias_table(&self) -> std::result::Result<AliasTable, ConfigError> {
        AliasTable::from_pairs(&self.aliases)
    }

    /// Render the effective configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if a value cannot be represented.
    pub fn to_toml(&self) -> std::result::Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::invalid("config", e.to_string()))
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ScorerKind;
    use crate::error::Error;
    use rust_decimal_macros::dec;

    const FULL: &str = r#"
        [logging]
        level = "debug"
        format = "json"

        [matching]
        fuzzy_threshold = 90
        time_tolerance_minutes = 30
        scorer = "token_sort_jaro_winkler"

        [detection]
        default_bankroll = 500
        min_arb_percentage = 0.5
        min_profit_amount = 2
        freshness_half_life_secs = 120

        [aliases]
        "man utd" = "manchester united"
        "psg" = "paris saint germain"

        [source]
        type = "file"
        path = "odds.json"

        [runtime]
        cycle_interval_secs = 5
    "#;

    #[test]
    fn parses_every_section() {
        let config = Config::parse_toml(FULL).unwrap();

        assert_eq!(config.matching.fuzzy_threshold, 90);
        assert_eq!(config.matching.scorer, ScorerKind::TokenSortJaroWinkler);
        assert_eq!(config.detection.default_bankroll, dec!(500));
        assert_eq!(config.detection.min_arb_percentage, dec!(0.5));
        assert_eq!(config.aliases.len(), 2);
        assert_eq!(config.source.kind(), "file");
        assert_eq!(config.runtime.cycle_interval_secs, 5);
        assert_eq!(config.alias_table().unwrap().len(), 2);
    }

    #[test]
    fn defaults_apply_to_missing_sections() {
        let config = Config::parse_toml("[logging]\nlevel = \"info\"\nformat = \"pretty\"\n").unwrap();

        assert_eq!(config.matching, MatchingConfig::default());
        assert_eq!(config.detection, DetectionConfig::default());
        assert_eq!(config.source.kind(), "synthetic");
        assert!(config.aliases.is_empty());
    }

    #[test]
    fn logging_section_is_required() {
        let err = Config::parse_toml("[matching]\nfuzzy_threshold = 90\n").unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::Parse(_))));
    }

    #[test]
    fn threshold_above_100_is_rejected() {
        let toml = "[logging]\nlevel = \"info\"\nformat = \"pretty\"\n[matching]\nfuzzy_threshold = 101\n";
        let err = Config::parse_toml(toml).unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidValue {
                field: "fuzzy_threshold",
                ..
            })
        ));
    }

    #[test]
    fn negative_tolerance_is_rejected() {
        let toml = "[logging]\nlevel = \"info\"\nformat = \"pretty\"\n[matching]\ntime_tolerance_minutes = -1\n";
        assert!(Config::parse_toml(toml).is_err());
    }

    #[test]
    fn unknown_log_format_is_rejected() {
        let toml = "[logging]\nlevel = \"info\"\nformat = \"xml\"\n";
        assert!(Config::parse_toml(toml).is_err());
    }

    #[test]
    fn http_source_requires_url() {
        let toml = "[logging]\nlevel = \"info\"\nformat = \"pretty\"\n[source]\ntype = \"http\"\nurl = \"\"\n";
        let err = Config::parse_toml(toml).unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::MissingField { field: "url" })
        ));
    }

    #[test]
    fn effective_config_renders_back_to_toml() {
        let config = Config::parse_toml(FULL).unwrap();
        let rendered = config.to_toml().unwrap();
        let reparsed: Config = toml::from_str(&rendered).unwrap();

        assert_eq!(reparsed.matching, config.matching);
        assert_eq!(reparsed.source, config.source);
    }
}
