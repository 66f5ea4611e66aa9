//! Infrastructure bootstrap helpers for runtime wiring.

use tracing::info;

use crate::adapter::outbound::source::{FileSource, HttpSource, SyntheticSource};
use crate::application::ArbitrageEngine;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::config::source::SourceConfig;
use crate::port::OddsSource;

/// Build the matching and detection engine from configuration.
pub fn build_engine(config: &Config) -> Result<ArbitrageEngine> {
    let aliases = config.alias_table()?;
    info!(
        aliases = aliases.len(),
        fuzzy_threshold = config.matching.fuzzy_threshold,
        time_tolerance_minutes = config.matching.time_tolerance_minutes,
        scorer = ?config.matching.scorer,
        "Engine initialized"
    );
    let engine = ArbitrageEngine::new(&config.matching, aliases, config.detection.clone())?;
    Ok(engine)
}

/// Build the configured odds source.
pub fn build_source(config: &SourceConfig) -> Box<dyn OddsSource> {
    let source: Box<dyn OddsSource> = match config {
        SourceConfig::Synthetic(synthetic) => Box::new(SyntheticSource::new(synthetic)),
        SourceConfig::File(file) => Box::new(FileSource::new(file.path.clone())),
        SourceConfig::Http(http) => Box::new(HttpSource::from_config(http)),
    };
    info!(source = source.name(), kind = config.kind(), "Odds source initialized");
    source
}
