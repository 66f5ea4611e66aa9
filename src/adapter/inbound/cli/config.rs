//! Handler for the `config` command group.

use std::fs;
use std::path::Path;

use serde_json::json;

use super::output::{self, Tone};
use super::setup;
use crate::error::{ConfigError, Result};
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::config::source::SourceConfig;

/// Default config template with documentation.
const CONFIG_TEMPLATE: &str = include_str!("../../../../config.toml.example");

/// Execute `config init`.
pub fn execute_init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(ConfigError::InvalidValue {
            field: "config",
            reason: "file already exists (use --force to overwrite)".to_string(),
        }
        .into());
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, CONFIG_TEMPLATE)?;
    output::section("Config Initialized");
    output::success("Created configuration file");
    output::field("Path", path.display());
    output::section("Next Steps");
    output::note(&format!("1. Edit {} with your aliases and source", path.display()));
    output::note(&format!("2. Run: surebet config validate -c {}", path.display()));
    output::note(&format!("3. Run: surebet detect -c {}", path.display()));
    Ok(())
}

/// Execute `config show`.
pub fn execute_show(path: Option<&Path>) -> Result<()> {
    let config = setup::load_config(path)?;

    if output::mode().json {
        output::json_output(json!({
            "command": "config.show",
            "config": serde_json::to_value(&config)?,
        }));
        return Ok(());
    }

    output::section("Effective Configuration");
    match setup::resolve_config_path(path) {
        Some(path) => output::field("Path", path.display()),
        None => output::field("Path", output::paint("(built-in defaults)", Tone::Faint)),
    }

    output::section("Logging");
    output::field("Level", &config.logging.level);
    output::field("Format", &config.logging.format);

    output::section("Matching");
    output::field("Threshold", config.matching.fuzzy_threshold);
    output::field(
        "Tolerance",
        format!("{} min", config.matching.time_tolerance_minutes),
    );
    output::field("Scorer", config.matching.scorer.build().name());

    output::section("Detection");
    output::field("Bankroll", config.detection.default_bankroll);
    output::field("Min profit %", config.detection.min_arb_percentage);
    output::field("Min profit", config.detection.min_profit_amount);
    output::field(
        "Half-life",
        format!("{}s", config.detection.freshness_half_life_secs),
    );
    match config.detection.max_quote_age_secs {
        Some(age) => output::field("Max age", format!("{age}s")),
        None => output::field("Max age", "unlimited"),
    }

    output::section("Source");
    print_source(&config.source);

    output::section("Aliases");
    if config.aliases.is_empty() {
        output::note("(none)");
    } else {
        for (alias, canonical) in &config.aliases {
            output::field(alias, canonical);
        }
    }

    output::section("Runtime");
    output::field("Interval", format!("{}s", config.runtime.cycle_interval_secs));

    if output::mode().verbose > 0 {
        output::section("TOML");
        output::lines(&config.to_toml()?);
    }
    Ok(())
}

fn print_source(source: &SourceConfig) {
    output::field("Type", source.kind());
    match source {
        SourceConfig::Synthetic(synthetic) => {
            output::field("Bookmakers", synthetic.bookmakers.join(", "));
            match synthetic.seed {
                Some(seed) => output::field("Seed", seed),
                None => output::field("Seed", "random"),
            }
        }
        SourceConfig::File(file) => output::field("Path", file.path.display()),
        SourceConfig::Http(http) => {
            output::field("URL", &http.url);
            output::field("Timeout", format!("{}s", http.timeout_secs));
        }
    }
}

/// Execute `config validate`.
pub fn execute_validate(path: Option<&Path>) -> Result<()> {
    let resolved = setup::resolve_config_path(path);
    output::section("Config Validation");
    match &resolved {
        Some(path) => output::field("Path", path.display()),
        None => output::field("Path", "(built-in defaults)"),
    }

    let config = setup::load_config(path)?;
    output::success("Config file is valid");

    if let Some(warning) = lint(&config) {
        output::warning(&warning);
    }

    if let Some(path) = resolved {
        output::field("Next", format!("surebet config show -c {}", path.display()));
    }
    Ok(())
}

/// Settings that are valid but probably not intended.
fn lint(config: &Config) -> Option<String> {
    if config.matching.fuzzy_threshold < 50 {
        return Some(format!(
            "fuzzy_threshold {} will merge unrelated events",
            config.matching.fuzzy_threshold
        ));
    }
    if config.aliases.is_empty() {
        return Some("no aliases configured; abbreviations rely on fuzzy matching alone".into());
    }
    None
}
