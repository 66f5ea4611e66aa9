//! Config resolution and logging setup shared by the handlers.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::command::EngineArgs;
use super::output;
use crate::adapter::outbound::source::FileSourceConfig;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::config::source::SourceConfig;

/// Config file picked up from the working directory when `-c` is absent.
pub const DEFAULT_CONFIG: &str = "config.toml";

/// Path of the config file that would be loaded, if any.
pub fn resolve_config_path(path: Option<&Path>) -> Option<PathBuf> {
    match path {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG);
            default.exists().then_some(default)
        }
    }
}

/// Load the explicit config, else `./config.toml`, else built-in defaults.
///
/// An explicit path that cannot be read is an error.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match resolve_config_path(path) {
        Some(path) => {
            let config = Config::load(&path)?;
            debug!(path = %path.display(), "Loaded configuration");
            Ok(config)
        }
        None => {
            let config = Config::default();
            config.validate()?;
            Ok(config)
        }
    }
}

/// Load configuration and apply engine overrides from the command line.
pub fn engine_config(args: &EngineArgs) -> Result<Config> {
    let mut config = load_config(args.config.as_deref())?;
    apply_overrides(&mut config, args);
    config.validate()?;
    Ok(config)
}

fn apply_overrides(config: &mut Config, args: &EngineArgs) {
    if let Some(path) = &args.file {
        config.source = SourceConfig::File(FileSourceConfig { path: path.clone() });
    }
    if let Some(seed) = args.seed {
        if let SourceConfig::Synthetic(synthetic) = &mut config.source {
            synthetic.seed = Some(seed);
        }
    }
    if let Some(threshold) = args.threshold {
        config.matching.fuzzy_threshold = threshold;
    }
    if let Some(tolerance) = args.tolerance {
        config.matching.time_tolerance_minutes = tolerance;
    }
    if let Some(level) = &args.log_level {
        config.logging.level.clone_from(level);
    }
}

/// Initialize logging, letting `-v` raise the level and `--json` force JSON logs.
pub fn init_logging(config: &Config) {
    let mut logging = config.logging.clone();
    match output::mode().verbose {
        0 => {}
        1 => logging.level = "debug".into(),
        _ => logging.level = "trace".into(),
    }
    if output::mode().json {
        logging.format = "json".into();
    }
    logging.init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn explicit_missing_path_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(load_config(Some(&dir.path().join("missing.toml"))).is_err());
    }

    #[test]
    fn explicit_path_is_loaded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[logging]\nlevel = \"warn\"\nformat = \"pretty\"\n[matching]\nfuzzy_threshold = 70\n",
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.matching.fuzzy_threshold, 70);
    }

    #[test]
    fn overrides_replace_config_values() {
        let args = EngineArgs {
            file: Some(PathBuf::from("odds.json")),
            threshold: Some(80),
            tolerance: Some(5),
            ..EngineArgs::default()
        };
        let mut config = Config::default();
        apply_overrides(&mut config, &args);

        assert_eq!(config.matching.fuzzy_threshold, 80);
        assert_eq!(config.matching.time_tolerance_minutes, 5);
        assert_eq!(config.source.kind(), "file");
    }

    #[test]
    fn seed_applies_to_synthetic_source_only() {
        let mut config = Config::default();
        apply_overrides(
            &mut config,
            &EngineArgs {
                seed: Some(9),
                ..EngineArgs::default()
            },
        );

        let SourceConfig::Synthetic(synthetic) = &config.source else {
            panic!("expected synthetic source");
        };
        assert_eq!(synthetic.seed, Some(9));
    }
}
