//! Command-line interface definitions.
//!
//! Defines the CLI structure for the surebet application using `clap`.
//! The CLI supports subcommands for one-shot detection, the periodic loop,
//! inspecting matched events, normalizing names and managing configuration.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;

use crate::domain::{MarketType, Sport};

/// Sports betting arbitrage detection CLI
#[derive(Parser, Debug)]
#[command(name = "surebet")]
#[command(version)]
pub struct Cli {
    /// Color output mode [auto, always, never]
    #[arg(
        long,
        global = true,
        default_value = "auto",
        hide_possible_values = true
    )]
    pub color: ColorChoice,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Color output mode for terminal rendering.
#[derive(Clone, Debug, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect automatically
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Top-level subcommands for the surebet CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a single detection cycle and print the opportunities
    Detect(DetectArgs),

    /// Run detection cycles periodically until Ctrl+C
    Run(RunArgs),

    /// Show how odds were clustered into events
    Match(MatchArgs),

    /// Print the canonical form of team or event names
    Normalize(NormalizeArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Subcommands for `surebet config`.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Generate a new configuration file from template.
    Init(ConfigInitArgs),
    /// Display the effective configuration with defaults applied.
    Show(ConfigPathArg),
    /// Validate a configuration file for correctness.
    Validate(ConfigPathArg),
}

/// Shared argument struct for commands that only need a configuration path.
#[derive(Parser, Debug)]
pub struct ConfigPathArg {
    /// Path to the configuration file (defaults to ./config.toml when present).
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Arguments for the `config init` subcommand.
#[derive(Parser, Debug)]
pub struct ConfigInitArgs {
    /// Output path for the generated configuration file.
    #[arg(default_value = "config.toml")]
    pub path: PathBuf,
    /// Overwrite the file if it already exists.
    #[arg(long)]
    pub force: bool,
}

/// Options shared by every command that runs the engine.
///
/// All optional fields override the corresponding configuration file values.
#[derive(Args, Debug, Default)]
pub struct EngineArgs {
    /// Path to the configuration file (defaults to ./config.toml when present).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Read odds from a JSON file instead of the configured source.
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Seed for the synthetic source.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override the fuzzy match threshold (0-100).
    #[arg(long)]
    pub threshold: Option<u32>,

    /// Override the start time tolerance in minutes.
    #[arg(long)]
    pub tolerance: Option<i64>,

    /// Override log level (debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,
}

/// Arguments for the `detect` subcommand.
#[derive(Parser, Debug)]
pub struct DetectArgs {
    #[command(flatten)]
    pub engine: EngineArgs,

    /// Amount to split across the legs of each opportunity.
    #[arg(long)]
    pub bankroll: Option<Decimal>,

    /// Minimum profit percentage to report.
    #[arg(long)]
    pub min_profit_pct: Option<Decimal>,

    /// Minimum guaranteed profit to report.
    #[arg(long)]
    pub min_profit: Option<Decimal>,

    /// Only consider these sports (comma-separated).
    #[arg(long = "sport", value_delimiter = ',')]
    pub sports: Vec<Sport>,

    /// Only consider these market types (comma-separated).
    #[arg(long = "market", value_delimiter = ',')]
    pub markets: Vec<MarketType>,

    /// Skip events starting more than this many hours from now (max 168).
    #[arg(long)]
    pub max_start_hours: Option<u32>,

    /// Only consider these bookmakers (comma-separated).
    #[arg(long = "bookmaker", value_delimiter = ',')]
    pub bookmakers: Vec<String>,

    /// Show at most this many opportunities.
    #[arg(long)]
    pub limit: Option<usize>,
}

/// Arguments for the `run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub engine: EngineArgs,

    /// Override seconds between cycles.
    #[arg(long)]
    pub interval: Option<u64>,

    /// Stop after this many cycles.
    #[arg(long)]
    pub cycles: Option<u64>,

    /// Use JSON log format instead of pretty-printed logs.
    #[arg(long)]
    pub json_logs: bool,
}

/// Arguments for the `match` subcommand.
#[derive(Parser, Debug)]
pub struct MatchArgs {
    #[command(flatten)]
    pub engine: EngineArgs,

    /// Only show events with quotes from at least this many bookmakers.
    #[arg(long, default_value = "1")]
    pub min_bookmakers: usize,
}

/// Arguments for the `normalize` subcommand.
#[derive(Parser, Debug)]
pub struct NormalizeArgs {
    /// Path to the configuration file (defaults to ./config.toml when present).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Names to normalize.
    #[arg(required = true)]
    pub text: Vec<String>,
}
