//! Surebet - cross-bookmaker sports betting arbitrage detection.
//!
//! Odds for the same match are quoted by many bookmakers under slightly
//! different names. This crate normalizes those names, clusters quotes that
//! describe the same match and market, and reports every cluster whose best
//! prices guarantee a profit, with the stake split that locks it in.
//!
//! # Architecture
//!
//! Hexagonal layout: a pure synchronous core surrounded by adapters.
//!
//! - **`domain`** - Records, matched events, opportunities, diagnostics
//! - **`application`** - Normalizer, matching engine, detection engine and
//!   the cycle pipeline that chains them
//! - **`port`** - The `OddsSource` trait
//! - **`adapter`** - Synthetic, file and HTTP sources; the CLI
//! - **`infrastructure`** - Configuration, wiring and the periodic loop
//!
//! # Features
//!
//! - `testkit` - Builders and stub sources for integration tests
//!
//! # Example
//!
//! ```
//! use chrono::Utc;
//! use surebet::application::{AliasTable, ArbitrageEngine, DetectionConfig, MatchingConfig};
//!
//! let aliases = AliasTable::from_pairs([("man utd", "manchester united")]).unwrap();
//! let engine =
//!     ArbitrageEngine::new(&MatchingConfig::default(), aliases, DetectionConfig::default())
//!         .unwrap();
//!
//! let report = engine.run_cycle(Vec::new(), Utc::now());
//! assert!(report.opportunities.is_empty());
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
