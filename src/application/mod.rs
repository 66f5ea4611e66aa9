//! Application services: normalization, matching, detection and the cycle
//! pipeline that chains them.
//!
//! Everything here is synchronous and free of I/O. Sources and the
//! periodic loop live in the adapter and infrastructure layers.

pub mod detection;
pub mod matching;
pub mod normalize;
pub mod pipeline;
pub mod similarity;
pub mod state;

pub use detection::{ArbitrageDetector, DetectionConfig, DetectionFilters, DetectionReport};
pub use matching::{EventMatcher, MatchOutcome, MatchingConfig};
pub use normalize::{AliasTable, Normalizer};
pub use pipeline::{ArbitrageEngine, CycleReport};
pub use similarity::{ScorerKind, Similarity, TokenSortJaroWinkler, TokenSortRatio};
pub use state::OpportunityBoard;
