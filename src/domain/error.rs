//! Domain validation errors for odds records.
//!
//! Returned when an ingested record violates an invariant of [`OddsEntry`].
//! The ingestion step drops the offending record and counts it; a single bad
//! record never aborts a cycle.
//!
//! # Examples
//!
//! ```
//! use surebet::domain::{DomainError, Sport};
//!
//! let result: Result<Sport, DomainError> = "curling".parse();
//! assert!(matches!(result, Err(DomainError::UnknownSport(_))));
//! ```
//!
//! [`OddsEntry`]: super::OddsEntry

use thiserror::Error;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Decimal odds must be strictly greater than 1.0.
    #[error("odds must be greater than 1.0, got {odds}")]
    OddsNotAboveOne {
        /// The invalid odds that were provided.
        odds: rust_decimal::Decimal,
    },

    /// Sport is not a member of the supported enumeration.
    #[error("unknown sport: {0}")]
    UnknownSport(String),

    /// Market type is not a member of the supported enumeration.
    #[error("unknown market type: {0}")]
    UnknownMarketType(String),

    /// A required text field was empty after trimming.
    #[error("{field} cannot be empty")]
    EmptyField {
        /// Name of the empty field.
        field: &'static str,
    },
}
