//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`domain`] — Builders for raw records, entries and matched events, plus
//!   canned scenarios.
//! - [`source`] — Stub [`OddsSource`](crate::port::OddsSource)
//!   implementations: `StaticSource`, `FailingSource`.

pub mod domain;
pub mod source;
