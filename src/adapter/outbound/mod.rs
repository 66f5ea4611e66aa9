//! Outbound adapters (driven side).

pub mod source;
