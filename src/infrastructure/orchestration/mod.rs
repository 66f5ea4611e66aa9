//! Application orchestration.
//!
//! Owns the odds source, the engine and the [`OpportunityBoard`] and drives
//! detection cycles on a fixed interval until shutdown.
//!
//! [`OpportunityBoard`]: crate::application::OpportunityBoard

pub mod orchestrator;
mod runtime;

pub use orchestrator::Orchestrator;
pub use runtime::run_with_shutdown;
