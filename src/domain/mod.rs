//! Bookmaker-agnostic domain types.

mod diagnostics;
mod error;
mod event;
mod id;
mod money;
mod odds;
mod opportunity;
mod sport;

pub use diagnostics::Diagnostics;
pub use error::DomainError;
pub use event::{MatchedEvent, Quote};
pub use id::BookmakerId;
pub use money::{Odds, Stake};
pub use odds::{OddsEntry, RawOddsRecord};
pub use opportunity::{ArbitrageOpportunity, OpportunityLeg};
pub use sport::{MarketType, Sport};
