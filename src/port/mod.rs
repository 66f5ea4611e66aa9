//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! ```text
//!   ┌───────────┐      ┌──────────────────────┐      ┌─────────┐
//!   │  Sources  │ ───▶ │  Application (core)  │ ───▶ │   CLI   │
//!   │  Adapter  │      │  match + detect      │      │ Adapter │
//!   └───────────┘      └──────────────────────┘      └─────────┘
//! ```
//!
//! # Available Ports
//!
//! - [`OddsSource`] - Batches of raw odds from synthetic, file or HTTP feeds

mod source;

pub use source::OddsSource;
