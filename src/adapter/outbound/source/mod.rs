//! Odds source adapters.

mod file;
mod http;
mod synthetic;

pub use file::{FileSource, FileSourceConfig};
pub use http::{HttpSource, HttpSourceConfig};
pub use synthetic::{SyntheticSource, SyntheticSourceConfig};
