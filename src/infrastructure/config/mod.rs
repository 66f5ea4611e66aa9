//! Infrastructure configuration modules.

pub mod logging;
pub mod runtime;
pub mod settings;
pub mod source;
