//! Periodic cycle settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Runtime loop configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Seconds between detection cycles in `run` mode.
    #[serde(default = "default_cycle_interval_secs")]
    pub cycle_interval_secs: u64,
}

const fn default_cycle_interval_secs() -> u64 {
    30
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            cycle_interval_secs: default_cycle_interval_secs(),
        }
    }
}

impl RuntimeConfig {
    #[must_use]
    pub fn cycle_interval(&self) -> Duration {
        Duration::from_secs(self.cycle_interval_secs)
    }
}
