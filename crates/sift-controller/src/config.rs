//! Controller configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ControllerError, ControllerResult};

/// Quiet period before a keystroke-driven search is dispatched
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Upper bound on the debounce delay (10s)
pub const MAX_DEBOUNCE_MS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub debounce_ms: u64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

impl ControllerConfig {
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce_ms = debounce.as_millis() as u64;
        self
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn validate(&self) -> ControllerResult<()> {
        if self.debounce_ms > MAX_DEBOUNCE_MS {
            return Err(ControllerError::InvalidConfig(format!(
                "debounce too long: {}ms (max {}ms)",
                self.debounce_ms, MAX_DEBOUNCE_MS
            )));
        }
        Ok(())
    }
}
