//! Interaction configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::application::ClickTracking;

/// Click disambiguation and submission debounce
#[derive(Debug, Clone, Deserialize)]
pub struct InteractionConfig {
    /// Double-click window in milliseconds
    #[serde(default = "default_double_click_ms")]
    pub double_click_ms: u64,

    /// Whether double clicks must hit the same node
    #[serde(default)]
    pub click_tracking: ClickTracking,

    /// Trailing-edge debounce for action submission, in milliseconds
    #[serde(default = "default_submit_debounce_ms")]
    pub submit_debounce_ms: u64,
}

impl InteractionConfig {
    pub fn double_click_threshold(&self) -> Duration {
        Duration::from_millis(self.double_click_ms)
    }

    pub fn submit_debounce(&self) -> Duration {
        Duration::from_millis(self.submit_debounce_ms)
    }

    /// Validate interaction configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.double_click_ms == 0 {
            return Err(ValidationError::InvalidClickThreshold);
        }
        Ok(())
    }
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            double_click_ms: default_double_click_ms(),
            click_tracking: ClickTracking::default(),
            submit_debounce_ms: default_submit_debounce_ms(),
        }
    }
}

fn default_double_click_ms() -> u64 {
    300
}

fn default_submit_debounce_ms() -> u64 {
    500
}
