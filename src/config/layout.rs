//! Layout configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::layout::LayoutSpacing;

/// Spacing constants and zoom step
#[derive(Debug, Clone, Deserialize)]
pub struct LayoutConfig {
    /// Node size and gaps
    #[serde(default)]
    pub spacing: LayoutSpacing,

    /// Factor applied per zoom in/out
    #[serde(default = "default_zoom_step")]
    pub zoom_step: f64,
}

impl LayoutConfig {
    /// Validate layout configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.spacing.is_valid() {
            return Err(ValidationError::InvalidSpacing);
        }
        if !self.zoom_step.is_finite() || self.zoom_step <= 1.0 {
            return Err(ValidationError::InvalidZoomStep);
        }
        Ok(())
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            spacing: LayoutSpacing::default(),
            zoom_step: default_zoom_step(),
        }
    }
}

fn default_zoom_step() -> f64 {
    1.2
}
