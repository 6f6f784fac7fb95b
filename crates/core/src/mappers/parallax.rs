use kinetic_protocol::{Point, ScrollSample, TransformState};
use serde::{Deserialize, Serialize};

use super::cap_magnitude;
use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallaxConfig {
    /// Signed: positive drifts with the scroll, negative against it.
    pub speed: f64,
    /// Upper bound on the vertical offset in px. Unbounded by default.
    pub max_offset_px: Option<f64>,
}

impl Default for ParallaxConfig {
    fn default() -> Self {
        Self {
            speed: 0.5,
            max_offset_px: None,
        }
    }
}

impl ParallaxConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::finite("speed", self.speed)?;
        if let Some(max) = self.max_offset_px {
            ConfigError::non_negative("max_offset_px", max)?;
        }
        Ok(())
    }
}

/// Vertical drift of an element whose layout top sits at
/// `element_document_top` px from the top of the document:
/// `(scroll + viewport_center - element_top) * speed`.
pub fn map_parallax(
    sample: &ScrollSample,
    element_document_top: f64,
    config: &ParallaxConfig,
) -> TransformState {
    let distance = sample.offset_px + sample.viewport_height_px / 2.0 - element_document_top;
    let offset = distance * config.speed;
    if !offset.is_finite() {
        return TransformState::IDENTITY;
    }
    let capped = cap_magnitude(Point::new(0.0, offset), config.max_offset_px);
    TransformState::translate(0.0, capped.y)
}
