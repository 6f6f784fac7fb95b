use kinetic_protocol::{Point, PointerSample, Rect};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlowConfig {
    pub radius_px: f64,
}

impl Default for GlowConfig {
    fn default() -> Self {
        Self { radius_px: 192.0 }
    }
}

impl GlowConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::non_negative("radius_px", self.radius_px)
    }
}

/// Pointer position relative to the card's top-left corner.
pub fn map_glow(sample: &PointerSample, bounds: &Rect) -> Option<Point> {
    let p = Point::new(sample.x - bounds.x, sample.y - bounds.y);
    p.is_finite().then_some(p)
}
