use kinetic_protocol::{PointerSample, TransformState, ViewportSize};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Background grid that shifts with the pointer under a fixed 3D tilt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointerParallaxConfig {
    /// Offset at the viewport edges, in px.
    pub range_px: f64,
    pub tilt_deg: f64,
    pub perspective_px: f64,
}

impl Default for PointerParallaxConfig {
    fn default() -> Self {
        Self {
            range_px: 20.0,
            tilt_deg: 60.0,
            perspective_px: 500.0,
        }
    }
}

impl PointerParallaxConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::finite("range_px", self.range_px)?;
        ConfigError::finite("tilt_deg", self.tilt_deg)?;
        ConfigError::non_negative("perspective_px", self.perspective_px)
    }
}

/// Pointer position over the viewport in `[-1, 1]`, y pointing up.
pub fn normalized(sample: &PointerSample, viewport: &ViewportSize) -> Option<(f64, f64)> {
    if viewport.width <= 0.0 || viewport.height <= 0.0 || !sample.position().is_finite() {
        return None;
    }
    let nx = (sample.x / viewport.width * 2.0 - 1.0).clamp(-1.0, 1.0);
    let ny = (-(sample.y / viewport.height) * 2.0 + 1.0).clamp(-1.0, 1.0);
    Some((nx, ny))
}

pub fn map_pointer_parallax(
    sample: &PointerSample,
    viewport: &ViewportSize,
    config: &PointerParallaxConfig,
) -> TransformState {
    let (nx, ny) = normalized(sample, viewport).unwrap_or((0.0, 0.0));
    TransformState {
        translate_x: nx * config.range_px,
        translate_y: ny * config.range_px,
        rotate_x_deg: config.tilt_deg,
        ..TransformState::IDENTITY
    }
}
