use kinetic_protocol::{PointerSample, Rect, TransformState};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TiltConfig {
    /// Rotation in degrees between the element's edges.
    pub tilt_range_deg: f64,
    pub perspective_px: f64,
}

impl Default for TiltConfig {
    fn default() -> Self {
        Self {
            tilt_range_deg: 20.0,
            perspective_px: 1000.0,
        }
    }
}

impl TiltConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::non_negative("tilt_range_deg", self.tilt_range_deg)?;
        ConfigError::non_negative("perspective_px", self.perspective_px)
    }
}

/// Pointer position within `bounds`, each axis in `[-0.5, 0.5]`.
pub fn normalized(sample: &PointerSample, bounds: &Rect) -> Option<(f64, f64)> {
    if bounds.is_empty() || !sample.position().is_finite() {
        return None;
    }
    let nx = ((sample.x - bounds.x) / bounds.w - 0.5).clamp(-0.5, 0.5);
    let ny = ((sample.y - bounds.y) / bounds.h - 0.5).clamp(-0.5, 0.5);
    Some((nx, ny))
}

/// Rotate toward the pointer: the right edge turns away around Y, the top
/// edge tips back around X.
pub fn map_tilt(sample: &PointerSample, bounds: &Rect, config: &TiltConfig) -> TransformState {
    match normalized(sample, bounds) {
        Some((nx, ny)) => {
            TransformState::rotate(-ny * config.tilt_range_deg, nx * config.tilt_range_deg)
        }
        None => TransformState::IDENTITY,
    }
}
