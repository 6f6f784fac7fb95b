use kinetic_protocol::{Point, PointerSample, TransformState};
use serde::{Deserialize, Serialize};

use super::cap_magnitude;
use crate::error::ConfigError;

/// Pull factor of a magnetic container.
pub const CONTAINER_PULL: f64 = 0.3;
/// Pull factor of the container's inner content: half the container's, so
/// the label lags behind its button.
pub const CONTENT_PULL: f64 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MagneticConfig {
    pub pull_factor: f64,
    /// Upper bound on the offset's length in px. Unbounded by default.
    pub max_offset_px: Option<f64>,
}

impl Default for MagneticConfig {
    fn default() -> Self {
        Self {
            pull_factor: CONTAINER_PULL,
            max_offset_px: None,
        }
    }
}

impl MagneticConfig {
    pub fn content() -> Self {
        Self {
            pull_factor: CONTENT_PULL,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::finite("pull_factor", self.pull_factor)?;
        if let Some(max) = self.max_offset_px {
            ConfigError::non_negative("max_offset_px", max)?;
        }
        Ok(())
    }
}

/// Offset toward the pointer: `(pointer - center) * pull_factor`.
pub fn map_magnetic(
    sample: &PointerSample,
    center: Point,
    config: &MagneticConfig,
) -> TransformState {
    if !sample.position().is_finite() || !center.is_finite() {
        return TransformState::IDENTITY;
    }
    let offset = Point::new(
        (sample.x - center.x) * config.pull_factor,
        (sample.y - center.y) * config.pull_factor,
    );
    let offset = cap_magnitude(offset, config.max_offset_px);
    TransformState::translate(offset.x, offset.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_is_scaled_delta_from_center() {
        let center = Point::new(100.0, 50.0);
        let cfg = MagneticConfig::default();
        for (x, y) in [(100.0, 50.0), (140.0, 30.0), (0.0, 0.0), (1920.0, 1080.0)] {
            let t = map_magnetic(&PointerSample::at(x, y), center, &cfg);
            assert!(t.is_finite());
            assert!((t.translate_x - (x - 100.0) * 0.3).abs() < 1e-9);
            assert!((t.translate_y - (y - 50.0) * 0.3).abs() < 1e-9);
            assert_eq!(t.rotate_x_deg, 0.0);
        }
    }

    #[test]
    fn content_moves_half_as_far() {
        let center = Point::new(0.0, 0.0);
        let p = PointerSample::at(40.0, -20.0);
        let outer = map_magnetic(&p, center, &MagneticConfig::default());
        let inner = map_magnetic(&p, center, &MagneticConfig::content());
        assert!((inner.translate_x * 2.0 - outer.translate_x).abs() < 1e-9);
        assert!((inner.translate_y * 2.0 - outer.translate_y).abs() < 1e-9);
    }

    #[test]
    fn optional_cap_limits_runaway_offsets() {
        let cfg = MagneticConfig {
            max_offset_px: Some(12.0),
            ..MagneticConfig::default()
        };
        let t = map_magnetic(&PointerSample::at(10_000.0, 0.0), Point::new(0.0, 0.0), &cfg);
        assert!((t.translate_x - 12.0).abs() < 1e-9);
        assert_eq!(t.translate_y, 0.0);
    }

    #[test]
    fn non_finite_pointer_is_identity() {
        let t = map_magnetic(
            &PointerSample::at(f64::NAN, 0.0),
            Point::new(0.0, 0.0),
            &MagneticConfig::default(),
        );
        assert!(t.is_identity());
    }

    #[test]
    fn rejects_negative_cap() {
        let cfg = MagneticConfig {
            max_offset_px: Some(-1.0),
            ..MagneticConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}
